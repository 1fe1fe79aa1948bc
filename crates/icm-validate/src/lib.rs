//! icm-validate - Structural and semantic validation for ICM documents
//!
//! This crate provides a pluggable validation engine that turns raw DSL text
//! into position-accurate diagnostics. Malformed input never fails: every
//! defect becomes a diagnostic.
//!
//! # Architecture
//!
//! Individual validators implement the `Validator` trait. A validator can
//! look at the whole text (`check_document`) and at every block whose
//! keyword is known to the schema (`check_block`). The `ValidationEngine`
//! runs all document hooks first, then resolves each block's keyword and
//! runs the block hooks, so bracket diagnostics always come before
//! per-block diagnostics.
//!
//! # Example
//!
//! ```
//! use icm_core::{DiagnosticCode, Schema};
//! use icm_validate::ValidationEngine;
//!
//! let schema = Schema::from_json_str(r#"{ "keywords": [{ "name": "Records" }] }"#).unwrap();
//! let engine = ValidationEngine::with_defaults();
//!
//! let diagnostics = engine.validate("[Recods: Range=NOW]", &schema);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].code, Some(DiagnosticCode::UnknownKeyword));
//! ```

pub mod brackets;
pub mod fields;
pub mod recommended;
pub mod required;

use icm_core::diagnostics::{Diagnostic, DiagnosticCode};
use icm_core::parser::{scan_blocks, Block};
use icm_core::schema::{KeywordSpec, Schema};
use icm_core::suggest::{suggest, DEFAULT_THRESHOLD};

// Re-export validators
pub use brackets::BracketBalanceValidator;
pub use fields::FieldValidator;
pub use recommended::{RecommendedFormatValidator, DEFAULT_FORMAT_KEYWORDS};
pub use required::RequiredParamsValidator;

/// Trait for ICM validators
///
/// Both hooks default to reporting nothing, so a validator only implements
/// the level it cares about.
pub trait Validator: Send + Sync {
    /// Get a human-readable name for this validator
    fn name(&self) -> &'static str {
        "unnamed"
    }

    /// Inspect the whole text, independent of block structure
    fn check_document(&self, _text: &str, _schema: &Schema) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Inspect one block whose keyword resolved to `keyword`
    fn check_block(
        &self,
        _block: &Block<'_>,
        _keyword: &KeywordSpec,
        _schema: &Schema,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Validation engine that orchestrates multiple validators
pub struct ValidationEngine {
    /// Registered validators, run in registration order
    validators: Vec<Box<dyn Validator>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Create a new empty validation engine
    ///
    /// Keyword resolution still happens without validators, so an empty
    /// engine reports unknown keywords and nothing else.
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Create an engine with the default validators
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_validator(Box::new(BracketBalanceValidator));
        engine.add_validator(Box::new(RecommendedFormatValidator::default()));
        engine.add_validator(Box::new(RequiredParamsValidator::default()));
        engine.add_validator(Box::new(FieldValidator));
        engine
    }

    /// Add a validator to the engine
    pub fn add_validator(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    /// Get the number of registered validators
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Get the names of all registered validators
    pub fn validator_names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Validate `text` against `schema`
    ///
    /// Diagnostics are ordered: document-level findings first, then
    /// per-block findings in block order.
    pub fn validate(&self, text: &str, schema: &Schema) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for validator in &self.validators {
            diagnostics.extend(validator.check_document(text, schema));
        }

        for block in scan_blocks(text) {
            let (keyword, span) = block.keyword();
            if keyword.is_empty() {
                continue;
            }

            let Some(spec) = schema.keyword(keyword) else {
                let mut diagnostic =
                    Diagnostic::error(format!("unknown keyword '{}'", keyword), span)
                        .with_code(DiagnosticCode::UnknownKeyword);
                if let Some(candidate) = suggest(keyword, schema.keyword_names(), DEFAULT_THRESHOLD)
                {
                    diagnostic = diagnostic.with_help(format!("did you mean '{}'?", candidate));
                }
                diagnostics.push(diagnostic);
                continue;
            };

            for validator in &self.validators {
                diagnostics.extend(validator.check_block(&block, spec, schema));
            }
        }

        diagnostics
    }

    /// Check if a text has any errors
    pub fn has_errors(&self, text: &str, schema: &Schema) -> bool {
        self.validate(text, schema).iter().any(|d| d.is_error())
    }
}

/// Validate `text` with the default engine
pub fn validate(text: &str, schema: &Schema) -> Vec<Diagnostic> {
    ValidationEngine::with_defaults().validate(text, schema)
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
