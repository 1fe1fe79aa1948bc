//! Recommended `Format` parameter
//!
//! A small set of keywords is expected to always carry a `Format=`
//! assignment. The list is matched case-insensitively against the
//! keyword's name and defaults to [`DEFAULT_FORMAT_KEYWORDS`].

use std::sync::OnceLock;

use regex::Regex;

use icm_core::diagnostics::{Diagnostic, DiagnosticCode, Severity};
use icm_core::parser::Block;
use icm_core::schema::{KeywordSpec, Schema};

use crate::Validator;

/// Keywords that should carry a `Format` parameter
pub const DEFAULT_FORMAT_KEYWORDS: &[&str] = &["records", "codes", "orders"];

fn format_assignment_re() -> &'static Regex {
    static FORMAT_RE: OnceLock<Regex> = OnceLock::new();
    FORMAT_RE.get_or_init(|| Regex::new(r"(?i)format\s*=").unwrap())
}

/// Warns when a Format keyword block has no `Format=` assignment
///
/// # Diagnostic Codes
///
/// - `ICM001` (`MISSING_FORMAT`): reported at the keyword
pub struct RecommendedFormatValidator {
    keywords: Vec<String>,
    severity: Severity,
}

impl Default for RecommendedFormatValidator {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT_KEYWORDS.iter().map(|k| k.to_string()), Severity::Warning)
    }
}

impl RecommendedFormatValidator {
    pub fn new(keywords: impl IntoIterator<Item = String>, severity: Severity) -> Self {
        Self {
            keywords: keywords.into_iter().collect(),
            severity,
        }
    }

    fn applies_to(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }
}

impl Validator for RecommendedFormatValidator {
    fn name(&self) -> &'static str {
        "recommended-format"
    }

    fn check_block(&self, block: &Block<'_>, keyword: &KeywordSpec, _schema: &Schema) -> Vec<Diagnostic> {
        if !self.applies_to(&keyword.name) || format_assignment_re().is_match(block.content.text) {
            return Vec::new();
        }

        let (_, span) = block.keyword();
        vec![Diagnostic::new(
            self.severity,
            format!("recommended parameter 'Format' is missing for keyword '{}'", keyword.name),
            span,
        )
        .with_code(DiagnosticCode::MissingFormat)
        .with_help("add a Format=... assignment to the block")]
    }
}
