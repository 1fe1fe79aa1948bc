//! Configuration settings
//!
//! Every section and field has a default, so partial files are accepted.

use serde::{Deserialize, Serialize};

use icm_core::diagnostics::Severity;
use icm_validate::{
    BracketBalanceValidator, FieldValidator, RecommendedFormatValidator, RequiredParamsValidator,
    ValidationEngine, DEFAULT_FORMAT_KEYWORDS,
};

/// Insertion used by the "add Format" quick fix
pub const DEFAULT_FORMAT_SNIPPET: &str = r" Format=!({})\CR; ";

/// Severity levels for the configurable recommendation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Rule violations are errors
    Error,
    /// Rule violations are warnings
    #[default]
    Warning,
    /// Rule is disabled
    Ignore,
}

impl RuleSeverity {
    /// Diagnostic severity, `None` when the rule is disabled
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Error => Some(Severity::Error),
            RuleSeverity::Warning => Some(Severity::Warning),
            RuleSeverity::Ignore => None,
        }
    }

    /// Check if this severity means the rule is enabled
    pub fn is_enabled(self) -> bool {
        self != RuleSeverity::Ignore
    }
}

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Schema location
    pub schema: SchemaSettings,
    /// Validation rule settings
    pub rules: RuleSettings,
    /// Completion list settings
    pub completion: CompletionSettings,
    /// Formatting and quick-fix settings
    pub formatting: FormattingSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Parse settings from editor-supplied JSON (`initializationOptions`)
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Build a validation engine honouring the rule settings
    pub fn build_engine(&self) -> ValidationEngine {
        let mut engine = ValidationEngine::new();
        engine.add_validator(Box::new(BracketBalanceValidator));

        if let Some(severity) = self.rules.missing_format.to_severity() {
            engine.add_validator(Box::new(RecommendedFormatValidator::new(
                self.rules.format_keywords.iter().cloned(),
                severity,
            )));
        }
        if let Some(severity) = self.rules.required_params.to_severity() {
            engine.add_validator(Box::new(RequiredParamsValidator::new(severity)));
        }

        engine.add_validator(Box::new(FieldValidator));
        engine
    }
}

/// Schema location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchemaSettings {
    /// Schema file, absolute or relative to the workspace root
    pub path: Option<String>,
}

/// Validation rule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Severity of the missing `Format` recommendation (ICM001)
    pub missing_format: RuleSeverity,
    /// Severity of per-keyword required parameter warnings
    pub required_params: RuleSeverity,
    /// Keywords expected to carry a `Format` parameter
    pub format_keywords: Vec<String>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            missing_format: RuleSeverity::Warning,
            required_params: RuleSeverity::Warning,
            format_keywords: DEFAULT_FORMAT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Completion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Offer schema functions everywhere
    pub functions: bool,
    /// Offer schema examples on blank lines
    pub examples: bool,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            functions: true,
            examples: true,
        }
    }
}

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingSettings {
    /// Text inserted before `]` by the "add Format" quick fix
    pub format_snippet: String,
}

impl Default for FormattingSettings {
    fn default() -> Self {
        Self {
            format_snippet: DEFAULT_FORMAT_SNIPPET.to_string(),
        }
    }
}
