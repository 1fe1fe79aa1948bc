//! Per-keyword required parameters
//!
//! Driven by `required_params` of the keyword spec. Blocks without a `:`
//! carry no parameters at all and are not checked.

use icm_core::diagnostics::{Diagnostic, Severity};
use icm_core::parser::Block;
use icm_core::schema::{KeywordSpec, Schema};

use crate::Validator;

/// Warns once per required parameter that has no assignment in the body
pub struct RequiredParamsValidator {
    severity: Severity,
}

impl Default for RequiredParamsValidator {
    fn default() -> Self {
        Self::new(Severity::Warning)
    }
}

impl RequiredParamsValidator {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `body` assigns `param`: a word boundary before the name, then
/// optional whitespace and `=`
fn assigns(body: &str, param: &str) -> bool {
    let Some(first) = param.chars().next() else {
        return false;
    };

    body.match_indices(param).any(|(i, _)| {
        let after_word = body[..i].chars().next_back().is_some_and(is_word);
        after_word != is_word(first) && body[i + param.len()..].trim_start().starts_with('=')
    })
}

impl Validator for RequiredParamsValidator {
    fn name(&self) -> &'static str {
        "required-params"
    }

    fn check_block(&self, block: &Block<'_>, keyword: &KeywordSpec, _schema: &Schema) -> Vec<Diagnostic> {
        let Some(body) = block.body else {
            return Vec::new();
        };

        let (_, span) = block.keyword();
        keyword
            .required_params()
            .iter()
            .filter(|param| !assigns(body.text, param))
            .map(|param| {
                Diagnostic::new(
                    self.severity,
                    format!("parameter '{}' is recommended for keyword '{}'", param, keyword.name),
                    span,
                )
            })
            .collect()
    }
}
