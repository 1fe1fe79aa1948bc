//! Bracket balance validator
//!
//! Checks that every `[` has a matching `]`, independent of block content.

use icm_core::diagnostics::{Diagnostic, DiagnosticCode, Span};
use icm_core::schema::Schema;

use crate::Validator;

/// Validates bracket balance over the whole text
///
/// # Diagnostic Codes
///
/// - `ICM004` (`INVALID_BRACKETS`): one per unmatched `]`, in text order,
///   then one per unmatched `[`, in text order.
///
/// # Example
///
/// ```
/// use icm_core::Schema;
/// use icm_validate::{BracketBalanceValidator, Validator};
///
/// let diagnostics = BracketBalanceValidator.check_document("] [A: x=1] [", &Schema::default());
/// assert_eq!(diagnostics.len(), 2);
/// ```
pub struct BracketBalanceValidator;

impl Validator for BracketBalanceValidator {
    fn name(&self) -> &'static str {
        "bracket-balance"
    }

    fn check_document(&self, text: &str, _schema: &Schema) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut open = Vec::new();

        for (offset, ch) in text.char_indices() {
            match ch {
                '[' => open.push(offset),
                ']' => {
                    if open.pop().is_none() {
                        diagnostics.push(
                            Diagnostic::error(
                                "unexpected closing bracket ']'",
                                Span::new(offset, offset + 1),
                            )
                            .with_code(DiagnosticCode::InvalidBrackets),
                        );
                    }
                }
                _ => {}
            }
        }

        for offset in open {
            diagnostics.push(
                Diagnostic::error("missing closing bracket ']'", Span::new(offset, offset + 1))
                    .with_code(DiagnosticCode::InvalidBrackets)
                    .with_help("close the block with ']'"),
            );
        }

        diagnostics
    }
}
