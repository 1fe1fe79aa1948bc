//! Field occurrence validator
//!
//! Walks the `key=value` occurrences of a block body and checks, in order:
//! duplicates, unknown fields, the keyword's field allow-list, then the
//! value against the field's type. The first failing check ends the
//! checks for that occurrence.

use std::collections::HashSet;

use icm_core::diagnostics::{Diagnostic, DiagnosticCode};
use icm_core::parser::{split_fields, Block, FieldOccurrence};
use icm_core::range::is_valid_range;
use icm_core::schema::{FieldSpec, KeywordSpec, Schema};
use icm_core::suggest::{suggest, DEFAULT_THRESHOLD};
use icm_core::value::normalize_value;

use crate::Validator;

/// Name of the field whose values follow the range grammar
const RANGE_FIELD: &str = "Range";

/// Validates the fields of every block with a `:`
///
/// # Diagnostic Codes
///
/// - `ICM005` (`DUPLICATE_FIELD`): a key repeated in the same block,
///   compared case-insensitively
/// - `ICM003` (`UNKNOWN_FIELD`): a key missing from the schema
///
/// Allow-list, range, number and enum violations are uncoded errors.
pub struct FieldValidator;

impl FieldValidator {
    fn check_value(
        &self,
        occurrence: &FieldOccurrence<'_>,
        field: &FieldSpec,
        schema: &Schema,
    ) -> Option<Diagnostic> {
        let value = normalize_value(occurrence.value)?;
        let span = occurrence.value_span;

        if field.name == RANGE_FIELD {
            if !is_valid_range(value, schema) {
                return Some(
                    Diagnostic::error(format!("invalid value '{}' for field 'Range'", value), span)
                        .with_help("expected a range option or timepoints like NOW-3d...NOW"),
                );
            }
        } else if field.is_number() {
            if !is_number(value) {
                return Some(Diagnostic::error(
                    format!("field '{}' expects a number, got '{}'", field.name, value),
                    span,
                ));
            }
        } else if let Some(allowed) = schema.enum_values_for(field) {
            if !allowed.iter().any(|v| v == value) {
                return Some(Diagnostic::error(
                    format!(
                        "invalid value '{}' for field '{}', allowed: {}",
                        value,
                        field.name,
                        allowed.join(", ")
                    ),
                    span,
                ));
            }
        }

        None
    }
}

/// Finite decimal numbers, plus the spelled-out `Infinity`
fn is_number(value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => true,
        Ok(_) => value.trim_start_matches(['+', '-']) == "Infinity",
        Err(_) => false,
    }
}

impl Validator for FieldValidator {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn check_block(&self, block: &Block<'_>, keyword: &KeywordSpec, schema: &Schema) -> Vec<Diagnostic> {
        let Some(body) = block.body else {
            return Vec::new();
        };

        let mut diagnostics = Vec::new();
        let mut seen = HashSet::new();

        for occurrence in split_fields(body) {
            let key = occurrence.key;

            if !seen.insert(key.to_lowercase()) {
                diagnostics.push(
                    Diagnostic::error(format!("duplicate field '{}' in block", key), occurrence.key_span)
                        .with_code(DiagnosticCode::DuplicateField),
                );
                continue;
            }

            let Some(field) = schema.field(key) else {
                let mut diagnostic =
                    Diagnostic::error(format!("unknown field '{}'", key), occurrence.key_span)
                        .with_code(DiagnosticCode::UnknownField);
                let candidates = schema.fields_for_keyword(Some(keyword)).map(|f| f.name.as_str());
                if let Some(candidate) = suggest(key, candidates, DEFAULT_THRESHOLD) {
                    diagnostic = diagnostic.with_help(format!("did you mean '{}'?", candidate));
                }
                diagnostics.push(diagnostic);
                continue;
            };

            if !keyword.allows_field(key) {
                diagnostics.push(Diagnostic::error(
                    format!("field '{}' is not valid for keyword '{}'", key, keyword.name),
                    occurrence.key_span,
                ));
                continue;
            }

            diagnostics.extend(self.check_value(&occurrence, field, schema));
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icm_core::diagnostics::Span;
    use icm_core::parser::scan_blocks;

    fn schema() -> Schema {
        Schema::from_json_str(
            r#"{
                "keywords": [
                    { "name": "Patient" },
                    { "name": "Lab", "fields": ["Range", "Count"] }
                ],
                "fields": [
                    { "name": "Range" },
                    { "name": "Count", "type": "number" },
                    { "name": "Status", "type": "Enum:StatusKind" },
                    { "name": "Note", "type": "Enum:Missing" }
                ],
                "enums": {
                    "StatusKind": ["open", "closed"],
                    "RangeOptions": ["LAST_STAY"]
                }
            }"#,
        )
        .unwrap()
    }

    fn check(text: &str) -> Vec<Diagnostic> {
        let schema = schema();
        let block = scan_blocks(text).next().unwrap();
        let keyword = schema.keyword(block.keyword().0).unwrap();
        FieldValidator.check_block(&block, keyword, &schema)
    }

    #[test]
    fn test_valid_fields() {
        assert!(check("[Patient: Range=NOW-3d...NOW; Count=12.5; Status=open]").is_empty());
        assert!(check("[Patient: Range=LAST_STAY]").is_empty());
        assert!(check("[Patient]").is_empty());
        assert!(check("[Patient: ]").is_empty());
    }

    #[test]
    fn test_duplicate_is_reported_once_and_not_rechecked() {
        let text = "[Patient: Count=1; count=oops]";
        let diagnostics = check(text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(DiagnosticCode::DuplicateField));
        assert_eq!(&text[diagnostics[0].span.start..diagnostics[0].span.end], "count");
    }

    #[test]
    fn test_unknown_field() {
        let text = "[Patient: Stauts=open]";
        let diagnostics = check(text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(DiagnosticCode::UnknownField));
        assert_eq!(diagnostics[0].span, Span::new(10, 16));
        assert_eq!(diagnostics[0].help.as_deref(), Some("did you mean 'Status'?"));
    }

    #[test]
    fn test_allow_list() {
        let diagnostics = check("[Lab: Count=1; Status=open]");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "field 'Status' is not valid for keyword 'Lab'");
        assert!(diagnostics[0].code.is_none());
    }

    #[test]
    fn test_range_value() {
        let text = "[Patient: Range = NOW...NOW+3d...NOW ]";
        let diagnostics = check(text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            &text[diagnostics[0].span.start..diagnostics[0].span.end],
            "NOW...NOW+3d...NOW"
        );
    }

    #[test]
    fn test_number_value() {
        let diagnostics = check("[Patient: Count=ten]");
        assert_eq!(diagnostics[0].message, "field 'Count' expects a number, got 'ten'");
        assert_eq!(check("[Patient: Count=NaN]").len(), 1);
        assert!(check("[Patient: Count=\"-3\"]").is_empty());
    }

    #[test]
    fn test_number_rejects_infinity_shorthands() {
        for value in ["inf", "infinity", "-inf", "+INF", "nan"] {
            let diagnostics = check(&format!("[Patient: Count={}]", value));
            assert_eq!(diagnostics.len(), 1, "{} should be rejected", value);
        }
        assert!(check("[Patient: Count=Infinity]").is_empty());
        assert!(check("[Patient: Count=-Infinity]").is_empty());
        assert!(check("[Patient: Count=1e3]").is_empty());
    }

    #[test]
    fn test_empty_key_is_unknown_field() {
        let diagnostics = check("[Patient: =2]");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(DiagnosticCode::UnknownField));
        assert_eq!(diagnostics[0].message, "unknown field ''");
        assert_eq!(diagnostics[0].span, Span::new(10, 10));
        assert!(diagnostics[0].help.is_none());
    }

    #[test]
    fn test_enum_value() {
        let diagnostics = check("[Patient: Status='pending']");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "invalid value 'pending' for field 'Status', allowed: open, closed"
        );
        assert!(check("[Patient: Note=anything]").is_empty());
    }

    #[test]
    fn test_opaque_values_are_exempt() {
        assert!(check("[Patient: Count=a,b; Status=x y; Range={expr}]").is_empty());
        assert!(check("[Patient: Status=\"\"]").is_empty());
    }

    #[test]
    fn test_quoted_semicolon_does_not_split() {
        let diagnostics = check("[Patient: Status=\"open;closed\"; Count=2]");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.starts_with("invalid value 'open;closed'"));
    }
}
