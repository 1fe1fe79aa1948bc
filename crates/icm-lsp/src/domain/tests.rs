//! TDD Test Suite for the domain intelligence engine
//!
//! Tests for validation conversion, completion, hover, code actions and
//! formatting.

use tower_lsp::lsp_types::{
    CompletionItemKind, DiagnosticSeverity, HoverContents, InsertTextFormat, NumberOrString,
    Position, Range, Url,
};

use icm_core::schema::Schema;

use super::DomainEngine;
use crate::config::Settings;

fn pos(line: u32, character: u32) -> Position {
    Position { line, character }
}

fn range(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Range {
    Range {
        start: pos(start_line, start_char),
        end: pos(end_line, end_char),
    }
}

fn schema() -> Schema {
    Schema::from_json_str(
        r#"{
            "keywords": [
                { "name": "Records", "doc": "Record selection", "required_params": ["Range", "Format"] },
                { "name": "Patient" },
                { "name": "Lab", "fields": ["Count", "Status"] }
            ],
            "functions": [
                { "name": "Sum", "signature": "Sum(field, range)", "doc": "Adds values", "args": ["field", "range"] },
                { "name": "Now" }
            ],
            "fields": [
                { "name": "Range", "doc": "Time window" },
                { "name": "Format" },
                { "name": "Count", "type": "number" },
                { "name": "Status", "type": "Enum:StatusKind", "doc": "Order status" }
            ],
            "enums": { "StatusKind": ["open", "closed"] },
            "examples": ["[Records: Format=x; Range=NOW]", "[Patient]"]
        }"#,
    )
    .unwrap()
}

fn uri() -> Url {
    Url::parse("file:///workspace/query.icm").unwrap()
}

// ==================== VALIDATION TESTS ====================

mod validation_tests {
    use super::*;

    #[test]
    fn test_diagnostics_are_converted() {
        let engine = DomainEngine::new();
        let text = "[Patient: Count=1]\n[Pateint: Count=1]";
        let diagnostics = engine.validate_document(text, &schema());

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.range, range(1, 1, 1, 8));
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diagnostic.code, Some(NumberOrString::String("ICM002".to_string())));
        assert_eq!(diagnostic.source.as_deref(), Some("icm"));
        assert_eq!(
            diagnostic.data,
            Some(serde_json::Value::String("did you mean 'Patient'?".to_string()))
        );
    }

    #[test]
    fn test_utf16_columns() {
        let engine = DomainEngine::new();
        let text = "😀 [Patient: Stat=open]";
        let diagnostics = engine.validate_document(text, &schema());

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range, range(0, 13, 0, 17));
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::ERROR));
    }

    #[test]
    fn test_warning_severity() {
        let engine = DomainEngine::new();
        let diagnostics = engine.validate_document("[Records: Format=x]", &schema());

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::WARNING));
        assert!(diagnostics[0].code.is_none());
    }

    #[test]
    fn test_settings_change_rules() {
        let settings = Settings::from_toml_str("[rules]\nrequired_params = \"ignore\"\n").unwrap();
        let engine = DomainEngine::with_settings(settings);
        assert!(engine.validate_document("[Records: Count=1; Format=x]", &schema()).is_empty());
    }
}

// ==================== COMPLETION TESTS ====================

mod completion_tests {
    use super::*;

    fn labels(text: &str, position: Position) -> Vec<String> {
        DomainEngine::new()
            .get_completions(text, position, &schema())
            .into_iter()
            .map(|c| c.label)
            .collect()
    }

    /// TEST 1: Keywords after '['
    #[test]
    fn test_keyword_completion() {
        let items = DomainEngine::new().get_completions("x [Re", pos(0, 5), &schema());
        let keywords: Vec<_> = items
            .iter()
            .filter(|c| c.kind == Some(CompletionItemKind::KEYWORD))
            .map(|c| c.label.as_str())
            .collect();

        assert_eq!(keywords, vec!["Records", "Patient", "Lab"]);
        assert!(items.iter().all(|c| c.kind != Some(CompletionItemKind::FIELD)));
    }

    /// TEST 2: Fields honour the keyword allow-list
    #[test]
    fn test_field_completion_allow_list() {
        let items = DomainEngine::new().get_completions("[Lab: Count=1; ", pos(0, 15), &schema());
        let fields: Vec<_> = items
            .iter()
            .filter(|c| c.kind == Some(CompletionItemKind::FIELD))
            .collect();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].label, "Count");
        assert_eq!(fields[0].detail.as_deref(), Some("number"));
        assert_eq!(fields[0].insert_text.as_deref(), Some("Count=${1}"));
        assert_eq!(fields[0].insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert_eq!(fields[1].label, "Status");
    }

    /// TEST 3: Unrestricted keyword offers all fields
    #[test]
    fn test_field_completion_unrestricted() {
        let labels = labels("[Patient: ", pos(0, 10));
        for field in ["Range", "Format", "Count", "Status"] {
            assert!(labels.contains(&field.to_string()), "missing {field}");
        }
    }

    /// TEST 4: Enum values after 'Field='
    #[test]
    fn test_enum_value_completion() {
        let items = DomainEngine::new().get_completions("[Lab: Status=", pos(0, 13), &schema());
        let values: Vec<_> = items
            .iter()
            .filter(|c| c.kind == Some(CompletionItemKind::ENUM_MEMBER))
            .collect();

        assert_eq!(values.len(), 2);
        assert_eq!(values[0].label, "open");
        assert_eq!(values[0].detail.as_deref(), Some("Status ∈ StatusKind"));
        assert!(items.iter().all(|c| c.kind != Some(CompletionItemKind::FIELD)));
    }

    /// TEST 5: Functions everywhere, as snippets
    #[test]
    fn test_function_completion() {
        let items = DomainEngine::new().get_completions("plain", pos(0, 5), &schema());
        let sum = items.iter().find(|c| c.label == "Sum").unwrap();

        assert_eq!(sum.kind, Some(CompletionItemKind::FUNCTION));
        assert_eq!(sum.detail.as_deref(), Some("Sum(field, range)"));
        assert_eq!(sum.insert_text.as_deref(), Some("Sum(${1:field}, ${2:range})"));

        let now = items.iter().find(|c| c.label == "Now").unwrap();
        assert_eq!(now.insert_text.as_deref(), Some("Now()"));
        assert_eq!(now.detail.as_deref(), Some("Now"));
    }

    /// TEST 6: Examples only on blank lines
    #[test]
    fn test_examples_on_blank_line() {
        let labels_blank = labels("[Patient]\n   \n", pos(1, 1));
        assert!(labels_blank.contains(&"Example 1".to_string()));
        assert!(labels_blank.contains(&"Example 2".to_string()));

        let labels_text = labels("[Patient] x", pos(0, 11));
        assert!(!labels_text.iter().any(|l| l.starts_with("Example")));
    }

    /// TEST 7: Settings disable functions and examples
    #[test]
    fn test_completion_settings() {
        let settings =
            Settings::from_toml_str("[completion]\nfunctions = false\nexamples = false\n").unwrap();
        let engine = DomainEngine::with_settings(settings);
        assert!(engine.get_completions("", pos(0, 0), &schema()).is_empty());
    }
}

// ==================== HOVER TESTS ====================

mod hover_tests {
    use super::*;

    fn hover_text(text: &str, position: Position) -> Option<String> {
        let hover = DomainEngine::new().get_hover(text, position, &schema())?;
        match hover.contents {
            HoverContents::Markup(markup) => Some(markup.value),
            _ => None,
        }
    }

    #[test]
    fn test_keyword_hover() {
        let md = hover_text("[Records: Format=x]", pos(0, 3)).unwrap();
        assert!(md.starts_with("```icm-query\nRecords\n```"));
        assert!(md.contains("Record selection"));
        assert!(md.contains("**Required parameters:** `Range`, `Format`"));
    }

    #[test]
    fn test_function_hover() {
        let md = hover_text("x Sum(a)", pos(0, 2)).unwrap();
        assert!(md.starts_with("```plaintext\nSum(field, range)\n```"));
        assert!(md.contains("Adds values"));
    }

    #[test]
    fn test_field_hover_with_enum_values() {
        let md = hover_text("[Lab: Status=open]", pos(0, 12)).unwrap();
        assert!(md.starts_with("```plaintext\nStatus: Enum:StatusKind\n```"));
        assert!(md.contains("Order status"));
        assert!(md.contains("**Values:** `open`, `closed`"));
    }

    #[test]
    fn test_hover_range() {
        let hover = DomainEngine::new()
            .get_hover("[Lab: Count=1]", pos(0, 8), &schema())
            .unwrap();
        assert_eq!(hover.range, Some(range(0, 6, 0, 11)));
    }

    #[test]
    fn test_no_hover() {
        assert!(hover_text("[Lab: Unknown=1]", pos(0, 8)).is_none());
        assert!(hover_text("[Lab:   ]", pos(0, 6)).is_none());
        assert!(hover_text("", pos(0, 0)).is_none());
    }
}

// ==================== CODE ACTION TESTS ====================

mod code_action_tests {
    use super::*;

    fn edits(action: &tower_lsp::lsp_types::CodeAction) -> Vec<tower_lsp::lsp_types::TextEdit> {
        action
            .edit
            .as_ref()
            .and_then(|e| e.changes.as_ref())
            .and_then(|c| c.get(&uri()))
            .cloned()
            .unwrap_or_default()
    }

    #[test]
    fn test_add_format_action() {
        let engine = DomainEngine::new();
        let text = "[Patient]\n[Records: Range=NOW]";
        let diagnostics = engine.validate_document(text, &schema());
        let actions = engine.get_code_actions(&uri(), text, &diagnostics, &schema());

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].is_preferred, Some(true));
        let edits = edits(&actions[0]);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].range, range(1, 19, 1, 19));
        assert_eq!(edits[0].new_text, " Format=!({})\\CR; ");
    }

    #[test]
    fn test_did_you_mean_keyword() {
        let engine = DomainEngine::new();
        let text = "[Pateint: Count=1]";
        let diagnostics = engine.validate_document(text, &schema());
        let actions = engine.get_code_actions(&uri(), text, &diagnostics, &schema());

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Did you mean 'Patient'?");
        let edits = edits(&actions[0]);
        assert_eq!(edits[0].range, range(0, 1, 0, 8));
        assert_eq!(edits[0].new_text, "Patient");
    }

    #[test]
    fn test_did_you_mean_field() {
        let engine = DomainEngine::new();
        let text = "[Patient: Cuont=1]";
        let diagnostics = engine.validate_document(text, &schema());
        let actions = engine.get_code_actions(&uri(), text, &diagnostics, &schema());

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Did you mean 'Count'?");
    }

    #[test]
    fn test_no_action_without_close_match() {
        let engine = DomainEngine::new();
        let text = "[Zzzzzz: Count=1] ]";
        let diagnostics = engine.validate_document(text, &schema());
        assert_eq!(diagnostics.len(), 2);
        assert!(engine.get_code_actions(&uri(), text, &diagnostics, &schema()).is_empty());
    }

    #[test]
    fn test_custom_format_snippet() {
        let settings =
            Settings::from_toml_str("[formatting]\nformat_snippet = \"; Format=y\"\n").unwrap();
        let engine = DomainEngine::with_settings(settings);
        let text = "[Records]";
        let diagnostics = engine.validate_document(text, &schema());
        let actions = engine.get_code_actions(&uri(), text, &diagnostics, &schema());

        let edits = edits(&actions[0]);
        assert_eq!(edits[0].range, range(0, 8, 0, 8));
        assert_eq!(edits[0].new_text, "; Format=y");
    }
}

// ==================== FORMATTING TESTS ====================

mod formatting_tests {
    use super::*;

    #[test]
    fn test_formatting_edits() {
        let engine = DomainEngine::new();
        let edits = engine.get_formatting("[Records:Format=x;Range=NOW]\n\n[Patient]   \n");

        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].range, range(0, 0, 0, 28));
        assert_eq!(edits[0].new_text, "[Records: Format = x; Range = NOW]");
        assert_eq!(edits[1].range, range(2, 0, 2, 12));
        assert_eq!(edits[1].new_text, "[Patient]");
    }

    #[test]
    fn test_formatted_text_has_no_edits() {
        let engine = DomainEngine::new();
        assert!(engine.get_formatting("[Records: Format = x]\n[Patient]").is_empty());
    }
}
