//! Library integration tests for icm-lsp
//!
//! These tests drive the crate through its public API only, the same way
//! the CLI and editor integrations do.

use std::fs;

use tempfile::TempDir;
use tower_lsp::lsp_types::{NumberOrString, Position, Url};

use icm_core::schema::Schema;
use icm_lsp::config::{load_schema, load_workspace_settings, DEFAULT_SCHEMA_PATH};
use icm_lsp::{DomainEngine, Settings, RELOAD_SCHEMA_COMMAND};

const SCHEMA_JSON: &str = r#"{
    "keywords": [
        { "name": "Records", "doc": "Record selection" },
        { "name": "Patient" }
    ],
    "fields": [
        { "name": "Format" },
        { "name": "Count", "type": "number" }
    ]
}"#;

fn schema() -> Schema {
    Schema::from_json_str(SCHEMA_JSON).unwrap()
}

fn has_code(diagnostics: &[tower_lsp::lsp_types::Diagnostic], code: &str) -> bool {
    diagnostics
        .iter()
        .any(|d| d.code == Some(NumberOrString::String(code.to_string())))
}

#[test]
fn test_library_engine_access() {
    // The engine is usable without a running server
    let engine = DomainEngine::new();
    assert!(engine.validate_document("", &schema()).is_empty());
    assert_eq!(engine.settings(), &Settings::default());
}

#[test]
fn test_reload_command_name() {
    assert_eq!(RELOAD_SCHEMA_COMMAND, "icm.reloadSchema");
}

#[test]
fn test_missing_format_follows_settings() {
    let text = "[Records]";

    let default_engine = DomainEngine::new();
    let diagnostics = default_engine.validate_document(text, &schema());
    assert!(has_code(&diagnostics, "ICM001"));

    let settings = Settings::from_toml_str("[rules]\nmissing_format = \"ignore\"\n").unwrap();
    let quiet_engine = DomainEngine::with_settings(settings);
    let diagnostics = quiet_engine.validate_document(text, &schema());
    assert!(!has_code(&diagnostics, "ICM001"));
}

#[test]
fn test_diagnostics_feed_code_actions() {
    let engine = DomainEngine::new();
    let text = "[Records]";
    let uri = Url::parse("file:///workspace/query.icm").unwrap();

    let diagnostics = engine.validate_document(text, &schema());
    let actions = engine.get_code_actions(&uri, text, &diagnostics, &schema());

    assert_eq!(actions.len(), 1);
    let edits = &actions[0].edit.as_ref().unwrap().changes.as_ref().unwrap()[&uri];
    assert_eq!(edits[0].range.start, Position::new(0, 8));
    assert_eq!(edits[0].new_text, engine.settings().formatting.format_snippet);
}

#[test]
fn test_keyword_completion() {
    let engine = DomainEngine::new();
    let items = engine.get_completions("[Rec", Position::new(0, 4), &schema());

    assert!(items.iter().any(|item| item.label == "Records"));
    assert!(items.iter().any(|item| item.label == "Patient"));
}

#[test]
fn test_workspace_loading() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join(DEFAULT_SCHEMA_PATH);
    fs::create_dir_all(schema_path.parent().unwrap()).unwrap();
    fs::write(&schema_path, SCHEMA_JSON).unwrap();
    fs::write(
        dir.path().join("icm.toml"),
        "[completion]\nexamples = false\n",
    )
    .unwrap();

    let settings = load_workspace_settings(Some(dir.path()));
    assert!(!settings.completion.examples);

    let loaded = load_schema(&settings, Some(dir.path()));
    assert_eq!(loaded, schema());
}

#[test]
fn test_missing_workspace_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = load_workspace_settings(Some(dir.path()));
    assert_eq!(settings, Settings::default());
    assert_eq!(load_schema(&settings, Some(dir.path())), Schema::default());
}
