//! Quick fixes for ICM diagnostics
//!
//! Dispatch is keyed on the diagnostic code:
//! - `ICM001` inserts the Format snippet before the block's `]`
//! - `ICM002` / `ICM003` replace the name with the closest schema name

use std::collections::HashMap;
use std::str::FromStr;

use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, Diagnostic, NumberOrString, Range, TextEdit, Url, WorkspaceEdit,
};

use icm_core::diagnostics::DiagnosticCode;
use icm_core::line_index::LineIndex;
use icm_core::parser::scan_blocks;
use icm_core::schema::Schema;
use icm_core::suggest::{suggest, DEFAULT_THRESHOLD};

use super::convert::{to_position, to_span};

/// Parse the ICM code of an LSP diagnostic
pub fn diagnostic_code(diagnostic: &Diagnostic) -> Option<DiagnosticCode> {
    match diagnostic.code.as_ref()? {
        NumberOrString::String(code) => DiagnosticCode::from_str(code).ok(),
        NumberOrString::Number(_) => None,
    }
}

/// Quick fixes for the given diagnostics
pub fn code_actions(
    uri: &Url,
    text: &str,
    diagnostics: &[Diagnostic],
    schema: &Schema,
    format_snippet: &str,
) -> Vec<CodeAction> {
    let index = LineIndex::new(text);

    diagnostics
        .iter()
        .filter_map(|diagnostic| match diagnostic_code(diagnostic)? {
            DiagnosticCode::MissingFormat => {
                add_format_action(uri, text, &index, diagnostic, format_snippet)
            }
            DiagnosticCode::UnknownKeyword => {
                did_you_mean_action(uri, text, &index, diagnostic, schema.keyword_names())
            }
            DiagnosticCode::UnknownField => {
                did_you_mean_action(uri, text, &index, diagnostic, schema.field_names())
            }
            DiagnosticCode::InvalidBrackets | DiagnosticCode::DuplicateField => None,
        })
        .collect()
}

fn add_format_action(
    uri: &Url,
    text: &str,
    index: &LineIndex<'_>,
    diagnostic: &Diagnostic,
    snippet: &str,
) -> Option<CodeAction> {
    let offset = to_span(index, diagnostic.range).start;
    let block = scan_blocks(text).find(|b| b.span.contains(offset))?;
    let position = to_position(index, block.close_offset());

    let edit = TextEdit {
        range: Range::new(position, position),
        new_text: snippet.to_string(),
    };
    Some(quick_fix("Insert default \"Format\" parameter", uri, diagnostic, edit))
}

fn did_you_mean_action<'a>(
    uri: &Url,
    text: &str,
    index: &LineIndex<'_>,
    diagnostic: &Diagnostic,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<CodeAction> {
    let span = to_span(index, diagnostic.range);
    let misspelled = text.get(span.start..span.end)?;
    let best = suggest(misspelled, candidates, DEFAULT_THRESHOLD)?;

    let edit = TextEdit {
        range: diagnostic.range,
        new_text: best.to_string(),
    };
    Some(quick_fix(&format!("Did you mean '{}'?", best), uri, diagnostic, edit))
}

fn quick_fix(title: &str, uri: &Url, diagnostic: &Diagnostic, edit: TextEdit) -> CodeAction {
    let mut changes = HashMap::new();
    changes.insert(uri.clone(), vec![edit]);

    CodeAction {
        title: title.to_string(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic.clone()]),
        edit: Some(WorkspaceEdit {
            changes: Some(changes),
            document_changes: None,
            change_annotations: None,
        }),
        is_preferred: Some(true),
        ..Default::default()
    }
}
