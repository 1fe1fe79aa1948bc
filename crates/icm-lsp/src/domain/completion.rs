//! Completion items
//!
//! The cursor context decides the main list:
//! - keywords right after `[`
//! - fields of the active keyword at a field position
//! - enum values right after `Field=`
//!
//! Schema functions are offered everywhere, and schema examples when the
//! cursor line is blank.

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent,
    MarkupKind,
};

use icm_core::context::classify;
use icm_core::schema::{FunctionSpec, Schema};

use crate::config::CompletionSettings;

/// Completion items for a cursor at byte `offset` of `text`
pub fn complete(
    text: &str,
    offset: usize,
    schema: &Schema,
    settings: &CompletionSettings,
) -> Vec<CompletionItem> {
    let mut items = Vec::new();
    let ctx = classify(&text[..offset], schema);

    if ctx.expect_keyword {
        items.extend(schema.keywords.iter().map(|k| CompletionItem {
            label: k.name.clone(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some("Keyword".to_string()),
            documentation: k.doc.as_ref().map(|doc| markdown(doc.clone())),
            ..Default::default()
        }));
    }

    if let (true, Some(active)) = (ctx.expect_field, ctx.active_keyword.as_deref()) {
        let keyword = schema.keyword(active);
        items.extend(schema.fields_for_keyword(keyword).map(|f| CompletionItem {
            label: f.name.clone(),
            kind: Some(CompletionItemKind::FIELD),
            detail: Some(f.field_type.clone().unwrap_or_else(|| "field".to_string())),
            documentation: f.doc.clone().map(Documentation::String),
            insert_text: Some(format!("{}=${{1}}", f.name)),
            insert_text_format: Some(InsertTextFormat::SNIPPET),
            ..Default::default()
        }));
    }

    if let Some(field) = ctx.enum_for_field {
        let group = field.enum_group().unwrap_or_default();
        let values = schema.enum_values_for(field).unwrap_or_default();
        items.extend(values.iter().map(|v| CompletionItem {
            label: v.clone(),
            kind: Some(CompletionItemKind::ENUM_MEMBER),
            detail: Some(format!("{} ∈ {}", field.name, group)),
            ..Default::default()
        }));
    }

    if settings.functions {
        items.extend(schema.functions.iter().map(function_item));
    }

    if settings.examples && current_line(text, offset).trim().is_empty() {
        items.extend(schema.examples.iter().enumerate().map(|(i, example)| CompletionItem {
            label: format!("Example {}", i + 1),
            kind: Some(CompletionItemKind::SNIPPET),
            detail: Some("Schema example".to_string()),
            insert_text: Some(example.clone()),
            ..Default::default()
        }));
    }

    items
}

fn function_item(f: &FunctionSpec) -> CompletionItem {
    let args = f.args.as_deref().unwrap_or_default();
    let placeholders: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(i, arg)| format!("${{{}:{}}}", i + 1, arg))
        .collect();

    CompletionItem {
        label: f.name.clone(),
        kind: Some(CompletionItemKind::FUNCTION),
        detail: Some(f.signature.clone().unwrap_or_else(|| f.name.clone())),
        documentation: f.doc.clone().map(Documentation::String),
        insert_text: Some(format!("{}({})", f.name, placeholders.join(", "))),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        ..Default::default()
    }
}

/// The whole line containing `offset`, without its terminator
fn current_line(text: &str, offset: usize) -> &str {
    let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    text[start..end].trim_end_matches('\r')
}

fn markdown(value: String) -> Documentation {
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    })
}
