//! Hover documentation for keywords, functions and fields

use std::sync::OnceLock;

use regex::Regex;

use icm_core::diagnostics::Span;
use icm_core::schema::Schema;

fn word_re() -> &'static Regex {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RE.get_or_init(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap())
}

/// Identifier touching byte `offset`, with its span
///
/// A cursor directly after the last character still counts as on the word.
pub fn word_at(text: &str, offset: usize) -> Option<(&str, Span)> {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    let line = &text[line_start..line_end];
    let column = offset - line_start;

    word_re()
        .find_iter(line)
        .find(|m| m.start() <= column && column <= m.end())
        .map(|m| {
            (
                m.as_str(),
                Span::new(line_start + m.start(), line_start + m.end()),
            )
        })
}

/// Markdown hover content for `word`; keywords win over functions over fields
pub fn hover_markdown(word: &str, schema: &Schema) -> Option<String> {
    if let Some(keyword) = schema.keyword(word) {
        let mut md = code_block("icm-query", &keyword.name);
        if let Some(doc) = &keyword.doc {
            md.push_str(&format!("\n\n{}", doc));
        }
        if !keyword.required_params().is_empty() {
            md.push_str(&format!(
                "\n\n**Required parameters:** {}",
                inline_list(keyword.required_params())
            ));
        }
        return Some(md);
    }

    if let Some(function) = schema.function(word) {
        let mut md = code_block(
            "plaintext",
            function.signature.as_deref().unwrap_or(&function.name),
        );
        if let Some(doc) = &function.doc {
            md.push_str(&format!("\n\n{}", doc));
        }
        return Some(md);
    }

    let field = schema.field(word)?;
    let field_type = field.field_type.as_deref().unwrap_or("field");
    let mut md = code_block("plaintext", &format!("{}: {}", field.name, field_type));
    if let Some(doc) = &field.doc {
        md.push_str(&format!("\n\n{}", doc));
    }
    if let Some(values) = schema.enum_values_for(field) {
        md.push_str(&format!("\n\n**Values:** {}", inline_list(values)));
    }
    Some(md)
}

fn code_block(language: &str, code: &str) -> String {
    format!("```{}\n{}\n```", language, code)
}

fn inline_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("`{}`", s))
        .collect::<Vec<_>>()
        .join(", ")
}
