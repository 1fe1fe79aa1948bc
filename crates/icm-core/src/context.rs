//! Cursor-context classification
//!
//! Decides what kind of token a completion list should offer at the
//! cursor: a keyword right after `[`, a field name after `Keyword:` or
//! `;`, or an enum value right after `Field=`.
//!
//! Only the last [`CONTEXT_WINDOW`] characters before the cursor are
//! inspected, which keeps the per-keystroke cost bounded. A block whose
//! opening `[` lies further back is not recognized.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::{FieldSpec, Schema};

/// Number of characters before the cursor considered for classification
pub const CONTEXT_WINDOW: usize = 200;

/// What the completion feature should offer at a cursor position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorContext<'s> {
    /// Cursor is in a block header (no `:` yet)
    pub expect_keyword: bool,
    /// Cursor is at a field-name position
    pub expect_field: bool,
    /// Keyword of the enclosing block (the partial name while typing it)
    pub active_keyword: Option<String>,
    /// Enum-typed field whose value is being typed
    pub enum_for_field: Option<&'s FieldSpec>,
}

impl CursorContext<'_> {
    /// Whether the cursor is inside an open block
    pub fn is_inside_block(&self) -> bool {
        self.expect_keyword || self.active_keyword.is_some()
    }
}

/// Trailing `Field=` followed only by whitespace
fn field_assignment_re() -> &'static Regex {
    static ASSIGN_RE: OnceLock<Regex> = OnceLock::new();
    ASSIGN_RE.get_or_init(|| Regex::new(r"([A-Za-z0-9_. +\-]+)=\s*$").unwrap())
}

/// Last `CONTEXT_WINDOW` characters of `text`
fn window(text: &str) -> &str {
    let skip = text.chars().count().saturating_sub(CONTEXT_WINDOW);
    match text.char_indices().nth(skip) {
        Some((start, _)) => &text[start..],
        None => "",
    }
}

/// Classify the cursor context from the text preceding the cursor.
pub fn classify<'s>(text_before_cursor: &str, schema: &'s Schema) -> CursorContext<'s> {
    let mut ctx = CursorContext::default();
    let slice = window(text_before_cursor);

    let Some(open) = slice.rfind('[') else {
        return ctx;
    };
    if slice.rfind(']').is_some_and(|close| close > open) {
        return ctx;
    }

    let block = &slice[open + 1..];
    match block.find(':') {
        None => {
            ctx.expect_keyword = true;
            ctx.active_keyword = Some(block.trim().to_string());
        }
        Some(colon) => {
            ctx.active_keyword = Some(block[..colon].trim().to_string());
            let body = &block[colon + 1..];
            let current = body.rsplit(';').next().unwrap_or(body);
            ctx.expect_field = !current.contains('=');
        }
    }

    if let Some(cap) = field_assignment_re().captures(block) {
        let key = cap[1].trim();
        if let Some(field) = schema.field(key) {
            if schema.enum_values_for(field).is_some() {
                ctx.enum_for_field = Some(field);
                ctx.expect_field = false;
            }
        }
    }

    ctx
}
