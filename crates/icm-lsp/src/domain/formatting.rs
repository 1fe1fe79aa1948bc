//! Document formatting edits

use tower_lsp::lsp_types::TextEdit;

use icm_core::format::format_document;
use icm_core::line_index::LineIndex;

use super::convert::to_range;

/// One replace edit per line whose formatting changes
pub fn formatting_edits(text: &str) -> Vec<TextEdit> {
    let index = LineIndex::new(text);
    format_document(text)
        .into_iter()
        .map(|edit| TextEdit {
            range: to_range(&index, edit.span),
            new_text: edit.new_text,
        })
        .collect()
}
