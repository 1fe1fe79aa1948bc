//! Conversion between core types and LSP types
//!
//! Core spans are byte offsets; LSP positions are zero-based lines with
//! UTF-16 columns.

use serde_json::Value;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use icm_core::diagnostics::{Diagnostic as IcmDiagnostic, Severity, Span};
use icm_core::line_index::LineIndex;

/// Source name attached to published diagnostics
pub const DIAGNOSTIC_SOURCE: &str = "icm";

pub fn to_position(index: &LineIndex<'_>, offset: usize) -> Position {
    let (line, character) = index.utf16_position(offset);
    Position::new(line, character)
}

pub fn to_range(index: &LineIndex<'_>, span: Span) -> Range {
    Range {
        start: to_position(index, span.start),
        end: to_position(index, span.end),
    }
}

pub fn to_offset(index: &LineIndex<'_>, position: Position) -> usize {
    index.offset(position.line, position.character)
}

/// Byte span of an LSP range
pub fn to_span(index: &LineIndex<'_>, range: Range) -> Span {
    Span::new(to_offset(index, range.start), to_offset(index, range.end))
}

/// Convert an ICM diagnostic to an LSP diagnostic
pub fn to_lsp_diagnostic(diag: &IcmDiagnostic, index: &LineIndex<'_>) -> Diagnostic {
    let severity = match diag.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic {
        range: to_range(index, diag.span),
        severity: Some(severity),
        code: diag
            .code
            .map(|c| NumberOrString::String(c.as_str().to_string())),
        code_description: None,
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diag.message.clone(),
        related_information: None,
        tags: None,
        data: diag.help.as_ref().map(|h| Value::String(h.clone())),
    }
}
