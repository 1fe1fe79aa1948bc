//! Line formatter
//!
//! Normalizes spacing inside the first block of each line:
//!
//! ```text
//! [Records:Format=x;Range = NOW,PAS ]   ->   [Records: Format = x; Range = NOW, PAS]
//! ```
//!
//! Trailing whitespace is removed from every non-blank line. Blank lines
//! are left alone.

use std::sync::OnceLock;

use regex::Regex;

use crate::diagnostics::Span;

/// Replacement of one line's content (line terminator excluded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    /// Zero-based line number
    pub line: usize,
    /// Byte span of the original line content
    pub span: Span,
    pub new_text: String,
}

struct SpacingRules {
    block: Regex,
    colon: Regex,
    equals: Regex,
    semicolon: Regex,
    comma: Regex,
}

fn rules() -> &'static SpacingRules {
    static RULES: OnceLock<SpacingRules> = OnceLock::new();
    RULES.get_or_init(|| SpacingRules {
        block: Regex::new(r"\[(.*?)\]").unwrap(),
        colon: Regex::new(r":\s*").unwrap(),
        equals: Regex::new(r"\s*=\s*").unwrap(),
        semicolon: Regex::new(r";\s*").unwrap(),
        comma: Regex::new(r",\s*").unwrap(),
    })
}

/// Format a single line (without its terminator)
pub fn format_line(line: &str) -> String {
    let line = line.trim_end();
    let rules = rules();

    let Some(content) = rules.block.captures(line).and_then(|cap| cap.get(1)) else {
        return line.to_string();
    };

    let spaced = rules.colon.replace(content.as_str(), ": ");
    let spaced = rules.equals.replace_all(&spaced, " = ");
    let spaced = rules.semicolon.replace_all(&spaced, "; ");
    let spaced = rules.comma.replace_all(&spaced, ", ");

    format!(
        "{}{}{}",
        &line[..content.start()],
        spaced.trim(),
        &line[content.end()..]
    )
}

/// Compute one edit per line whose formatting changes
pub fn format_document(text: &str) -> Vec<LineEdit> {
    let mut edits = Vec::new();
    let mut offset = 0;

    for (line_no, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if !line.trim().is_empty() {
            let formatted = format_line(line);
            if formatted != line {
                edits.push(LineEdit {
                    line: line_no,
                    span: Span::new(offset, offset + line.len()),
                    new_text: formatted,
                });
            }
        }
        offset += raw.len() + 1;
    }

    edits
}

/// Apply [`format_document`] and return the formatted text
pub fn format_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for edit in format_document(text) {
        out.push_str(&text[last..edit.span.start]);
        out.push_str(&edit.new_text);
        last = edit.span.end;
    }
    out.push_str(&text[last..]);
    out
}
