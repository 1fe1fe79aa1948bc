//! Tolerant block and field scanner
//!
//! The scanner never fails: it finds every `[`...`]` span using a
//! shortest-match rule (a block ends at the first `]` after its `[`), and
//! splits a block body into `key=value` occurrences. Every piece carries
//! its absolute byte offset into the original text, so diagnostics point
//! at the right place even when the same token appears several times.
//!
//! # Example
//!
//! ```
//! use icm_core::parser::{scan_blocks, split_fields};
//!
//! let text = r#"[Records: Format="a;b"; Range=NOW]"#;
//! let block = scan_blocks(text).next().unwrap();
//! assert_eq!(block.keyword().0, "Records");
//!
//! let fields = split_fields(block.body.unwrap());
//! assert_eq!(fields.len(), 2);
//! assert_eq!(fields[0].value, r#""a;b""#);
//! assert_eq!(&text[fields[1].key_span.start..fields[1].key_span.end], "Range");
//! ```

use crate::diagnostics::Span;

/// A slice of the source text together with its absolute offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Segment<'a> {
    pub fn new(text: &'a str, offset: usize) -> Self {
        Self { text, offset }
    }

    /// Absolute span of the whole segment
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.text.len())
    }

    /// Trimmed text and the absolute span it occupies
    pub fn trimmed(&self) -> (&'a str, Span) {
        let lead = self.text.len() - self.text.trim_start().len();
        let trimmed = self.text.trim();
        let start = self.offset + lead;
        (trimmed, Span::new(start, start + trimmed.len()))
    }

    /// Sub-segment for a byte range relative to this segment
    pub fn slice(&self, start: usize, end: usize) -> Segment<'a> {
        Segment::new(&self.text[start..end], self.offset + start)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One bracket-delimited block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// Span including both brackets
    pub span: Span,
    /// Text between the brackets
    pub content: Segment<'a>,
    /// Text before the first `:` (the whole content when there is none)
    pub header: Segment<'a>,
    /// Text after the first `:`; `None` when the block has no colon
    pub body: Option<Segment<'a>>,
}

impl<'a> Block<'a> {
    fn from_content(content: Segment<'a>) -> Self {
        let (header, body) = match content.text.find(':') {
            Some(colon) => (
                content.slice(0, colon),
                Some(content.slice(colon + 1, content.text.len())),
            ),
            None => (content, None),
        };

        Self {
            span: Span::new(content.offset - 1, content.offset + content.text.len() + 1),
            content,
            header,
            body,
        }
    }

    /// Trimmed keyword name and its span
    pub fn keyword(&self) -> (&'a str, Span) {
        self.header.trimmed()
    }

    /// Offset of the closing `]`
    pub fn close_offset(&self) -> usize {
        self.span.end - 1
    }
}

/// Iterator over the blocks of a document, in document order
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.pos..)?;
        let open = self.pos + rest.find('[')?;
        let close = open + 1 + self.text[open + 1..].find(']')?;
        self.pos = close + 1;

        let content = Segment::new(&self.text[open + 1..close], open + 1);
        Some(Block::from_content(content))
    }
}

/// Scan `text` for `[`...`]` blocks
pub fn scan_blocks(text: &str) -> Blocks<'_> {
    Blocks { text, pos: 0 }
}

/// One `key=value` occurrence inside a block body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOccurrence<'a> {
    /// Trimmed key
    pub key: &'a str,
    pub key_span: Span,
    /// Trimmed raw value (quotes included)
    pub value: &'a str,
    pub value_span: Span,
}

/// Split a block body into field occurrences.
///
/// A `;` only separates when an even number of `"` follows it up to the
/// end of the body, so quoted content may contain semicolons. Blank parts
/// and parts without `=` are skipped; an empty key is kept so it can be
/// reported.
pub fn split_fields(body: Segment<'_>) -> Vec<FieldOccurrence<'_>> {
    split_parts(body)
        .into_iter()
        .filter(|part| !part.is_blank())
        .filter_map(|part| {
            let eq = part.text.find('=')?;
            let (key, key_span) = part.slice(0, eq).trimmed();
            let (value, value_span) = part.slice(eq + 1, part.text.len()).trimmed();
            Some(FieldOccurrence {
                key,
                key_span,
                value,
                value_span,
            })
        })
        .collect()
}

/// Quote-aware split on `;`
fn split_parts(body: Segment<'_>) -> Vec<Segment<'_>> {
    let total_quotes = body.text.matches('"').count();
    let mut seen_quotes = 0;
    let mut start = 0;
    let mut parts = Vec::new();

    for (i, ch) in body.text.char_indices() {
        match ch {
            '"' => seen_quotes += 1,
            ';' if (total_quotes - seen_quotes) % 2 == 0 => {
                parts.push(body.slice(start, i));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(body.slice(start, body.text.len()));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str, span: Span) -> &str {
        &text[span.start..span.end]
    }

    #[test]
    fn test_scan_finds_blocks_in_order() {
        let text = "[A: x=1] text [B] [C:]";
        let blocks: Vec<_> = scan_blocks(text).collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].keyword().0, "A");
        assert_eq!(blocks[1].keyword().0, "B");
        assert!(blocks[1].body.is_none());
        assert_eq!(blocks[2].body.map(|b| b.text), Some(""));
        assert_eq!(at(text, blocks[1].span), "[B]");
        assert_eq!(blocks[1].close_offset(), 16);
    }

    #[test]
    fn test_scan_uses_shortest_match() {
        let text = "[A [B] C]";
        let blocks: Vec<_> = scan_blocks(text).collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content.text, "A [B");
    }

    #[test]
    fn test_scan_tolerates_unbalanced_brackets() {
        assert_eq!(scan_blocks("]] [A").count(), 0);
        assert_eq!(scan_blocks("").count(), 0);
        assert_eq!(scan_blocks("no brackets").count(), 0);
        assert_eq!(scan_blocks("[A] [B").count(), 1);
    }

    #[test]
    fn test_keyword_span_excludes_whitespace() {
        let text = "x [  Records  : Format=1]";
        let block = scan_blocks(text).next().unwrap();
        let (name, span) = block.keyword();
        assert_eq!(name, "Records");
        assert_eq!(at(text, span), "Records");
        assert_eq!(span.start, 5);
    }

    #[test]
    fn test_split_respects_quotes() {
        let text = r#"[K: A="x;y"; B=2]"#;
        let body = scan_blocks(text).next().unwrap().body.unwrap();
        let fields = split_fields(body);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].key, "A");
        assert_eq!(fields[0].value, r#""x;y""#);
        assert_eq!(fields[1].key, "B");
        assert_eq!(fields[1].value, "2");
        assert_eq!(at(text, fields[0].value_span), r#""x;y""#);
        assert_eq!(at(text, fields[1].value_span), "2");
    }

    #[test]
    fn test_split_offsets_with_repeated_tokens() {
        let text = "[K: A=A; A = A ]";
        let body = scan_blocks(text).next().unwrap().body.unwrap();
        let fields = split_fields(body);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].key_span, Span::new(9, 10));
        assert_eq!(fields[1].value_span, Span::new(13, 14));
    }

    #[test]
    fn test_split_skips_parts_without_assignment() {
        let text = "[K: A=1; ; orphan; =2; B=]";
        let body = scan_blocks(text).next().unwrap().body.unwrap();
        let fields = split_fields(body);

        let keys: Vec<_> = fields.iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["A", "", "B"]);
        assert_eq!(fields[1].value, "2");
        assert_eq!(fields[2].value, "");
    }

    #[test]
    fn test_empty_key_has_zero_width_span() {
        let text = "[K: =2]";
        let body = scan_blocks(text).next().unwrap().body.unwrap();
        let fields = split_fields(body);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, "");
        assert!(fields[0].key_span.is_empty());
        assert_eq!(fields[0].value_span, Span::new(5, 6));
    }

    #[test]
    fn test_value_keeps_inner_equals() {
        let text = "[K: A=x=y]";
        let body = scan_blocks(text).next().unwrap().body.unwrap();
        let fields = split_fields(body);
        assert_eq!(fields[0].value, "x=y");
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "ÄÖ [K: Ü=1]";
        let block = scan_blocks(text).next().unwrap();
        let fields = split_fields(block.body.unwrap());
        assert_eq!(at(text, fields[0].key_span), "Ü");
        assert_eq!(at(text, block.keyword().1), "K");
    }
}
