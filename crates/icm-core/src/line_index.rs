//! Offset <-> line/column conversion
//!
//! Analysis works on byte offsets. Editors speak zero-based lines with
//! UTF-16 columns (LSP), humans read one-based lines and character
//! columns. `LineIndex` converts between them.

/// Precomputed line starts of a text
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based line containing `offset`
    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    fn clamp(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// Zero-based line and UTF-16 column of a byte offset
    pub fn utf16_position(&self, offset: usize) -> (u32, u32) {
        let offset = self.clamp(offset);
        let line = self.line_of(offset);
        let col: usize = self.text[self.line_starts[line]..offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        (line as u32, col as u32)
    }

    /// One-based line and character column of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = self.clamp(offset);
        let line = self.line_of(offset);
        let col = self.text[self.line_starts[line]..offset].chars().count();
        (line + 1, col + 1)
    }

    /// Byte offset of a zero-based line and UTF-16 column.
    ///
    /// Positions past the end of a line clamp to the line end, lines past
    /// the end of the text clamp to the text end.
    pub fn offset(&self, line: u32, utf16_col: u32) -> usize {
        let Some(&start) = self.line_starts.get(line as usize) else {
            return self.text.len();
        };
        let line_text = &self.text[start..self.line_end(line as usize)];

        let mut units = 0usize;
        for (i, ch) in line_text.char_indices() {
            if units >= utf16_col as usize {
                return start + i;
            }
            units += ch.len_utf16();
        }
        start + line_text.len()
    }

    /// Byte offset where a zero-based line's content ends (before `\r\n` or `\n`)
    pub fn line_end(&self, line: usize) -> usize {
        let end = match self.line_starts.get(line + 1) {
            Some(&next) => next - 1,
            None => self.text.len(),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(end);
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end - 1
        } else {
            end
        }
    }

    /// Content of a zero-based line, without its terminator
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let start = *self.line_starts.get(line)?;
        Some(&self.text[start..self.line_end(line)])
    }
}
