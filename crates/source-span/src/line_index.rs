//! Offset to line/column lookup.

use crate::{ByteOffset, Span};
use text_size::TextSize;

/// A 0-indexed line and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Start offsets of every line in a document, for binary-search lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<ByteOffset>,
    len: ByteOffset,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
        );

        Self {
            line_starts,
            len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a line/column position.
    ///
    /// Returns `None` for offsets past the end of the document. The end offset
    /// itself is valid so that empty spans at EOF can still be reported.
    pub fn line_col(&self, offset: ByteOffset) -> Option<LineCol> {
        if offset > self.len {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = u32::from(offset) - u32::from(self.line_starts[line]);

        Some(LineCol::new(line as u32, col))
    }

    /// Converts both ends of a span, falling back to the origin for bad offsets.
    pub fn span_bounds(&self, span: Span) -> (LineCol, LineCol) {
        let start = self.line_col(span.start).unwrap_or_default();
        let end = self.line_col(span.end).unwrap_or(start);
        (start, end)
    }

    /// Converts a line/column position back to a byte offset.
    pub fn offset(&self, pos: LineCol) -> Option<ByteOffset> {
        let start = *self.line_starts.get(pos.line as usize)?;
        let offset = start + TextSize::from(pos.col);
        (offset <= self.len).then_some(offset)
    }

    /// Returns the text of a 0-indexed line without its line terminator.
    pub fn line_text<'a>(&self, text: &'a str, line: u32) -> Option<&'a str> {
        let start = usize::from(*self.line_starts.get(line as usize)?);
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|&next| usize::from(next) - 1)
            .unwrap_or(text.len());
        text.get(start..end).map(|l| l.strip_suffix('\r').unwrap_or(l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: &str = "const store = {\n  getters: {\n    a: state => state.x.sort()\n  }\n};\n";

    #[test]
    fn test_line_col_of_method_token() {
        let index = LineIndex::new(STORE);
        let sort = STORE.find("sort").unwrap() as u32;
        assert_eq!(index.line_col(TextSize::from(sort)), Some(LineCol::new(2, 24)));
        assert_eq!(index.line_count(), 6);
    }

    #[test]
    fn test_end_of_document() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.line_col(TextSize::from(5)), Some(LineCol::new(1, 2)));
        assert_eq!(index.line_col(TextSize::from(6)), None);
    }

    #[test]
    fn test_offset_inverts_line_col() {
        let index = LineIndex::new(STORE);
        for offset in (0..STORE.len() as u32).step_by(7) {
            let offset = TextSize::from(offset);
            let pos = index.line_col(offset).unwrap();
            assert_eq!(index.offset(pos), Some(offset));
        }
    }

    #[test]
    fn test_line_text() {
        let text = "first\r\nsecond\nthird";
        let index = LineIndex::new(text);
        assert_eq!(index.line_text(text, 0), Some("first"));
        assert_eq!(index.line_text(text, 1), Some("second"));
        assert_eq!(index.line_text(text, 2), Some("third"));
        assert_eq!(index.line_text(text, 3), None);
    }

    #[test]
    fn test_span_bounds() {
        let index = LineIndex::new(STORE);
        let start = STORE.find("state.x").unwrap() as u32;
        let (from, to) = index.span_bounds(Span::new(start, start + 7));
        assert_eq!(from, LineCol::new(2, 16));
        assert_eq!(to, LineCol::new(2, 23));
    }
}
