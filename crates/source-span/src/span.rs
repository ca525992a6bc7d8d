//! Byte spans into a source document.

use text_size::{TextRange, TextSize};

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)` in a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: ByteOffset,
    /// The end byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Returns the length of this span in bytes.
    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    #[inline]
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two spans share at least one byte.
    ///
    /// Two empty spans at the same offset also count as overlapping, so two
    /// insertions at one position are never both applied in a single pass.
    #[inline]
    pub fn overlaps(&self, other: Span) -> bool {
        if self.is_empty() && other.is_empty() {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }

    /// Returns the text this span covers, or `None` if it is out of bounds or
    /// does not fall on character boundaries.
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(usize::from(self.start)..usize::from(self.end))
    }

    #[inline]
    pub fn to_range(self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
        }
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        TextRange::new(span.start, span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice() {
        let text = "state.items.sort()";
        assert_eq!(Span::new(0u32, 11u32).slice(text), Some("state.items"));
        assert_eq!(Span::new(12u32, 16u32).slice(text), Some("sort"));
        assert_eq!(Span::new(10u32, 40u32).slice(text), None);
    }

    #[test]
    fn test_slice_rejects_split_char() {
        let text = "é.sort()";
        assert_eq!(Span::new(1u32, 2u32).slice(text), None);
        assert_eq!(Span::new(0u32, 2u32).slice(text), Some("é"));
    }

    #[test]
    fn test_overlaps() {
        let outer = Span::new(0u32, 20u32);
        let inner = Span::new(5u32, 10u32);
        let after = Span::new(20u32, 25u32);
        assert!(outer.overlaps(inner));
        assert!(inner.overlaps(outer));
        assert!(!outer.overlaps(after));
        assert!(Span::new(3u32, 3u32).overlaps(Span::new(3u32, 3u32)));
        assert!(!Span::new(3u32, 3u32).overlaps(Span::new(4u32, 4u32)));
    }

    #[test]
    fn test_contains_span() {
        let outer = Span::new(4u32, 30u32);
        assert!(outer.contains_span(Span::new(4u32, 30u32)));
        assert!(outer.contains_span(Span::new(10u32, 12u32)));
        assert!(!outer.contains_span(Span::new(2u32, 12u32)));
        assert_eq!(outer.len(), TextSize::from(26));
    }
}
