use std::ops::Range;

/// A byte range `[start, end)` into the document source.
///
/// Tree nodes store spans rather than copied text, so slicing the source with
/// a node's span reproduces the exact bytes the node was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns the sub-span `[start + range.start, start + range.end)`.
    #[must_use]
    pub fn sub(self, range: Range<usize>) -> Self {
        Self {
            start: self.start + range.start,
            end: self.start + range.end,
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_saturates_on_inverted_span() {
        assert_eq!(Span::new(5, 2).len(), 0);
        assert!(Span::new(5, 2).is_empty());
    }

    #[test]
    fn sub_is_relative_to_start() {
        let span = Span::new(10, 20);
        assert_eq!(span.sub(1..4), Span::new(11, 14));
    }

    #[test]
    fn converts_from_range() {
        let span: Span = (3..7).into();
        assert_eq!(span, Span::new(3, 7));
        let range: Range<usize> = span.into();
        assert_eq!(range, 3..7);
    }
}
