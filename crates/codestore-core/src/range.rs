//! Half-open code-unit ranges.
//!
//! All offsets in `codestore-core` count UTF-16 code units, so they line up with the offsets a
//! line map produced from UTF-16 text reports.

/// A half-open range (`start..end`) of UTF-16 code-unit offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    /// Range start offset (inclusive).
    pub start: usize,
    /// Range end offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Create a new range. `end` is clamped so that it never precedes `start`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Create a range from a start offset and a length.
    pub fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(len),
        }
    }

    /// Number of code units covered by the range; zero for an inverted range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range covers no code units.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if `end` precedes `start`, which only a struct literal can produce.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// Check if the range contains `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Translate a line-local range into buffer-global coordinates.
    pub fn shifted(&self, by: usize) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }

    /// Overlap of two ranges, or `None` when they share no code units.
    pub fn intersection(&self, other: &TextRange) -> Option<TextRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TextRange { start, end })
    }

    /// Smallest range covering both ranges.
    pub fn union(&self, other: &TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        TextRange::new(range.start, range.end)
    }
}

impl From<TextRange> for std::ops::Range<usize> {
    fn from(range: TextRange) -> Self {
        range.start..range.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let a = TextRange::new(2, 8);
        assert_eq!(a.intersection(&TextRange::new(5, 12)), Some(TextRange::new(5, 8)));
        assert_eq!(a.intersection(&TextRange::new(8, 12)), None);
        assert_eq!(a.intersection(&TextRange::new(0, 2)), None);
    }

    #[test]
    fn test_shift_and_len() {
        let local = TextRange::new(1, 4);
        let global = local.shifted(10);
        assert_eq!(global, TextRange::new(11, 14));
        assert_eq!(global.len(), 3);
        assert!(global.contains(11));
        assert!(!global.contains(14));
    }

    #[test]
    fn test_new_clamps_inverted_range() {
        let range = TextRange::new(5, 3);
        assert!(range.is_empty());
        assert_eq!(range.start, 5);
        assert!(!range.is_inverted());
    }

    #[test]
    fn test_literal_inverted_range_is_total() {
        let range = TextRange { start: 3, end: 1 };
        assert!(range.is_inverted());
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert!(!range.contains(2));
    }
}
