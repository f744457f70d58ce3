use thiserror::Error;

/// Errors returned by buffer mutations.
///
/// Queries never fail; only edits addressing text outside the buffer are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("range {start}..{end} is out of bounds for a buffer of {len} code units")]
    /// The edited range extends past the end of the buffer.
    RangeOutOfBounds {
        /// Range start offset.
        start: usize,
        /// Range end offset (exclusive).
        end: usize,
        /// Buffer length at the time of the edit.
        len: usize,
    },

    #[error("range {start}..{end} ends before it starts")]
    /// The edited range has `end < start`.
    InvalidRange {
        /// Range start offset.
        start: usize,
        /// Range end offset.
        end: usize,
    },
}
