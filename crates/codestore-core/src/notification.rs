//! Edit notifications and edit sessions.
//!
//! Every mutation of a buffer happens inside an edit session (`begin_editing` / `end_editing`).
//! Edits recorded while a session is open are coalesced, and exactly one [`EditNotification`] is
//! delivered to observers when the outermost session closes.

use crate::range::TextRange;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a buffer (primary or mirror).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(u64);

impl BufferId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// What an edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Characters were inserted, deleted or replaced.
    Characters,
    /// Only attributes changed; the length is untouched.
    Attributes,
    /// Both, coalesced within one session.
    CharactersAndAttributes,
}

impl EditKind {
    /// Combine two kinds recorded in the same session.
    pub fn union(self, other: EditKind) -> EditKind {
        if self == other {
            self
        } else {
            EditKind::CharactersAndAttributes
        }
    }
}

/// One coalesced change, delivered once per edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditNotification {
    /// Buffer the edit happened in.
    pub source: BufferId,
    /// Kind of change.
    pub kind: EditKind,
    /// Affected range in pre-edit coordinates.
    pub range: TextRange,
    /// Signed change in buffer length.
    pub change_in_length: isize,
}

impl EditNotification {
    /// Affected range in post-edit coordinates.
    pub fn edited_range(&self) -> TextRange {
        TextRange::new(
            self.range.start,
            self.range.end.saturating_add_signed(self.change_in_length),
        )
    }
}

/// Observer callback type.
pub type EditCallback = Box<dyn FnMut(&EditNotification)>;

/// Accumulates edits while a session is open.
#[derive(Debug, Default)]
pub(crate) struct EditSession {
    depth: usize,
    pending: Option<PendingEdit>,
}

#[derive(Debug, Clone, Copy)]
struct PendingEdit {
    kind: EditKind,
    /// Affected span in current (post-edit) coordinates.
    edited: TextRange,
    change_in_length: isize,
}

impl EditSession {
    pub(crate) fn begin(&mut self) {
        self.depth += 1;
    }

    /// Close one nesting level. Returns the coalesced edit when the outermost level closes.
    ///
    /// Unbalanced calls are ignored.
    pub(crate) fn end(&mut self, source: BufferId) -> Option<EditNotification> {
        if self.depth == 0 {
            return None;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return None;
        }

        self.pending.take().map(|pending| EditNotification {
            source,
            kind: pending.kind,
            range: TextRange::new(
                pending.edited.start,
                pending
                    .edited
                    .end
                    .saturating_add_signed(-pending.change_in_length),
            ),
            change_in_length: pending.change_in_length,
        })
    }

    pub(crate) fn is_open(&self) -> bool {
        self.depth > 0
    }

    /// Record that `range` (current coordinates) was replaced by `inserted` units.
    pub(crate) fn record(&mut self, kind: EditKind, range: TextRange, inserted: usize) {
        let delta = inserted as isize - range.len() as isize;
        let edited = TextRange::at(range.start, inserted);

        self.pending = Some(match self.pending {
            None => PendingEdit {
                kind,
                edited,
                change_in_length: delta,
            },
            Some(previous) => {
                // Bring the previous span into this edit's pre-edit coordinates, cover both,
                // then apply this edit's delta to the tail.
                let start = previous.edited.start.min(range.start);
                let end_before = previous.edited.end.max(range.end);
                PendingEdit {
                    kind: previous.kind.union(kind),
                    edited: TextRange::new(start, end_before.saturating_add_signed(delta)),
                    change_in_length: previous.change_in_length + delta,
                }
            }
        });
    }
}
