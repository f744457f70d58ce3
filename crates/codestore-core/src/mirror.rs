//! Read-only mirror buffers.
//!
//! A [`MirrorBuffer`] backs an auxiliary view (a minimap, an overview ruler) that must observe
//! every edit of a primary [`CodeBuffer`] without owning a second copy of the text. It stores no
//! characters: content queries are answered by the linked primary, and edits of the primary are
//! replayed as the mirror's own edit sessions so the mirror's observers get equivalent
//! invalidations.
//!
//! Edits travel through a [`ContentRelay`], which may hold them back for as long as the host
//! likes but delivers them in order, exactly once.
//!
//! ```rust
//! use codestore_core::{CodeBuffer, ContentRelay, MirrorBuffer, StaticLineMap, TextRange};
//! use codestore_core::line_map::plain_lines;
//!
//! let mut primary = CodeBuffer::new("abc", StaticLineMap::new(plain_lines("abc")));
//! let mut mirror = MirrorBuffer::new();
//! primary.link_mirror(&mut mirror);
//! let relay = ContentRelay::attach(&mut primary);
//!
//! primary.replace(TextRange::new(1, 2), "XY").unwrap();
//! assert_eq!(relay.pending(), 1);
//! assert_eq!(relay.deliver(&primary, &mut mirror), 1);
//! assert_eq!(mirror.string(&primary).as_deref(), Some("aXYc"));
//! ```

use crate::attributes::Attributes;
use crate::buffer::{CodeBuffer, TextStorage};
use crate::error::EditError;
use crate::line_map::LineMap;
use crate::notification::{BufferId, EditCallback, EditKind, EditNotification, EditSession};
use crate::range::TextRange;
use crate::resolver::ResolvedAttributes;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, trace};

/// Link from a mirror to its primary.
///
/// The slot is shared with the primary, which holds the only authoritative copy: a mirror whose
/// id is no longer in the slot has been displaced and follows nothing.
#[derive(Debug, Clone)]
pub struct MirrorLink {
    /// The primary buffer being mirrored.
    pub primary: BufferId,
    slot: Rc<Cell<Option<BufferId>>>,
}

impl MirrorLink {
    pub(crate) fn new(primary: BufferId, slot: Rc<Cell<Option<BufferId>>>) -> Self {
        Self { primary, slot }
    }

    fn holds(&self, mirror: BufferId) -> bool {
        self.slot.get() == Some(mirror)
    }
}

/// A read-only buffer that follows a primary [`CodeBuffer`].
pub struct MirrorBuffer {
    id: BufferId,
    link: Option<MirrorLink>,
    session: EditSession,
    observers: Vec<EditCallback>,
}

impl MirrorBuffer {
    /// Create an unlinked mirror.
    pub fn new() -> Self {
        Self {
            id: BufferId::next(),
            link: None,
            session: EditSession::default(),
            observers: Vec::new(),
        }
    }

    /// Identity of this mirror.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// The primary this mirror follows, unless another mirror has since taken its slot.
    pub fn linked_primary(&self) -> Option<BufferId> {
        self.link
            .as_ref()
            .filter(|link| link.holds(self.id))
            .map(|link| link.primary)
    }

    /// Follow a new primary. A slot still held at the previous primary is released.
    ///
    /// Called by [`CodeBuffer::link_mirror`], which owns the slot.
    pub(crate) fn link(&mut self, link: MirrorLink) {
        self.release();
        self.link = Some(link);
    }

    /// Stop following any primary, releasing its mirror slot.
    pub fn unlink(&mut self) {
        self.release();
        self.link = None;
    }

    fn release(&mut self) {
        if let Some(old) = &self.link
            && old.holds(self.id)
        {
            old.slot.set(None);
            debug!(
                mirror = self.id.get(),
                primary = old.primary.get(),
                "released mirror slot"
            );
        }
    }

    /// Register an observer for replayed edits.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&EditNotification) + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    /// Text of the primary, if `primary` is the linked one.
    pub fn string<M: LineMap>(&self, primary: &CodeBuffer<M>) -> Option<String> {
        self.follows(primary.id()).then(|| primary.string())
    }

    /// Length of the primary, if `primary` is the linked one.
    pub fn len<M: LineMap>(&self, primary: &CodeBuffer<M>) -> Option<usize> {
        self.follows(primary.id()).then(|| primary.len())
    }

    /// [`CodeBuffer::attributes_at`] of the primary, if `primary` is the linked one.
    pub fn attributes_at<M: LineMap>(
        &self,
        primary: &CodeBuffer<M>,
        location: usize,
        hint: Option<TextRange>,
    ) -> Option<ResolvedAttributes> {
        self.follows(primary.id())
            .then(|| primary.attributes_at(location, hint))
    }

    /// Replay an edit of the primary.
    ///
    /// `edited` is the post-edit range of the change and `change_in_length` its length delta;
    /// the mirror reports the equivalent pre-edit range to its observers. Events from any buffer
    /// other than the linked primary are ignored.
    pub fn on_primary_edited(
        &mut self,
        source: BufferId,
        kind: EditKind,
        edited: TextRange,
        change_in_length: isize,
        invalidated: TextRange,
    ) {
        if !self.follows(source) {
            debug!(
                mirror = self.id.get(),
                source = source.get(),
                "ignoring edit from a buffer this mirror does not follow"
            );
            return;
        }

        let original = TextRange::new(
            edited.start,
            edited.end.saturating_add_signed(-change_in_length),
        );
        trace!(
            mirror = self.id.get(),
            start = original.start,
            end = original.end,
            delta = change_in_length,
            invalidated_start = invalidated.start,
            invalidated_end = invalidated.end,
            "replaying primary edit"
        );

        self.session.begin();
        self.session.record(kind, original, edited.len());
        if let Some(note) = self.session.end(self.id) {
            for callback in &mut self.observers {
                callback(&note);
            }
        }
    }

    fn follows(&self, primary: BufferId) -> bool {
        self.linked_primary() == Some(primary)
    }
}

impl Default for MirrorBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutations are discarded: a mirror is read-only.
impl TextStorage for MirrorBuffer {
    fn id(&self) -> BufferId {
        self.id
    }

    fn replace(&mut self, _range: TextRange, _text: &str) -> Result<(), EditError> {
        Ok(())
    }

    fn set_attributes(
        &mut self,
        _range: TextRange,
        _attributes: Attributes,
    ) -> Result<(), EditError> {
        Ok(())
    }

    fn begin_editing(&mut self) {}

    fn end_editing(&mut self) {}

    fn subscribe_boxed(&mut self, callback: EditCallback) {
        self.observers.push(callback);
    }
}

/// Ordered queue carrying a primary's edit notifications to its mirror.
pub struct ContentRelay {
    queue: Rc<RefCell<VecDeque<EditNotification>>>,
}

impl ContentRelay {
    /// Start queueing every edit notification of `primary`.
    pub fn attach<S: TextStorage + ?Sized>(primary: &mut S) -> Self {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&queue);
        primary.subscribe_boxed(Box::new(move |note: &EditNotification| {
            sink.borrow_mut().push_back(*note)
        }));
        Self { queue }
    }

    /// Number of queued, undelivered notifications.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Drain the queue into `mirror`, oldest first. Returns the number of edits replayed.
    ///
    /// If `mirror` no longer holds `primary`'s mirror slot, the queue is drained and discarded.
    pub fn deliver<M: LineMap>(&self, primary: &CodeBuffer<M>, mirror: &mut MirrorBuffer) -> usize {
        let notes: Vec<EditNotification> = self.queue.borrow_mut().drain(..).collect();
        if primary.linked_mirror() != Some(mirror.id()) {
            trace!(
                primary = primary.id().get(),
                dropped = notes.len(),
                "mirror slot changed; dropping queued edits"
            );
            return 0;
        }

        for note in &notes {
            let edited = note.edited_range();
            mirror.on_primary_edited(note.source, note.kind, edited, note.change_in_length, edited);
        }
        notes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_map::{StaticLineMap, plain_lines};

    fn primary(text: &str) -> CodeBuffer<StaticLineMap> {
        CodeBuffer::new(text, StaticLineMap::new(plain_lines(text)))
    }

    fn recorded(mirror: &mut MirrorBuffer) -> Rc<RefCell<Vec<EditNotification>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_cb = Rc::clone(&seen);
        mirror.subscribe(move |note| seen_cb.borrow_mut().push(*note));
        seen
    }

    #[test]
    fn test_replays_pre_edit_range() {
        let mut buffer = primary("abcdef");
        let mut mirror = MirrorBuffer::new();
        buffer.link_mirror(&mut mirror);
        let seen = recorded(&mut mirror);

        // Three units at 2..5 replaced by one: post-edit range 2..3, delta -2.
        mirror.on_primary_edited(
            buffer.id(),
            EditKind::Characters,
            TextRange::new(2, 3),
            -2,
            TextRange::new(2, 3),
        );

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].range, TextRange::new(2, 5));
        assert_eq!(seen[0].change_in_length, -2);
        assert_eq!(seen[0].source, mirror.id());
    }

    #[test]
    fn test_ignores_foreign_source() {
        let mut buffer = primary("abc");
        let mut mirror = MirrorBuffer::new();
        buffer.link_mirror(&mut mirror);
        let seen = recorded(&mut mirror);

        mirror.on_primary_edited(
            BufferId::next(),
            EditKind::Characters,
            TextRange::new(0, 1),
            1,
            TextRange::new(0, 1),
        );
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_mutation_is_a_no_op() {
        let mut buffer = primary("abc");
        let mut mirror = MirrorBuffer::new();
        buffer.link_mirror(&mut mirror);
        let seen = recorded(&mut mirror);

        let storage: &mut dyn TextStorage = &mut mirror;
        storage.replace(TextRange::new(0, 3), "zzz").unwrap();
        storage
            .set_attributes(TextRange::new(0, 1), Attributes::default())
            .unwrap();

        assert!(seen.borrow().is_empty());
        assert_eq!(mirror.string(&buffer).as_deref(), Some("abc"));
    }

    #[test]
    fn test_queries_require_linked_primary() {
        let mut linked = primary("one");
        let other = primary("two");
        let mut mirror = MirrorBuffer::new();
        assert_eq!(mirror.string(&linked), None);

        linked.link_mirror(&mut mirror);
        assert_eq!(mirror.string(&linked).as_deref(), Some("one"));
        assert_eq!(mirror.len(&linked), Some(3));
        assert_eq!(mirror.string(&other), None);
        assert!(mirror.attributes_at(&other, 0, None).is_none());
        assert!(mirror.attributes_at(&linked, 0, None).is_some());
    }

    #[test]
    fn test_relay_preserves_order() {
        let mut buffer = primary("hello");
        let mut mirror = MirrorBuffer::new();
        buffer.link_mirror(&mut mirror);
        let relay = ContentRelay::attach(&mut buffer);
        let primary_seen = Rc::new(RefCell::new(Vec::new()));
        let primary_cb = Rc::clone(&primary_seen);
        buffer.subscribe(move |note: &EditNotification| primary_cb.borrow_mut().push(*note));
        let seen = recorded(&mut mirror);

        buffer.replace(TextRange::new(5, 5), " world").unwrap();
        buffer.replace(TextRange::new(0, 1), "J").unwrap();
        buffer.replace(TextRange::new(1, 5), "").unwrap();
        assert_eq!(relay.pending(), 3);

        assert_eq!(relay.deliver(&buffer, &mut mirror), 3);
        assert_eq!(relay.pending(), 0);
        assert_eq!(relay.deliver(&buffer, &mut mirror), 0);

        let seen = seen.borrow();
        let primary_seen = primary_seen.borrow();
        assert_eq!(seen.len(), 3);
        for (mirrored, original) in seen.iter().zip(primary_seen.iter()) {
            assert_eq!(mirrored.range, original.range);
            assert_eq!(mirrored.change_in_length, original.change_in_length);
            assert_eq!(mirrored.kind, original.kind);
        }
    }

    #[test]
    fn test_relay_drops_edits_for_replaced_mirror() {
        let mut buffer = primary("abc");
        let mut old = MirrorBuffer::new();
        let mut new = MirrorBuffer::new();
        buffer.link_mirror(&mut old);
        let relay = ContentRelay::attach(&mut buffer);
        let seen = recorded(&mut old);

        buffer.replace(TextRange::new(0, 1), "x").unwrap();
        buffer.link_mirror(&mut new);

        assert_eq!(relay.deliver(&buffer, &mut old), 0);
        assert!(seen.borrow().is_empty());
        assert_eq!(relay.pending(), 0);
    }

    #[test]
    fn test_displaced_mirror_stops_following() {
        let mut buffer = primary("abc");
        let mut old = MirrorBuffer::new();
        let mut new = MirrorBuffer::new();
        buffer.link_mirror(&mut old);
        let seen = recorded(&mut old);

        assert_eq!(buffer.link_mirror(&mut new), Some(old.id()));
        assert_eq!(old.linked_primary(), None);
        assert_eq!(new.linked_primary(), Some(buffer.id()));
        assert_eq!(old.string(&buffer), None);
        assert!(old.attributes_at(&buffer, 0, None).is_none());

        old.on_primary_edited(
            buffer.id(),
            EditKind::Characters,
            TextRange::new(0, 1),
            0,
            TextRange::new(0, 1),
        );
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_relinking_mirror_releases_previous_primary() {
        let mut first = primary("one");
        let mut second = primary("two");
        let mut mirror = MirrorBuffer::new();

        first.link_mirror(&mut mirror);
        second.link_mirror(&mut mirror);

        assert_eq!(first.linked_mirror(), None);
        assert_eq!(second.linked_mirror(), Some(mirror.id()));
        assert_eq!(mirror.string(&first), None);
        assert_eq!(mirror.string(&second).as_deref(), Some("two"));
    }

    #[test]
    fn test_unlink_frees_slot() {
        let mut buffer = primary("abc");
        let mut mirror = MirrorBuffer::new();
        buffer.link_mirror(&mut mirror);

        mirror.unlink();
        assert_eq!(buffer.linked_mirror(), None);
        assert_eq!(mirror.linked_primary(), None);
    }
}
