//! The primary code buffer.
//!
//! [`CodeBuffer`] owns the text (as UTF-16 code units) and its stored attribute runs, and layers
//! lexical queries from an injected [`LineMap`] on top:
//!
//! - [`CodeBuffer::attributes_at`] colours text by token class using the active [`Theme`]
//! - [`CodeBuffer::token_at`] / [`CodeBuffer::comment_at`] expose the classification itself
//! - [`CodeBuffer::matching_bracket`] finds nested bracket partners
//! - [`CodeBuffer::replace`] is the only way to change text; deleting the open half of an empty
//!   `()`-style pair removes both halves
//!
//! The line map is owned by the buffer but maintained by the host: after an edit notification
//! the host re-lexes and updates it through [`CodeBuffer::line_map_mut`] or
//! [`CodeBuffer::set_line_map`]. Until then queries answer from the stale map.
//!
//! # Example
//!
//! ```rust
//! use codestore_core::{
//!     BracketKind, CodeBuffer, LineInfo, StaticLineMap, TextRange, Token, TokenKind,
//! };
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let map = StaticLineMap::new(vec![LineInfo::new(TextRange::new(0, 2)).with_tokens(vec![
//!     Token::new(TokenKind::OpenBracket(BracketKind::ROUND), 0, 1),
//!     Token::new(TokenKind::CloseBracket(BracketKind::ROUND), 1, 2),
//! ])]);
//! let mut buffer = CodeBuffer::new("()", map);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let seen_cb = Rc::clone(&seen);
//! buffer.subscribe(move |note| seen_cb.borrow_mut().push(*note));
//!
//! buffer.replace(TextRange::new(0, 1), "").unwrap();
//! assert_eq!(buffer.string(), "");
//! assert_eq!(seen.borrow()[0].range, TextRange::new(0, 2));
//! assert_eq!(seen.borrow()[0].change_in_length, -2);
//! ```

use crate::attributes::{AttributeRuns, Attributes};
use crate::brackets;
use crate::error::EditError;
use crate::line_map::LineMap;
use crate::locator::{self, TokenLookup};
use crate::mirror::{MirrorBuffer, MirrorLink};
use crate::notification::{BufferId, EditCallback, EditKind, EditNotification, EditSession};
use crate::range::TextRange;
use crate::resolver::{self, ResolvedAttributes};
use crate::storage::PieceTable;
use crate::theme::Theme;
use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

/// Mutation surface shared by primary and mirror buffers.
pub trait TextStorage {
    /// Identity of the buffer.
    fn id(&self) -> BufferId;

    /// Replace `range` with `text`.
    fn replace(&mut self, range: TextRange, text: &str) -> Result<(), EditError>;

    /// Set stored attributes on `range`.
    fn set_attributes(&mut self, range: TextRange, attributes: Attributes)
    -> Result<(), EditError>;

    /// Open an edit session.
    fn begin_editing(&mut self);

    /// Close an edit session; the outermost close notifies observers.
    fn end_editing(&mut self);

    /// Register an observer for edit notifications.
    fn subscribe_boxed(&mut self, callback: EditCallback);
}

/// A code buffer with a lexical overlay.
pub struct CodeBuffer<M> {
    id: BufferId,
    storage: PieceTable,
    runs: AttributeRuns,
    line_map: M,
    theme: Arc<Theme>,
    session: EditSession,
    observers: Vec<EditCallback>,
    /// Single mirror slot, shared with the linked mirror's [`MirrorLink`].
    mirror: Rc<Cell<Option<BufferId>>>,
}

impl<M: LineMap> CodeBuffer<M> {
    /// Create a buffer holding `text`, with the default theme.
    ///
    /// `line_map` must describe `text`.
    pub fn new(text: &str, line_map: M) -> Self {
        let storage = PieceTable::new(text);
        let runs = AttributeRuns::new(storage.len());
        Self {
            id: BufferId::next(),
            storage,
            runs,
            line_map,
            theme: Arc::new(Theme::default()),
            session: EditSession::default(),
            observers: Vec::new(),
            mirror: Rc::new(Cell::new(None)),
        }
    }

    /// Use `theme` instead of the default one.
    pub fn with_theme(mut self, theme: impl Into<Arc<Theme>>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Identity of this buffer.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The whole text.
    pub fn string(&self) -> String {
        self.storage.get_text()
    }

    /// Text in `range` (clamped to the buffer).
    pub fn substring(&self, range: TextRange) -> String {
        String::from_utf16_lossy(&self.storage.units(range.start, range.end))
    }

    /// The code unit at `offset`.
    pub fn unit_at(&self, offset: usize) -> Option<u16> {
        self.storage.unit_at(offset)
    }

    /// The injected line map.
    pub fn line_map(&self) -> &M {
        &self.line_map
    }

    /// Mutable access for the host to bring the line map up to date after an edit.
    pub fn line_map_mut(&mut self) -> &mut M {
        &mut self.line_map
    }

    /// Replace the line map.
    pub fn set_line_map(&mut self, line_map: M) {
        self.line_map = line_map;
    }

    /// The active theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Swap the active theme.
    ///
    /// No edit notification is sent; callers re-query visible attributes afterwards.
    pub fn set_theme(&mut self, theme: impl Into<Arc<Theme>>) {
        self.theme = theme.into();
    }

    /// Register an observer for edit notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&EditNotification) + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    /// Open an edit session. Sessions nest; edits inside are coalesced.
    pub fn begin_editing(&mut self) {
        self.session.begin();
    }

    /// Close an edit session. Closing the outermost one notifies observers once.
    pub fn end_editing(&mut self) {
        if let Some(note) = self.session.end(self.id) {
            self.notify(&note);
        }
    }

    /// Returns `true` while an edit session is open.
    pub fn is_editing(&self) -> bool {
        self.session.is_open()
    }

    /// Replace `range` with `text`.
    ///
    /// Deleting exactly a one-unit opening bracket that is immediately followed by its one-unit
    /// closing partner deletes both, reported as a single edit of length delta `-2`.
    pub fn replace(&mut self, range: TextRange, text: &str) -> Result<(), EditError> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.replace_utf16(range, &units)
    }

    /// [`CodeBuffer::replace`] with pre-encoded UTF-16 text.
    pub fn replace_utf16(&mut self, range: TextRange, units: &[u16]) -> Result<(), EditError> {
        self.check_range(range)?;
        let paired = units.is_empty() && self.is_bracket_pair_deletion(range);

        self.begin_editing();
        if paired {
            debug!(
                buffer = self.id.get(),
                offset = range.start,
                "deleting empty bracket pair"
            );
            // The closing bracket slides into `range` after the first deletion.
            self.replace_units(range, &[]);
            self.replace_units(range, &[]);
        } else {
            self.replace_units(range, units);
        }
        self.end_editing();
        Ok(())
    }

    /// Set stored attributes on `range`. Reported as an attributes-only edit.
    pub fn set_attributes(
        &mut self,
        range: TextRange,
        attributes: Attributes,
    ) -> Result<(), EditError> {
        self.check_range(range)?;
        self.begin_editing();
        self.runs.set(range, attributes);
        self.session.record(EditKind::Attributes, range, range.len());
        self.end_editing();
        Ok(())
    }

    /// Attributes at `location` with the foreground coloured by token class.
    ///
    /// `hint` defaults to the stored attribute run around `location`; the returned range is the
    /// hint cropped to the token, gap or comment span, or the caller's hint unchanged if they do
    /// not overlap.
    pub fn attributes_at(&self, location: usize, hint: Option<TextRange>) -> ResolvedAttributes {
        let run = self.runs.at(location);
        let base = run.map(|run| run.attributes.clone()).unwrap_or_default();
        let hint = hint.unwrap_or_else(|| run.map_or(TextRange::at(location, 1), |run| run.range));
        resolver::resolve_attributes(&self.line_map, &self.theme, location, base, hint)
    }

    /// Token at a buffer offset.
    pub fn token_at(&self, offset: usize) -> TokenLookup {
        locator::token_at(&self.line_map, offset)
    }

    /// Token at a line-local column; `None` for unknown lines.
    pub fn token_at_line_column(&self, line: usize, column: usize) -> Option<TokenLookup> {
        locator::token_at_line_column(&self.line_map, line, column)
    }

    /// Comment range containing `offset`.
    pub fn comment_at(&self, offset: usize) -> Option<TextRange> {
        locator::comment_at(&self.line_map, offset)
    }

    /// Bracket matching the one ending just before `location`, searching only `lines`.
    pub fn matching_bracket(&self, location: usize, lines: Range<usize>) -> Option<TextRange> {
        brackets::matching_bracket(&self.line_map, location, lines)
    }

    /// Link `mirror` to this buffer.
    ///
    /// A primary has a single mirror slot: linking replaces the previous mirror, whose id is
    /// returned so the host can drop it. The displaced mirror stops following this buffer. The
    /// mirror's own previous link is released as well.
    pub fn link_mirror(&mut self, mirror: &mut MirrorBuffer) -> Option<BufferId> {
        mirror.link(MirrorLink::new(self.id, Rc::clone(&self.mirror)));
        let displaced = self.mirror.replace(Some(mirror.id()));
        debug!(
            primary = self.id.get(),
            mirror = mirror.id().get(),
            "linked mirror buffer"
        );
        displaced.filter(|id| *id != mirror.id())
    }

    /// Detach `mirror` if it is the linked one.
    pub fn unlink_mirror(&mut self, mirror: &mut MirrorBuffer) {
        if self.mirror.get() == Some(mirror.id()) {
            mirror.unlink();
            debug!(
                primary = self.id.get(),
                mirror = mirror.id().get(),
                "unlinked mirror buffer"
            );
        }
    }

    /// Id of the linked mirror, if any.
    pub fn linked_mirror(&self) -> Option<BufferId> {
        self.mirror.get()
    }

    fn check_range(&self, range: TextRange) -> Result<(), EditError> {
        if range.is_inverted() {
            return Err(EditError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > self.len() {
            return Err(EditError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn is_bracket_pair_deletion(&self, range: TextRange) -> bool {
        if range.len() != 1 {
            return false;
        }
        let deleted = self.token_at(range.start);
        let Some(open) = deleted.token else {
            return false;
        };
        if !open.kind.is_open_bracket() || deleted.range != range {
            return false;
        }

        let following = self.token_at(range.end);
        following.token.is_some_and(|close| {
            Some(close.kind) == open.matching_kind() && following.range == TextRange::at(range.end, 1)
        })
    }

    fn replace_units(&mut self, range: TextRange, units: &[u16]) {
        self.storage.delete(range.start, range.len());
        self.storage.insert(range.start, units);
        self.runs.replace(range, units.len());
        self.session
            .record(EditKind::Characters, range, units.len());
    }

    fn notify(&mut self, note: &EditNotification) {
        trace!(
            buffer = self.id.get(),
            start = note.range.start,
            end = note.range.end,
            delta = note.change_in_length,
            "edit notification"
        );
        for callback in &mut self.observers {
            callback(note);
        }
    }
}

impl<M: LineMap> TextStorage for CodeBuffer<M> {
    fn id(&self) -> BufferId {
        self.id
    }

    fn replace(&mut self, range: TextRange, text: &str) -> Result<(), EditError> {
        CodeBuffer::replace(self, range, text)
    }

    fn set_attributes(
        &mut self,
        range: TextRange,
        attributes: Attributes,
    ) -> Result<(), EditError> {
        CodeBuffer::set_attributes(self, range, attributes)
    }

    fn begin_editing(&mut self) {
        CodeBuffer::begin_editing(self)
    }

    fn end_editing(&mut self) {
        CodeBuffer::end_editing(self)
    }

    fn subscribe_boxed(&mut self, callback: EditCallback) {
        self.observers.push(callback);
    }
}
