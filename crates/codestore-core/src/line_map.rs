//! The line map interface.
//!
//! A line map translates buffer offsets into line numbers and hands out per-line token and
//! comment lists. The overlay only consumes it: the host keeps the map consistent with the buffer
//! after every edit (e.g. by re-lexing in response to an [`EditNotification`](crate::EditNotification)).

use crate::range::TextRange;
use crate::token::LineInfo;

/// Offset ↔ line index with lexical metadata.
pub trait LineMap {
    /// Metadata for `line`, or `None` when out of range.
    fn lookup(&self, line: usize) -> Option<&LineInfo>;

    /// Line the insertion point `offset` belongs to.
    ///
    /// Unlike [`LineMap::line_of`] this accepts the end-of-buffer position, which belongs to the
    /// last line.
    fn line_containing(&self, offset: usize) -> Option<usize>;

    /// Line whose range contains the code unit at `offset`.
    fn line_of(&self, offset: usize) -> Option<usize>;

    /// Line and line-local column of the insertion point `offset`.
    fn line_and_position_of(&self, offset: usize) -> Option<(usize, usize)> {
        let line = self.line_containing(offset)?;
        let info = self.lookup(line)?;
        Some((line, offset.checked_sub(info.start())?))
    }
}

/// A line map backed by a plain vector of [`LineInfo`]s.
///
/// Useful for hosts that already compute line metadata themselves, and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLineMap {
    lines: Vec<LineInfo>,
}

impl StaticLineMap {
    /// Create a map from consecutive lines (each line's range must start where the previous
    /// ended).
    pub fn new(lines: Vec<LineInfo>) -> Self {
        Self { lines }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Replace all lines.
    pub fn replace_lines(&mut self, lines: Vec<LineInfo>) {
        self.lines = lines;
    }

    /// All lines.
    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    fn search(&self, offset: usize) -> Option<usize> {
        // Last line starting at or before `offset`.
        let idx = self.lines.partition_point(|line| line.range.start <= offset);
        idx.checked_sub(1)
    }

    fn total_len(&self) -> usize {
        self.lines.last().map_or(0, |line| line.range.end)
    }
}

impl LineMap for StaticLineMap {
    fn lookup(&self, line: usize) -> Option<&LineInfo> {
        self.lines.get(line)
    }

    fn line_containing(&self, offset: usize) -> Option<usize> {
        if offset == self.total_len() && !self.lines.is_empty() {
            return Some(self.lines.len() - 1);
        }
        self.line_of(offset)
    }

    fn line_of(&self, offset: usize) -> Option<usize> {
        let idx = self.search(offset)?;
        self.lines[idx].range.contains(offset).then_some(idx)
    }
}

/// A line map with no lines; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLineMap;

impl LineMap for EmptyLineMap {
    fn lookup(&self, _line: usize) -> Option<&LineInfo> {
        None
    }

    fn line_containing(&self, _offset: usize) -> Option<usize> {
        None
    }

    fn line_of(&self, _offset: usize) -> Option<usize> {
        None
    }
}

/// Split `text` into [`LineInfo`]s (no tokens) with UTF-16 ranges including terminators.
///
/// Lines end after `\n`; a trailing terminator opens an empty last line.
pub fn plain_lines(text: &str) -> Vec<LineInfo> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for ch in text.chars() {
        offset += ch.len_utf16();
        if ch == '\n' {
            lines.push(LineInfo::new(TextRange::new(start, offset)));
            start = offset;
        }
    }
    lines.push(LineInfo::new(TextRange::new(start, offset)));
    lines
}
