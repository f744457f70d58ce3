//! UTF-16 piece table backing [`CodeBuffer`](crate::CodeBuffer).
//!
//! Offsets and lengths are UTF-16 code units. The table never inspects the units it stores, so a
//! replacement may split a surrogate pair; that is the caller's business, exactly as it is for
//! any UTF-16 string API.

/// Buffer a piece points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// Read-only original text
    Original,
    /// Append-only add buffer
    Add,
}

/// A fragment of one of the two source buffers.
#[derive(Debug, Clone, Copy)]
struct Piece {
    source: Source,
    start: usize,
    len: usize,
}

impl Piece {
    fn new(source: Source, start: usize, len: usize) -> Self {
        Self { source, start, len }
    }

    fn split(&self, at: usize) -> (Piece, Piece) {
        (
            Piece::new(self.source, self.start, at),
            Piece::new(self.source, self.start + at, self.len - at),
        )
    }
}

/// Piece table over UTF-16 code units.
pub struct PieceTable {
    original: Vec<u16>,
    add: Vec<u16>,
    pieces: Vec<Piece>,
    /// Total length in code units (cached)
    len: usize,
    operation_count: usize,
    gc_threshold: usize,
}

impl PieceTable {
    /// Create a piece table holding `text`.
    pub fn new(text: &str) -> Self {
        let original: Vec<u16> = text.encode_utf16().collect();
        let len = original.len();
        let pieces = if len > 0 {
            vec![Piece::new(Source::Original, 0, len)]
        } else {
            Vec::new()
        };

        Self {
            original,
            add: Vec::new(),
            pieces,
            len,
            operation_count: 0,
            gc_threshold: 1000,
        }
    }

    /// Create an empty piece table.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no code units.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `units` at `offset`. Offsets past the end append.
    pub fn insert(&mut self, offset: usize, units: &[u16]) {
        if units.is_empty() {
            return;
        }

        let add_start = self.add.len();
        self.add.extend_from_slice(units);
        let new_piece = Piece::new(Source::Add, add_start, units.len());

        match self.find_piece(offset.min(self.len)) {
            Some((idx, 0)) => self.pieces.insert(idx, new_piece),
            Some((idx, in_piece)) if in_piece == self.pieces[idx].len => {
                self.pieces.insert(idx + 1, new_piece)
            }
            Some((idx, in_piece)) => {
                let (left, right) = self.pieces[idx].split(in_piece);
                self.pieces.splice(idx..=idx, [left, new_piece, right]);
            }
            None => self.pieces.push(new_piece),
        }

        self.len += units.len();
        self.merge_adjacent();
        self.check_gc();
    }

    /// Delete `len` code units starting at `start`. The range is clamped to the table.
    pub fn delete(&mut self, start: usize, len: usize) {
        let start = start.min(self.len);
        let end = start.saturating_add(len).min(self.len);
        if start == end {
            return;
        }

        let mut kept = Vec::with_capacity(self.pieces.len() + 1);
        let mut piece_start = 0;
        for piece in &self.pieces {
            let piece_end = piece_start + piece.len;
            if piece_end <= start || piece_start >= end {
                kept.push(*piece);
            } else {
                if piece_start < start {
                    kept.push(piece.split(start - piece_start).0);
                }
                if piece_end > end {
                    kept.push(piece.split(end - piece_start).1);
                }
            }
            piece_start = piece_end;
        }

        self.pieces = kept;
        self.len -= end - start;
        self.check_gc();
    }

    /// The code unit at `offset`, if any.
    pub fn unit_at(&self, offset: usize) -> Option<u16> {
        if offset >= self.len {
            return None;
        }
        let (idx, in_piece) = self.find_piece(offset)?;
        // `find_piece` prefers the earlier piece on a boundary.
        let (idx, in_piece) = if in_piece == self.pieces[idx].len {
            (idx + 1, 0)
        } else {
            (idx, in_piece)
        };
        let piece = self.pieces.get(idx)?;
        Some(self.slice(piece)[in_piece])
    }

    /// Copy the code units in `start..end` (clamped; empty when `start >= end`).
    pub fn units(&self, start: usize, end: usize) -> Vec<u16> {
        let end = end.min(self.len);
        if start >= end {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(end.saturating_sub(start));
        let mut piece_start = 0;
        for piece in &self.pieces {
            let piece_end = piece_start + piece.len;
            if piece_start >= end {
                break;
            }
            if piece_end > start {
                let from = start.saturating_sub(piece_start);
                let to = end.min(piece_end) - piece_start;
                out.extend_from_slice(&self.slice(piece)[from..to]);
            }
            piece_start = piece_end;
        }
        out
    }

    /// Whole content decoded as a `String` (unpaired surrogates become U+FFFD).
    pub fn get_text(&self) -> String {
        String::from_utf16_lossy(&self.units(0, self.len))
    }

    /// Size of the add buffer, in code units.
    pub fn add_buffer_size(&self) -> usize {
        self.add.len()
    }

    /// Compact the add buffer so it only holds units still referenced by a piece.
    pub fn gc(&mut self) {
        let mut compacted = Vec::new();
        for piece in &mut self.pieces {
            if piece.source != Source::Add {
                continue;
            }
            let new_start = compacted.len();
            compacted.extend_from_slice(&self.add[piece.start..piece.start + piece.len]);
            piece.start = new_start;
        }
        self.add = compacted;
        self.operation_count = 0;
    }

    fn slice(&self, piece: &Piece) -> &[u16] {
        let source = match piece.source {
            Source::Original => &self.original,
            Source::Add => &self.add,
        };
        &source[piece.start..piece.start + piece.len]
    }

    /// Returns `(piece_index, offset_in_piece)`; on a boundary the earlier piece wins.
    fn find_piece(&self, offset: usize) -> Option<(usize, usize)> {
        let mut piece_start = 0;
        for (idx, piece) in self.pieces.iter().enumerate() {
            let piece_end = piece_start + piece.len;
            if offset <= piece_end {
                return Some((idx, offset - piece_start));
            }
            piece_start = piece_end;
        }
        None
    }

    fn merge_adjacent(&mut self) {
        let mut i = 0;
        while i + 1 < self.pieces.len() {
            let (a, b) = (self.pieces[i], self.pieces[i + 1]);
            if a.source == Source::Add && b.source == Source::Add && a.start + a.len == b.start {
                self.pieces[i] = Piece::new(Source::Add, a.start, a.len + b.len);
                self.pieces.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }

    fn check_gc(&mut self) {
        self.operation_count += 1;
        if self.operation_count >= self.gc_threshold {
            self.gc();
        }
    }
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[test]
    fn test_insert_middle_and_ends() {
        let mut table = PieceTable::new("Hello World");
        table.insert(5, &utf16(","));
        table.insert(0, &utf16(">> "));
        table.insert(table.len(), &utf16("!"));
        assert_eq!(table.get_text(), ">> Hello, World!");
        assert_eq!(table.len(), 16);
    }

    #[test]
    fn test_delete_across_pieces() {
        let mut table = PieceTable::new("abcdef");
        table.insert(3, &utf16("XYZ"));
        assert_eq!(table.get_text(), "abcXYZdef");

        table.delete(2, 5);
        assert_eq!(table.get_text(), "abef");
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_delete_is_clamped() {
        let mut table = PieceTable::new("abc");
        table.delete(1, 100);
        assert_eq!(table.get_text(), "a");
        table.delete(10, 1);
        assert_eq!(table.get_text(), "a");
    }

    #[test]
    fn test_unit_at_piece_boundary() {
        let mut table = PieceTable::new("ac");
        table.insert(1, &utf16("b"));
        assert_eq!(table.unit_at(0), Some(u16::from(b'a')));
        assert_eq!(table.unit_at(1), Some(u16::from(b'b')));
        assert_eq!(table.unit_at(2), Some(u16::from(b'c')));
        assert_eq!(table.unit_at(3), None);
    }

    #[test]
    fn test_surrogate_pairs_count_as_two_units() {
        let table = PieceTable::new("a👋b");
        assert_eq!(table.len(), 4);
        assert_eq!(String::from_utf16_lossy(&table.units(1, 3)), "👋");
    }

    #[test]
    fn test_units_with_inverted_bounds_is_empty() {
        let table = PieceTable::new("abcdef");
        assert!(table.units(3, 1).is_empty());
        assert!(table.units(9, 12).is_empty());
    }

    #[test]
    fn test_gc_keeps_content() {
        let mut table = PieceTable::empty();
        for i in 0..50 {
            table.insert(table.len(), &utf16(&format!("{i},")));
        }
        table.delete(0, 20);
        let before = table.get_text();
        table.gc();
        assert_eq!(table.get_text(), before);
        assert!(table.add_buffer_size() <= before.len());
    }
}
