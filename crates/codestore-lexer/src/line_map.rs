//! A [`LineMap`] that lexes its text.
//!
//! Line boundaries come from a [`Rope`], so offset → line lookups are O(log N). Token and comment
//! lists are recomputed by [`LexedLineMap::rebuild`] whenever the host's text changes.

use crate::lexer::{LineState, SimpleLexer};
use codestore_core::{LineInfo, LineMap, TextRange};
use ropey::Rope;
use tracing::trace;

/// Line map produced by running a [`SimpleLexer`] over a document.
#[derive(Debug, Clone)]
pub struct LexedLineMap {
    lexer: SimpleLexer,
    rope: Rope,
    lines: Vec<LineInfo>,
}

impl LexedLineMap {
    /// Lex `text` into a new line map.
    pub fn from_text(lexer: SimpleLexer, text: &str) -> Self {
        let mut map = Self {
            lexer,
            rope: Rope::new(),
            lines: Vec::new(),
        };
        map.rebuild(text);
        map
    }

    /// Replace the text and re-lex every line.
    pub fn rebuild(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.lines.clear();
        self.lines.reserve(self.rope.len_lines());

        let mut state = LineState::Code;
        for line in 0..self.rope.len_lines() {
            let range = self.line_range(line);
            let line_text = self.rope.line(line).to_string();
            let lexed = self.lexer.lex_line(&line_text, state);
            state = lexed.end_state;
            self.lines.push(
                LineInfo::new(range)
                    .with_tokens(lexed.tokens)
                    .with_comments(lexed.comments),
            );
        }

        trace!(
            lines = self.lines.len(),
            len_utf16 = self.len_utf16(),
            "re-lexed document"
        );
    }

    /// Number of lines (at least one; an empty document has one empty line).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Document length in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.rope.len_utf16_cu()
    }

    /// All lines.
    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    /// The lexer this map was built with.
    pub fn lexer(&self) -> &SimpleLexer {
        &self.lexer
    }

    /// UTF-16 range of `line`, including its terminator.
    fn line_range(&self, line: usize) -> TextRange {
        let start = self.rope.char_to_utf16_cu(self.rope.line_to_char(line));
        let end = if line + 1 < self.rope.len_lines() {
            self.rope.char_to_utf16_cu(self.rope.line_to_char(line + 1))
        } else {
            self.rope.len_utf16_cu()
        };
        TextRange::new(start, end)
    }
}

impl LineMap for LexedLineMap {
    fn lookup(&self, line: usize) -> Option<&LineInfo> {
        self.lines.get(line)
    }

    fn line_containing(&self, offset: usize) -> Option<usize> {
        if offset == self.len_utf16() {
            return self.lines.len().checked_sub(1);
        }
        self.line_of(offset)
    }

    fn line_of(&self, offset: usize) -> Option<usize> {
        if offset >= self.len_utf16() {
            return None;
        }
        let char_idx = self.rope.utf16_cu_to_char(offset);
        Some(self.rope.char_to_line(char_idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestore_core::{BracketKind, Token, TokenKind};
    use codestore_lang::LanguageConfig;
    use pretty_assertions::assert_eq;

    fn map(text: &str) -> LexedLineMap {
        LexedLineMap::from_text(SimpleLexer::new(LanguageConfig::rust()).unwrap(), text)
    }

    #[test]
    fn test_line_ranges_include_terminators() {
        let map = map("ab\ncd\n");
        let ranges: Vec<_> = map.lines().iter().map(|l| l.range).collect();
        assert_eq!(
            ranges,
            vec![TextRange::new(0, 3), TextRange::new(3, 6), TextRange::new(6, 6)]
        );
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let map = map("");
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.line_containing(0), Some(0));
        assert_eq!(map.line_of(0), None);
    }

    #[test]
    fn test_offsets_to_lines() {
        let map = map("fn\n😀x\n");
        assert_eq!(map.len_utf16(), 7);
        assert_eq!(map.line_of(2), Some(0));
        assert_eq!(map.line_of(3), Some(1));
        // Second half of the surrogate pair.
        assert_eq!(map.line_of(4), Some(1));
        assert_eq!(map.line_of(6), Some(1));
        assert_eq!(map.line_of(7), None);
        assert_eq!(map.line_containing(7), Some(2));
        assert_eq!(map.line_and_position_of(5), Some((1, 2)));
    }

    #[test]
    fn test_tokens_are_line_local() {
        let map = map("x\n(y)");
        assert_eq!(
            map.lookup(1).map(|l| l.tokens.clone()),
            Some(vec![
                Token::new(TokenKind::OpenBracket(BracketKind::ROUND), 0, 1),
                Token::new(TokenKind::Identifier, 1, 2),
                Token::new(TokenKind::CloseBracket(BracketKind::ROUND), 2, 3),
            ])
        );
    }

    #[test]
    fn test_block_comment_state_flows_across_lines() {
        let map = map("/* a\nb\nc */ d");
        assert_eq!(map.lines()[1].comments, vec![TextRange::new(0, 1)]);
        assert!(map.lines()[1].tokens.is_empty());
        assert_eq!(map.lines()[2].comments, vec![TextRange::new(0, 4)]);
        assert_eq!(map.lines()[2].tokens.len(), 1);
    }

    #[test]
    fn test_rebuild_replaces_everything() {
        let mut map = map("/* open\nx");
        assert!(map.lines()[1].tokens.is_empty());

        map.rebuild("// closed\nx");
        assert_eq!(
            map.lines()[1].tokens,
            vec![Token::new(TokenKind::Identifier, 0, 1)]
        );
    }
}
