//! Tokens and per-line lexical metadata.

use crate::range::TextRange;

/// Bracket family identifier.
///
/// Two bracket tokens only pair up when their kinds agree, so `(` never matches `]`. Lexers are
/// free to hand out ids beyond the built-in ones (e.g. for `{-`/`-}` or `[|`/`|]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BracketKind(pub u8);

impl BracketKind {
    /// `(` / `)`
    pub const ROUND: Self = Self(0);
    /// `[` / `]`
    pub const SQUARE: Self = Self(1);
    /// `{` / `}`
    pub const CURLY: Self = Self(2);
    /// `<` / `>`
    pub const ANGLE: Self = Self(3);

    /// Create a bracket kind from a raw id.
    pub const fn new(id: u8) -> Self {
        Self(id)
    }
}

/// Lexical classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// String literal.
    String,
    /// Character literal.
    Character,
    /// Numeric literal.
    Number,
    /// Identifier.
    Identifier,
    /// Reserved word.
    Keyword,
    /// Opening bracket.
    OpenBracket(BracketKind),
    /// Closing bracket.
    CloseBracket(BracketKind),
    /// Anything else (operators, punctuation).
    Other,
}

impl TokenKind {
    /// The kind of token this one pairs with, for bracket kinds.
    pub fn matching_bracket(&self) -> Option<TokenKind> {
        match *self {
            TokenKind::OpenBracket(kind) => Some(TokenKind::CloseBracket(kind)),
            TokenKind::CloseBracket(kind) => Some(TokenKind::OpenBracket(kind)),
            _ => None,
        }
    }

    /// Returns `true` for opening brackets.
    pub fn is_open_bracket(&self) -> bool {
        matches!(self, TokenKind::OpenBracket(_))
    }

    /// Returns `true` for closing brackets.
    pub fn is_close_bracket(&self) -> bool {
        matches!(self, TokenKind::CloseBracket(_))
    }
}

/// A classified lexical unit with a line-local range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Classification.
    pub kind: TokenKind,
    /// Range relative to the start of the owning line.
    pub range: TextRange,
}

impl Token {
    /// Create a token covering `start..end` on its line.
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            range: TextRange::new(start, end),
        }
    }

    /// Kind of the bracket this token pairs with, if it is a bracket.
    pub fn matching_kind(&self) -> Option<TokenKind> {
        self.kind.matching_bracket()
    }
}

/// Lexical metadata for one line.
///
/// `tokens` and `comments` are line-local, ascending and disjoint; they never extend past the
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineInfo {
    /// Buffer-global range of the line, including its terminator.
    pub range: TextRange,
    /// Tokens on the line.
    pub tokens: Vec<Token>,
    /// Comment spans on the line.
    pub comments: Vec<TextRange>,
}

impl LineInfo {
    /// Create line metadata without tokens or comments.
    pub fn new(range: TextRange) -> Self {
        Self {
            range,
            tokens: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Attach tokens.
    pub fn with_tokens(mut self, tokens: Vec<Token>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Attach comment ranges.
    pub fn with_comments(mut self, comments: Vec<TextRange>) -> Self {
        self.comments = comments;
        self
    }

    /// Buffer offset of the first code unit of the line.
    pub fn start(&self) -> usize {
        self.range.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_bracket_kinds() {
        let open = TokenKind::OpenBracket(BracketKind::CURLY);
        assert_eq!(
            open.matching_bracket(),
            Some(TokenKind::CloseBracket(BracketKind::CURLY))
        );
        assert_eq!(
            TokenKind::CloseBracket(BracketKind::CURLY).matching_bracket(),
            Some(open)
        );
        assert_eq!(TokenKind::Identifier.matching_bracket(), None);
        assert_ne!(
            open.matching_bracket(),
            Some(TokenKind::CloseBracket(BracketKind::ROUND))
        );
    }
}
