#![warn(missing_docs)]
//! `codestore-lang` - data-driven language configuration for `codestore`.
//!
//! This crate stays lightweight and has no dependencies. It describes what a lexer needs to know
//! about a language (comment tokens, bracket pairs, keywords) without doing any lexing itself.

/// Comment tokens for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `--`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`, `{-`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`, `-}`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Create a config that supports only block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            line: None,
            block_start: Some(start.into()),
            block_end: Some(end.into()),
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// An open/close bracket pair, e.g. `(` and `)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPair {
    /// Opening delimiter.
    pub open: String,
    /// Closing delimiter.
    pub close: String,
}

impl BracketPair {
    /// Create a pair from its two delimiters.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Returns `true` if neither delimiter is empty.
    pub fn is_valid(&self) -> bool {
        !self.open.is_empty() && !self.close.is_empty()
    }
}

/// Everything a lexer needs to know about a language.
///
/// The position of a pair in [`LanguageConfig::brackets`] identifies its bracket kind: pairs are
/// only matched against pairs at the same index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Comment tokens.
    pub comments: CommentConfig,
    /// Bracket pairs, in kind order.
    pub brackets: Vec<BracketPair>,
    /// Reserved words classified as keywords rather than identifiers.
    pub keywords: Vec<String>,
}

impl Default for LanguageConfig {
    /// No comments, no keywords, and the round, square and curly bracket pairs.
    fn default() -> Self {
        Self {
            comments: CommentConfig::default(),
            brackets: default_brackets(),
            keywords: Vec::new(),
        }
    }
}

impl LanguageConfig {
    /// Replace the comment tokens.
    pub fn with_comments(mut self, comments: CommentConfig) -> Self {
        self.comments = comments;
        self
    }

    /// Replace the bracket pairs.
    pub fn with_brackets(mut self, brackets: Vec<BracketPair>) -> Self {
        self.brackets = brackets;
        self
    }

    /// Replace the keyword list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if `word` is one of the configured keywords.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }

    /// Index of the pair whose open delimiter is `token`.
    pub fn open_index(&self, token: &str) -> Option<usize> {
        self.brackets.iter().position(|pair| pair.open == token)
    }

    /// Index of the pair whose close delimiter is `token`.
    pub fn close_index(&self, token: &str) -> Option<usize> {
        self.brackets.iter().position(|pair| pair.close == token)
    }

    /// Rust: `//` and `/* */` comments, `()[]{}` brackets.
    pub fn rust() -> Self {
        Self::default()
            .with_comments(CommentConfig::line_and_block("//", "/*", "*/"))
            .with_keywords([
                "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else",
                "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop",
                "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self", "static",
                "struct", "super", "trait", "true", "type", "unsafe", "use", "where", "while",
            ])
    }

    /// Haskell: `--` and `{- -}` comments, `()[]{}` brackets.
    pub fn haskell() -> Self {
        Self::default()
            .with_comments(CommentConfig::line_and_block("--", "{-", "-}"))
            .with_keywords([
                "case", "class", "data", "default", "deriving", "do", "else", "foreign", "if",
                "import", "in", "infix", "infixl", "infixr", "instance", "let", "module",
                "newtype", "of", "then", "type", "where",
            ])
    }
}

fn default_brackets() -> Vec<BracketPair> {
    vec![
        BracketPair::new("(", ")"),
        BracketPair::new("[", "]"),
        BracketPair::new("{", "}"),
    ]
}
