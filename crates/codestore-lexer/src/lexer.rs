//! A small line-at-a-time lexer driven by a [`LanguageConfig`].
//!
//! It is not a parser. It recognizes strings, character literals, numbers, identifiers, keywords,
//! bracket delimiters and comments, which is what the lexical overlay needs.

use crate::error::LexerError;
use codestore_core::{BracketKind, TextRange, Token, TokenKind};
use codestore_lang::LanguageConfig;
use regex::Regex;
use std::collections::HashSet;

/// Lexer state carried from the end of one line to the start of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineState {
    /// Ordinary code.
    #[default]
    Code,
    /// Inside a block comment that has not been closed yet.
    BlockComment,
}

/// Tokens and comments of one line, in line-local UTF-16 columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LexedLine {
    /// Tokens, sorted and non-overlapping.
    pub tokens: Vec<Token>,
    /// Comment ranges, sorted and non-overlapping. Line terminators are never part of a comment.
    pub comments: Vec<TextRange>,
    /// State at the end of the line.
    pub end_state: LineState,
}

#[derive(Debug, Clone, Copy)]
enum RuleKind {
    String,
    Character,
    Number,
    Word,
}

#[derive(Debug, Clone)]
struct Rule {
    regex: Regex,
    kind: RuleKind,
}

impl Rule {
    fn new(rule: &'static str, pattern: &str, kind: RuleKind) -> Result<Self, LexerError> {
        let regex = Regex::new(pattern).map_err(|source| LexerError::Regex { rule, source })?;
        Ok(Self { regex, kind })
    }
}

/// Regex-based lexer for one language.
#[derive(Debug, Clone)]
pub struct SimpleLexer {
    rules: Vec<Rule>,
    /// Bracket delimiters, longest first.
    brackets: Vec<(String, TokenKind)>,
    keywords: HashSet<String>,
    line_comment: Option<String>,
    block_comment: Option<(String, String)>,
}

impl SimpleLexer {
    /// Build a lexer for `config`.
    ///
    /// The n-th bracket pair of the config becomes `BracketKind(n)`.
    pub fn new(config: LanguageConfig) -> Result<Self, LexerError> {
        let rules = vec![
            Rule::new("string", r#"^"(?:\\.|[^"\\])*""#, RuleKind::String)?,
            Rule::new("character", r#"^'(?:\\.|[^'\\])'"#, RuleKind::Character)?,
            Rule::new(
                "number",
                r"^(?:0[xX][0-9a-fA-F_]+|[0-9][0-9_]*(?:\.[0-9][0-9_]*)?(?:[eE][+-]?[0-9]+)?)[A-Za-z0-9_]*",
                RuleKind::Number,
            )?,
            Rule::new("word", r"^[\p{Alphabetic}_][\p{Alphabetic}\p{Nd}_]*", RuleKind::Word)?,
        ];

        if config.brackets.len() > usize::from(u8::MAX) + 1 {
            return Err(LexerError::TooManyBrackets(config.brackets.len()));
        }
        let mut brackets = Vec::with_capacity(config.brackets.len() * 2);
        for (index, pair) in config.brackets.into_iter().enumerate() {
            if !pair.is_valid() {
                return Err(LexerError::EmptyBracket { index });
            }
            let kind = BracketKind::new(
                u8::try_from(index).map_err(|_| LexerError::TooManyBrackets(index + 1))?,
            );
            brackets.push((pair.open, TokenKind::OpenBracket(kind)));
            brackets.push((pair.close, TokenKind::CloseBracket(kind)));
        }
        // Stable: equal-length delimiters keep config order.
        brackets.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let comments = config.comments;
        let line_comment = if comments.has_line() {
            comments.line.clone()
        } else {
            None
        };
        let block_comment = if comments.has_block() {
            comments.block_start.zip(comments.block_end)
        } else if [&comments.block_start, &comments.block_end]
            .into_iter()
            .flatten()
            .any(|token| !token.is_empty())
        {
            return Err(LexerError::IncompleteBlockComment);
        } else {
            None
        };

        Ok(Self {
            rules,
            brackets,
            keywords: config.keywords.into_iter().collect(),
            line_comment,
            block_comment,
        })
    }

    /// Lex one line. `line` may include its terminator; `state` is the previous line's end state.
    pub fn lex_line(&self, line: &str, state: LineState) -> LexedLine {
        let columns = utf16_columns(line);
        let content_end = content_end(line);
        let mut tokens = Vec::new();
        let mut comments = Vec::new();

        let mut pos = 0;
        // Byte offset where the open block comment started, and where to look for its end.
        let mut block_open = (state == LineState::BlockComment).then_some(0);
        let mut scan_from = 0;

        while pos < content_end {
            if let Some(open_at) = block_open {
                match self.block_end(line, scan_from, content_end) {
                    Some(end) => {
                        comments.push(TextRange::new(columns[open_at], columns[end]));
                        block_open = None;
                        pos = end;
                        continue;
                    }
                    None => {
                        comments.push(TextRange::new(columns[open_at], columns[content_end]));
                        break;
                    }
                }
            }

            let rest = &line[pos..content_end];
            let Some(ch) = rest.chars().next() else {
                break;
            };
            if ch.is_whitespace() {
                pos += ch.len_utf8();
                continue;
            }

            if let Some(token) = self.line_comment.as_deref()
                && rest.starts_with(token)
            {
                comments.push(TextRange::new(columns[pos], columns[content_end]));
                break;
            }
            if let Some((start, _)) = &self.block_comment
                && rest.starts_with(start.as_str())
            {
                block_open = Some(pos);
                scan_from = pos + start.len();
                continue;
            }

            let (kind, len) = self.classify(rest, ch);
            tokens.push(Token::new(kind, columns[pos], columns[pos + len]));
            pos += len;
        }

        LexedLine {
            tokens,
            comments,
            end_state: if block_open.is_some() {
                LineState::BlockComment
            } else {
                LineState::Code
            },
        }
    }

    /// Byte offset just past the block comment terminator found in `line[from..content_end]`.
    fn block_end(&self, line: &str, from: usize, content_end: usize) -> Option<usize> {
        let (_, end) = self.block_comment.as_ref()?;
        line[from..content_end]
            .find(end.as_str())
            .map(|i| from + i + end.len())
    }

    /// Kind and byte length of the token at the start of `rest` (which starts with `first`).
    fn classify(&self, rest: &str, first: char) -> (TokenKind, usize) {
        for (delimiter, kind) in &self.brackets {
            if rest.starts_with(delimiter.as_str()) {
                return (*kind, delimiter.len());
            }
        }

        for rule in &self.rules {
            let Some(m) = rule.regex.find(rest) else {
                continue;
            };
            let kind = match rule.kind {
                RuleKind::String => TokenKind::String,
                RuleKind::Character => TokenKind::Character,
                RuleKind::Number => TokenKind::Number,
                RuleKind::Word if self.keywords.contains(m.as_str()) => TokenKind::Keyword,
                RuleKind::Word => TokenKind::Identifier,
            };
            return (kind, m.end());
        }

        (TokenKind::Other, first.len_utf8())
    }
}

/// UTF-16 column of every byte offset of `line` (plus one entry for `line.len()`).
fn utf16_columns(line: &str) -> Vec<usize> {
    let mut columns = Vec::with_capacity(line.len() + 1);
    let mut column = 0;
    for ch in line.chars() {
        columns.extend(std::iter::repeat_n(column, ch.len_utf8()));
        column += ch.len_utf16();
    }
    columns.push(column);
    columns
}

/// Byte length of `line` without its terminator.
fn content_end(line: &str) -> usize {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        return stripped.len();
    }
    match line.chars().next_back() {
        Some(ch @ ('\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}')) => {
            line.len() - ch.len_utf8()
        }
        _ => line.len(),
    }
}
