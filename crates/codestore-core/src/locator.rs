//! Token and comment lookup.
//!
//! Pure queries over a [`LineMap`]. Every answer comes with the range over which it stays valid,
//! so callers can batch redisplay and cache attribute runs.
//!
//! Lookups walk the line's token list linearly. Lines are expected to hold a bounded number of
//! tokens; a pathological single line with `k` tokens costs `O(k)` per query.

use crate::line_map::LineMap;
use crate::range::TextRange;
use crate::token::{LineInfo, Token};

/// Result of a token lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLookup {
    /// The token covering the queried position (line-local range), if any.
    pub token: Option<Token>,
    /// Buffer-global range over which this answer holds: the token's range, or the token-free
    /// gap around the position.
    pub range: TextRange,
}

/// Token at a line-local `column` of `line`.
///
/// Returns `None` only when `line` is unknown to the map.
pub fn token_at_line_column<M>(map: &M, line: usize, column: usize) -> Option<TokenLookup>
where
    M: LineMap + ?Sized,
{
    map.lookup(line).map(|info| token_in_line(info, column))
}

/// Token at a buffer offset.
///
/// Offsets the map cannot place on a line yield "no token" with the one-unit range
/// `[offset, offset + 1)`.
pub fn token_at<M>(map: &M, offset: usize) -> TokenLookup
where
    M: LineMap + ?Sized,
{
    map.line_and_position_of(offset)
        .and_then(|(line, column)| token_at_line_column(map, line, column))
        .unwrap_or(TokenLookup {
            token: None,
            range: TextRange::at(offset, 1),
        })
}

/// Comment range (buffer-global) containing `offset`, if any.
pub fn comment_at<M>(map: &M, offset: usize) -> Option<TextRange>
where
    M: LineMap + ?Sized,
{
    let (line, column) = map.line_and_position_of(offset)?;
    let info = map.lookup(line)?;

    for comment in &info.comments {
        if column < comment.start {
            // Sorted; nothing further can contain the column.
            return None;
        }
        if comment.contains(column) {
            return Some(comment.shifted(info.start()));
        }
    }
    None
}

fn token_in_line(info: &LineInfo, column: usize) -> TokenLookup {
    let line_start = info.start();
    let mut gap_start = 0;

    for token in &info.tokens {
        if column < token.range.start {
            return TokenLookup {
                token: None,
                range: TextRange::new(gap_start, token.range.start).shifted(line_start),
            };
        }
        if column < token.range.end {
            return TokenLookup {
                token: Some(*token),
                range: token.range.shifted(line_start),
            };
        }
        gap_start = token.range.end;
    }

    // Only the end-of-buffer insertion point can sit past a token that reaches the line end.
    let gap = TextRange::new(line_start + gap_start, info.range.end);
    TokenLookup {
        token: None,
        range: if gap.is_empty() {
            TextRange::at(line_start + column, 1)
        } else {
            gap
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_map::StaticLineMap;
    use crate::token::TokenKind;

    // "let x = 42\n" followed by "  foo -- note"
    fn sample_map() -> StaticLineMap {
        StaticLineMap::new(vec![
            LineInfo::new(TextRange::new(0, 11)).with_tokens(vec![
                Token::new(TokenKind::Keyword, 0, 3),
                Token::new(TokenKind::Identifier, 4, 5),
                Token::new(TokenKind::Other, 6, 7),
                Token::new(TokenKind::Number, 8, 10),
            ]),
            LineInfo::new(TextRange::new(11, 24))
                .with_tokens(vec![Token::new(TokenKind::Identifier, 2, 5)])
                .with_comments(vec![TextRange::new(6, 13)]),
        ])
    }

    #[test]
    fn test_token_inside() {
        let map = sample_map();
        for offset in 8..10 {
            let lookup = token_at(&map, offset);
            assert_eq!(lookup.token.map(|t| t.kind), Some(TokenKind::Number));
            assert_eq!(lookup.range, TextRange::new(8, 10));
        }
        let lookup = token_at(&map, 14);
        assert_eq!(lookup.token.map(|t| t.kind), Some(TokenKind::Identifier));
        assert_eq!(lookup.range, TextRange::new(13, 16));
    }

    #[test]
    fn test_gaps() {
        let map = sample_map();
        // Between `let` and `x`.
        assert_eq!(
            token_at(&map, 3),
            TokenLookup {
                token: None,
                range: TextRange::new(3, 4)
            }
        );
        // Trailing newline of line 0.
        assert_eq!(token_at(&map, 10).range, TextRange::new(10, 11));
        // Leading indentation of line 1.
        assert_eq!(token_at(&map, 11).range, TextRange::new(11, 13));
        // Past the last token of line 1.
        assert_eq!(token_at(&map, 20).range, TextRange::new(16, 24));
    }

    #[test]
    fn test_end_of_buffer_after_last_token() {
        let map = StaticLineMap::new(vec![
            LineInfo::new(TextRange::new(0, 2))
                .with_tokens(vec![Token::new(TokenKind::Identifier, 0, 2)]),
        ]);
        let lookup = token_at(&map, 2);
        assert_eq!(lookup.token, None);
        assert_eq!(lookup.range, TextRange::new(2, 3));

        let empty = StaticLineMap::new(vec![LineInfo::new(TextRange::new(0, 0))]);
        assert_eq!(token_at(&empty, 0).range, TextRange::new(0, 1));
    }

    #[test]
    fn test_unresolvable_offset() {
        let map = sample_map();
        let lookup = token_at(&map, 100);
        assert_eq!(lookup.token, None);
        assert_eq!(lookup.range, TextRange::new(100, 101));
    }

    #[test]
    fn test_line_column_form() {
        let map = sample_map();
        let lookup = token_at_line_column(&map, 0, 1).unwrap();
        assert_eq!(lookup.token.map(|t| t.kind), Some(TokenKind::Keyword));
        assert_eq!(lookup.range, TextRange::new(0, 3));
        assert!(token_at_line_column(&map, 7, 0).is_none());
    }

    #[test]
    fn test_comment_at() {
        let map = sample_map();
        assert_eq!(comment_at(&map, 17), Some(TextRange::new(17, 24)));
        assert_eq!(comment_at(&map, 23), Some(TextRange::new(17, 24)));
        assert_eq!(comment_at(&map, 16), None);
        assert_eq!(comment_at(&map, 2), None);
    }
}
