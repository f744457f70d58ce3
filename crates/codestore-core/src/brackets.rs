//! Nested bracket matching across lines.

use crate::line_map::LineMap;
use crate::range::TextRange;
use crate::token::{Token, TokenKind};
use std::ops::Range;

/// Find the bracket matching the one that ends just before `location`.
///
/// The token covering `location - 1` must be a bracket token ending exactly at `location`, so
/// multi-unit bracket lexemes only match by their full extent and column 0 never qualifies. An
/// opening bracket searches forward, a closing one backward.
///
/// Only lines within `lines` are scanned (a "jump to visible bracket" caller passes the
/// viewport). Returns the matching token's buffer-global range, or `None` when the bound is
/// exhausted first.
///
/// Nesting: every further token of the starting bracket's own kind opens a level, every token of
/// the matching kind closes one; the token closing the outermost level is the match.
pub fn matching_bracket<M>(map: &M, location: usize, lines: Range<usize>) -> Option<TextRange>
where
    M: LineMap + ?Sized,
{
    let (line, column) = map.line_and_position_of(location)?;
    if column == 0 || !lines.contains(&line) {
        return None;
    }

    let info = map.lookup(line)?;
    let index = info
        .tokens
        .iter()
        .position(|token| token.range.contains(column - 1))?;
    let start = info.tokens[index];
    if start.range.end != column {
        return None;
    }
    let target = start.matching_kind()?;

    let mut search = Search {
        own: start.kind,
        target,
        level: 1,
    };

    if start.kind.is_open_bracket() {
        for current in line..lines.end {
            let info = map.lookup(current)?;
            let tokens = if current == line {
                &info.tokens[index + 1..]
            } else {
                &info.tokens[..]
            };
            if let Some(found) = tokens.iter().find(|token| search.step(token)) {
                return Some(found.range.shifted(info.start()));
            }
        }
    } else {
        for current in (lines.start..=line).rev() {
            let info = map.lookup(current)?;
            let tokens = if current == line {
                &info.tokens[..index]
            } else {
                &info.tokens[..]
            };
            if let Some(found) = tokens.iter().rev().find(|token| search.step(token)) {
                return Some(found.range.shifted(info.start()));
            }
        }
    }

    None
}

struct Search {
    own: TokenKind,
    target: TokenKind,
    level: usize,
}

impl Search {
    /// Feed the next token in search order; `true` once the match is reached.
    fn step(&mut self, token: &Token) -> bool {
        if token.kind == self.own {
            self.level += 1;
        } else if token.kind == self.target {
            self.level -= 1;
            return self.level == 0;
        }
        false
    }
}
