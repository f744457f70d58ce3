//! Attribute resolution: lexical classification → display colour.

use crate::attributes::Attributes;
use crate::line_map::LineMap;
use crate::locator::{comment_at, token_at};
use crate::range::TextRange;
use crate::theme::Theme;
use crate::token::TokenKind;

/// Lexical class a position was resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Inside a comment.
    Comment,
    /// Inside a token of this kind.
    Token(TokenKind),
    /// Between tokens.
    Plain,
}

/// Attributes at a position together with the range they hold for.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttributes {
    /// Stored attributes with the resolved foreground colour merged in.
    pub attributes: Attributes,
    /// Effective range of `attributes`.
    pub range: TextRange,
    /// `true` if the hint range was cropped to the token/comment range.
    pub narrowed: bool,
    /// Classification that picked the colour.
    pub highlight: Highlight,
}

/// Classify `location`, pick its colour from `theme` and crop `hint` to the classified span.
///
/// Comments take precedence over tokens. When the hint and the classified span do not overlap
/// the hint is returned unchanged.
pub fn resolve_attributes<M>(
    map: &M,
    theme: &Theme,
    location: usize,
    base: Attributes,
    hint: TextRange,
) -> ResolvedAttributes
where
    M: LineMap + ?Sized,
{
    let (highlight, span, colour) = match comment_at(map, location) {
        Some(comment) => (Highlight::Comment, comment, theme.comment),
        None => {
            let lookup = token_at(map, location);
            let kind = lookup.token.map(|token| token.kind);
            let highlight = kind.map_or(Highlight::Plain, Highlight::Token);
            (highlight, lookup.range, theme.colour_for(kind))
        }
    };

    let mut attributes = base;
    attributes.merge(&Attributes::with_foreground(colour));

    let (range, narrowed) = narrow(hint, span);
    ResolvedAttributes {
        attributes,
        range,
        narrowed,
        highlight,
    }
}

/// Intersect `hint` with `span`; an empty intersection keeps `hint`.
fn narrow(hint: TextRange, span: TextRange) -> (TextRange, bool) {
    match hint.intersection(&span) {
        Some(cropped) => (cropped, cropped != hint),
        None => (hint, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_map::StaticLineMap;
    use crate::token::{LineInfo, Token};

    // "x = \"hi\" -- c"
    fn map() -> StaticLineMap {
        StaticLineMap::new(vec![
            LineInfo::new(TextRange::new(0, 13))
                .with_tokens(vec![
                    Token::new(TokenKind::Identifier, 0, 1),
                    Token::new(TokenKind::Other, 2, 3),
                    Token::new(TokenKind::String, 4, 8),
                ])
                .with_comments(vec![TextRange::new(9, 13)]),
        ])
    }

    #[test]
    fn test_string_colour_and_range() {
        let theme = Theme::default();
        let resolved =
            resolve_attributes(&map(), &theme, 5, Attributes::default(), TextRange::new(0, 13));
        assert_eq!(resolved.attributes.foreground, Some(theme.string));
        assert_eq!(resolved.range, TextRange::new(4, 8));
        assert!(resolved.narrowed);
        assert_eq!(resolved.highlight, Highlight::Token(TokenKind::String));
    }

    #[test]
    fn test_comment_wins() {
        let theme = Theme::default();
        let resolved =
            resolve_attributes(&map(), &theme, 10, Attributes::default(), TextRange::new(0, 13));
        assert_eq!(resolved.attributes.foreground, Some(theme.comment));
        assert_eq!(resolved.range, TextRange::new(9, 13));
        assert_eq!(resolved.highlight, Highlight::Comment);
    }

    #[test]
    fn test_gap_uses_text_colour() {
        let theme = Theme::default();
        let resolved =
            resolve_attributes(&map(), &theme, 1, Attributes::default(), TextRange::new(0, 13));
        assert_eq!(resolved.attributes.foreground, Some(theme.text));
        assert_eq!(resolved.range, TextRange::new(1, 2));
        assert_eq!(resolved.highlight, Highlight::Plain);
    }

    #[test]
    fn test_disjoint_hint_survives() {
        let theme = Theme::default();
        let hint = TextRange::new(10, 12);
        let resolved = resolve_attributes(&map(), &theme, 5, Attributes::default(), hint);
        assert_eq!(resolved.range, hint);
        assert!(!resolved.narrowed);
    }

    #[test]
    fn test_hint_inside_span_is_not_narrowed() {
        let (range, narrowed) = narrow(TextRange::new(5, 6), TextRange::new(4, 8));
        assert_eq!(range, TextRange::new(5, 6));
        assert!(!narrowed);
    }
}
