//! Colour themes.
//!
//! A [`Theme`] holds the colours the attribute resolver hands out per token class. Themes can be
//! built in code or loaded from JSON:
//!
//! ```rust
//! use codestore_core::{Colour, Theme};
//!
//! let theme = Theme::from_json_str(r##"{ "keyword": "#ff0000", "comment": "#00ff0080" }"##).unwrap();
//! assert_eq!(theme.keyword, Colour::rgb(0xff, 0x00, 0x00));
//! assert_eq!(theme.comment.a, 0x80);
//! // Fields missing from the JSON keep their defaults.
//! assert_eq!(theme.text, Theme::default().text);
//! ```

use crate::token::TokenKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme JSON parse error: {0}")]
    /// The theme document is not valid JSON or has the wrong shape.
    Json(#[from] serde_json::Error),

    #[error("invalid colour '{0}' (expected #rrggbb or #rrggbbaa)")]
    /// A colour string could not be parsed.
    InvalidColour(String),
}

/// An sRGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (`0xff` is opaque).
    pub a: u8,
}

impl Colour {
    /// An opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// A colour with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, ThemeError> {
        let invalid = || ThemeError::InvalidColour(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if digits.len() == 8 { channel(6)? } else { 0xff };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Colour {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::from_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_hex()
    }
}

/// Font selection carried by a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Family name (e.g. `"Menlo"`).
    pub family: String,
    /// Point size.
    pub size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            size: 13.0,
        }
    }
}

/// Colours and font used to display a code buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Default text colour (plain text, brackets, unclassified tokens).
    pub text: Colour,
    /// String literals.
    pub string: Colour,
    /// Character literals.
    pub character: Colour,
    /// Numeric literals.
    pub number: Colour,
    /// Identifiers.
    pub identifier: Colour,
    /// Keywords.
    pub keyword: Colour,
    /// Comments.
    pub comment: Colour,
    /// Editor background.
    pub background: Colour,
    /// Editor font.
    pub font: Font,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Colour::rgb(0xcd, 0xd6, 0xf4),
            string: Colour::rgb(0xa6, 0xe3, 0xa1),
            character: Colour::rgb(0x94, 0xe2, 0xd5),
            number: Colour::rgb(0xfa, 0xb3, 0x87),
            identifier: Colour::rgb(0x89, 0xb4, 0xfa),
            keyword: Colour::rgb(0xcb, 0xa6, 0xf7),
            comment: Colour::rgb(0x6c, 0x70, 0x86),
            background: Colour::rgb(0x1e, 0x1e, 0x2e),
            font: Font::default(),
        }
    }
}

impl Theme {
    /// Load a theme from JSON. Missing fields keep their [`Theme::default`] values.
    pub fn from_json_str(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the theme to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ThemeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Foreground colour for a token kind; `None` means "no token".
    pub fn colour_for(&self, kind: Option<TokenKind>) -> Colour {
        match kind {
            Some(TokenKind::String) => self.string,
            Some(TokenKind::Character) => self.character,
            Some(TokenKind::Number) => self.number,
            Some(TokenKind::Identifier) => self.identifier,
            Some(TokenKind::Keyword) => self.keyword,
            _ => self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::BracketKind;

    #[test]
    fn test_colour_hex_round_trip() {
        let colour = Colour::from_hex("#1e1e2e").unwrap();
        assert_eq!(colour, Colour::rgb(0x1e, 0x1e, 0x2e));
        assert_eq!(colour.to_hex(), "#1e1e2e");

        let translucent = Colour::from_hex("ff000080").unwrap();
        assert_eq!(translucent.to_hex(), "#ff000080");
    }

    #[test]
    fn test_invalid_colour() {
        assert!(matches!(
            Colour::from_hex("#12345"),
            Err(ThemeError::InvalidColour(_))
        ));
        assert!(Colour::from_hex("#gggggg").is_err());
    }

    #[test]
    fn test_invalid_colour_in_json() {
        let err = Theme::from_json_str(r#"{ "text": "blue" }"#).unwrap_err();
        assert!(matches!(err, ThemeError::Json(_)));
    }

    #[test]
    fn test_colour_for_kinds() {
        let theme = Theme::default();
        assert_eq!(theme.colour_for(Some(TokenKind::Keyword)), theme.keyword);
        assert_eq!(theme.colour_for(Some(TokenKind::Character)), theme.character);
        assert_eq!(
            theme.colour_for(Some(TokenKind::OpenBracket(BracketKind::ROUND))),
            theme.text
        );
        assert_eq!(theme.colour_for(Some(TokenKind::Other)), theme.text);
        assert_eq!(theme.colour_for(None), theme.text);
    }

    #[test]
    fn test_json_round_trip_keeps_font() {
        let mut theme = Theme::default();
        theme.font = Font {
            family: "Menlo".to_string(),
            size: 12.0,
        };
        let json = theme.to_json_string().unwrap();
        assert_eq!(Theme::from_json_str(&json).unwrap(), theme);
    }
}
