#![warn(missing_docs)]
//! `codestore-lexer` - a regex lexer and rope-backed [`LineMap`](codestore_core::LineMap) for
//! `codestore-core`.
//!
//! Hosts with a real parser feed `codestore-core` their own line map. This crate covers the
//! common case of "good enough" lexing from a [`LanguageConfig`](codestore_lang::LanguageConfig):
//!
//! ```
//! use codestore_core::{CodeBuffer, TextRange};
//! use codestore_lang::LanguageConfig;
//! use codestore_lexer::{LexedLineMap, SimpleLexer};
//!
//! let lexer = SimpleLexer::new(LanguageConfig::rust()).unwrap();
//! let text = "fn f(x: u8) {}";
//! let mut buffer = CodeBuffer::new(text, LexedLineMap::from_text(lexer, text));
//! assert_eq!(buffer.matching_bracket(11, 0..1), Some(TextRange::new(4, 5)));
//!
//! buffer.replace(TextRange::new(3, 4), "g").unwrap();
//! let text = buffer.string();
//! buffer.line_map_mut().rebuild(&text);
//! ```

mod error;
pub mod lexer;
pub mod line_map;

pub use error::LexerError;
pub use lexer::{LexedLine, LineState, SimpleLexer};
pub use line_map::LexedLineMap;
