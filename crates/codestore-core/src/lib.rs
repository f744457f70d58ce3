#![warn(missing_docs)]
//! codestore-core - lexical overlay for code-editing text buffers
//!
//! # Overview
//!
//! `codestore-core` sits between a plain mutable text buffer and the views that render it. Given a
//! line map (offset ↔ line index with per-line token and comment lists, produced by some lexer),
//! it provides:
//!
//! - **Classification**: which token or comment covers a position, and over which range the
//!   answer stays valid
//! - **Colouring**: token class → theme colour, merged into the stored display attributes
//! - **Bracket matching**: nesting-aware search across lines, bounded by a line range
//! - **Bracket-pair deletion**: deleting the open half of an empty `()` removes both halves
//! - **Mirroring**: a read-only second buffer that replays the primary's edits for an auxiliary
//!   view such as a minimap
//!
//! All offsets are UTF-16 code units.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  MirrorBuffer + ContentRelay                │  ← Secondary views
//! ├─────────────────────────────────────────────┤
//! │  CodeBuffer (edit sessions, notifications)  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Resolver / Brackets / Locator              │  ← Lexical queries
//! ├─────────────────────────────────────────────┤
//! │  LineMap (injected)                         │  ← Line + token index
//! ├─────────────────────────────────────────────┤
//! │  Piece Table + Attribute Runs               │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Threading
//!
//! Everything runs on one thread. Observers are plain `FnMut` closures and are not `Send`.
//!
//! # Module Description
//!
//! - [`storage`] - UTF-16 piece table
//! - [`attributes`] - display attributes and attribute runs
//! - [`line_map`] - the line map interface and a vector-backed implementation
//! - [`locator`] - token and comment lookup
//! - [`brackets`] - bracket matching
//! - [`resolver`] - attribute resolution
//! - [`notification`] - edit notifications and sessions
//! - [`buffer`] - the primary buffer
//! - [`mirror`] - read-only mirror buffers
//! - [`theme`] - colour themes

pub mod attributes;
pub mod brackets;
pub mod buffer;
mod error;
pub mod line_map;
pub mod locator;
pub mod mirror;
pub mod notification;
pub mod range;
pub mod resolver;
pub mod storage;
pub mod theme;
pub mod token;

pub use attributes::{AttributeRun, AttributeRuns, Attributes};
pub use brackets::matching_bracket;
pub use buffer::{CodeBuffer, TextStorage};
pub use error::EditError;
pub use line_map::{EmptyLineMap, LineMap, StaticLineMap};
pub use locator::{TokenLookup, comment_at, token_at, token_at_line_column};
pub use mirror::{ContentRelay, MirrorBuffer, MirrorLink};
pub use notification::{BufferId, EditCallback, EditKind, EditNotification};
pub use range::TextRange;
pub use resolver::{Highlight, ResolvedAttributes, resolve_attributes};
pub use storage::PieceTable;
pub use theme::{Colour, Font, Theme, ThemeError};
pub use token::{BracketKind, LineInfo, Token, TokenKind};
