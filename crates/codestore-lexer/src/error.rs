use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while building a [`SimpleLexer`](crate::SimpleLexer) from a language config.
pub enum LexerError {
    #[error("regex compile error for {rule} rule: {source}")]
    /// One of the built-in token patterns failed to compile.
    Regex {
        /// Which rule failed.
        rule: &'static str,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    #[error("bracket pair {index} has an empty delimiter")]
    /// A bracket pair with an empty open or close delimiter.
    EmptyBracket {
        /// Position of the pair in the config.
        index: usize,
    },

    #[error("too many bracket pairs: {0} (at most 256 kinds are supported)")]
    /// More bracket pairs than there are bracket kinds.
    TooManyBrackets(usize),

    #[error("block comment needs both a start and an end token")]
    /// Only one of the block comment delimiters was configured.
    IncompleteBlockComment,
}
