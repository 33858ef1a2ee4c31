//! Error types for the pure, total components of the core: the escape
//! parser and the UTF-8 decoder. Neither of these may escape the event
//! loop with an I/O error — they are total functions over in-memory
//! buffers, so their failures are plain enums the caller inspects and
//! recovers from, never `anyhow::Error`.

use std::fmt;

/// Failure modes of [`crate::parser::EscParser::feed_byte`].
///
/// All variants are recoverable: the caller discards the offending
/// sequence, surfaces a warning, and returns the parser to `Ground`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserError {
    /// A `?` byte appeared somewhere other than the very first parameter
    /// byte of the sequence.
    MisplacedQuestion,
    /// A `=` byte appeared somewhere other than the very first parameter
    /// byte of the sequence.
    MisplacedEqual,
    /// A delimited parameter run failed to parse as a base-10 integer
    /// (e.g. a trailing `;` with nothing after it).
    IntConv,
    /// More than the supported number of parameters were supplied.
    TooManyParams,
    /// The raw sequence buffer exceeded its capacity before a final byte
    /// was seen.
    BufferOverflow,
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserError::MisplacedQuestion => write!(f, "misplaced '?' in CSI sequence"),
            ParserError::MisplacedEqual => write!(f, "misplaced '=' in CSI sequence"),
            ParserError::IntConv => write!(f, "failed to parse CSI parameter as an integer"),
            ParserError::TooManyParams => write!(f, "too many CSI parameters"),
            ParserError::BufferOverflow => write!(f, "CSI sequence exceeded buffer capacity"),
        }
    }
}

impl std::error::Error for ParserError {}
