//! Lexical error types.

use thiserror::Error;

/// Error raised during tokenization.
///
/// Every variant carries the 1-based line and column of the offending
/// character. Lexical errors are fatal: the first one aborts the
/// compilation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A character that matches no lexical rule.
    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: u32, column: u32 },

    /// A string literal with no closing quote before end of input.
    #[error("unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: u32, column: u32 },

    /// A backslash escape the language does not define.
    #[error("unknown escape sequence '\\{ch}' at line {line}, column {column}")]
    InvalidEscape { ch: char, line: u32, column: u32 },

    /// A numeric literal that does not fit its type.
    #[error("invalid numeric literal '{text}' at line {line}, column {column}")]
    InvalidNumber {
        text: String,
        line: u32,
        column: u32,
    },
}
