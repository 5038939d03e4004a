//! Decoding error types.

use thiserror::Error;

/// Error raised while decoding a WASM binary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The module does not begin with `\0asm`.
    #[error("bad magic number: expected \\0asm")]
    BadMagic,

    /// The module version is not 1.
    #[error("unsupported module version: {0}")]
    BadVersion(u32),

    /// The input ended inside a structure.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A LEB128 value did not terminate within its integer width.
    #[error("LEB128 integer overflow")]
    IntegerOverflow,

    /// An opcode absent from the instruction table.
    #[error("unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    /// An export name that is not valid UTF-8.
    #[error("export name is not valid UTF-8")]
    InvalidUtf8,

    /// A memory limits flag other than 0x00 or 0x01.
    #[error("invalid limits flag: 0x{0:02X}")]
    InvalidLimits(u8),

    /// Bytes left over after a section's structures were decoded.
    #[error("trailing bytes in section {0}")]
    TrailingBytes(u8),
}

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
