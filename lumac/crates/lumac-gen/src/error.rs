//! Error types for WASM code generation.

use thiserror::Error;

/// Error type for code generation.
///
/// The `Name` variant is the name-resolution subkind: a reference to an
/// identifier with no binding in the enclosing function. Everything else
/// is a plain codegen failure. All are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// Reference to an identifier with no binding in scope.
    #[error("name error: undefined variable '{name}' at line {line}, column {column}")]
    Name {
        name: String,
        line: u32,
        column: u32,
    },

    /// A binary operator with no WASM lowering.
    #[error("codegen error: unsupported binary operator '{op}' at line {line}, column {column}")]
    UnsupportedOperator {
        op: String,
        line: u32,
        column: u32,
    },

    /// An expression kind with no WASM lowering.
    #[error("codegen error: {what} is not supported at line {line}, column {column}")]
    UnsupportedExpr {
        what: &'static str,
        line: u32,
        column: u32,
    },

    /// Address-of applied to anything other than an identifier.
    #[error("codegen error: can only take the address of a variable at line {line}, column {column}")]
    InvalidAddressOf { line: u32, column: u32 },

    /// A type with no WASM value-type mapping in a function signature.
    #[error("codegen error: type '{ty}' has no WASM value type")]
    UnsupportedType { ty: String },

    /// Internal error - indicates a bug in the generator.
    #[error("codegen error: internal: {0}")]
    Internal(String),
}

/// Result type alias for code generation operations.
pub type Result<T> = std::result::Result<T, CodegenError>;
