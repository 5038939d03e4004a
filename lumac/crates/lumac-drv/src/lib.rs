//! lumac-drv - Compiler Driver
//!
//! Orchestrates the three-stage pipeline over a source string:
//!
//! ```text
//! source text --[lumac-lex]--> tokens --[lumac-par]--> Program
//!             --[lumac-gen]--> WASM module bytes
//! ```
//!
//! The stages are strictly sequential with unidirectional data flow; a
//! compilation is a pure function from source to bytes with no shared
//! state across calls, so independent compilations can run in parallel
//! freely. The first stage error aborts the pipeline and is surfaced as a
//! [`CompileError`] with the user-visible `<kind>: <message> at line L,
//! column C` presentation.
//!
//! The driver also hosts the filesystem-backed [`cache`] that keys
//! compiled binaries on a content+mtime hash.
//!
//! # Example
//!
//! ```
//! let wasm = lumac_drv::compile("func answer() -> i32 { return 42; }").unwrap();
//! assert_eq!(&wasm[..4], b"\0asm");
//! ```

pub mod cache;

use lumac_gen::CodegenError;
use lumac_lex::{LexError, TokenWithSpan};
use lumac_par::{ParseError, Program};
use thiserror::Error;
use tracing::debug;

/// A failure in any stage of the pipeline.
///
/// Lex and parse failures get their kind prefix here; codegen failures
/// carry their own (`name error` / `codegen error`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Codegen(#[from] CodegenError),
}

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Tokenize a source string.
pub fn tokenize(source: &str) -> Result<Vec<TokenWithSpan>> {
    Ok(lumac_lex::tokenize(source)?)
}

/// Parse a token stream into a program.
pub fn parse(tokens: Vec<TokenWithSpan>) -> Result<Program> {
    Ok(lumac_par::Parser::new(tokens).parse()?)
}

/// Generate WASM module bytes from a program.
pub fn generate(program: &Program) -> Result<Vec<u8>> {
    Ok(lumac_gen::generate(program)?)
}

/// Compile a source string to WASM module bytes.
pub fn compile(source: &str) -> Result<Vec<u8>> {
    debug!(bytes = source.len(), "lexing");
    let tokens = tokenize(source)?;

    debug!(tokens = tokens.len(), "parsing");
    let program = parse(tokens)?;

    debug!(functions = program.functions.len(), "generating code");
    let wasm = generate(&program)?;

    debug!(bytes = wasm.len(), "module assembled");
    Ok(wasm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_produces_module() {
        let wasm = compile("func add(a: i32, b: i32) -> i32 { return a + b; }").unwrap();
        assert_eq!(&wasm[..8], &[0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_lex_error_presentation() {
        let err = compile("func f() -> i32 { return 1 $ 2; }").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("lex error: unexpected character '$'"), "{message}");
        assert!(message.contains("line 1"), "{message}");
    }

    #[test]
    fn test_parse_error_presentation() {
        let err = compile("func f() -> i32 { return 42 }").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("parse error: "), "{message}");
        assert!(message.contains("';'"), "{message}");
    }

    #[test]
    fn test_name_error_presentation() {
        let err = compile("func f() -> i32 { return x; }").unwrap_err();
        let message = err.to_string();
        assert!(
            message.starts_with("name error: undefined variable 'x'"),
            "{message}"
        );
    }

    #[test]
    fn test_codegen_error_presentation() {
        let err = compile("func f(a: i32, b: i32) -> i32 { return a % b; }").unwrap_err();
        let message = err.to_string();
        assert!(
            message.starts_with("codegen error: unsupported binary operator '%'"),
            "{message}"
        );
    }

    #[test]
    fn test_stages_compose() {
        let tokens = tokenize("func one() -> i32 { return 1; }").unwrap();
        let program = parse(tokens).unwrap();
        let wasm = generate(&program).unwrap();
        assert!(wasm.len() > 8);
    }
}
