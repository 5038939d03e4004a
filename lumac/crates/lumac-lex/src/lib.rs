//! lumac-lex - Lexical Analyzer (Lexer/Tokenizer)
//!
//! The lexer is the first phase of compilation: it transforms Luma source
//! text into a stream of [`Token`]s, each paired with a [`Span`] recording
//! the 1-based line and column of its first character.
//!
//! The implementation is direct-coded: a single left-to-right pass with one
//! character of lookahead, dispatching on the current character. Whitespace
//! is skipped, `//` starts a line comment, two-character operators are
//! matched before one-character operators (longest match), and identifiers
//! are classified as keywords or type names when they match a reserved
//! word.
//!
//! Lexing is fail-fast: the first invalid character, unterminated string,
//! or unknown escape aborts with a [`LexError`] carrying its position.
//!
//! # Example
//!
//! ```
//! use lumac_lex::{tokenize, Token};
//!
//! let tokens = tokenize("let x: i32 = 42;").unwrap();
//! assert_eq!(tokens[0].token, Token::Let);
//! assert_eq!(tokens.last().unwrap().token, Token::Eof);
//! ```

pub mod cursor;
mod error;
mod lexer;
mod token;

pub use error::LexError;
pub use lexer::Lexer;
pub use token::{Token, TokenWithSpan, TypeKw};

/// Tokenize a complete source string.
///
/// Returns the token sequence terminated by a single [`Token::Eof`]
/// sentinel, or the first lexical error encountered.
pub fn tokenize(source: &str) -> Result<Vec<TokenWithSpan>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let is_eof = token.token == Token::Eof;
        tokens.push(token);
        if is_eof {
            return Ok(tokens);
        }
    }
}
