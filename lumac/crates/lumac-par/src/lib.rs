//! lumac-par - Parser (Syntactic Analyzer)
//!
//! Strict recursive descent over the token stream produced by `lumac-lex`,
//! with single-token lookahead and no backtracking. Each grammar
//! non-terminal has a corresponding `parse_*` method; binary expressions
//! use a precedence ladder (comparison, then addition, then
//! multiplication, then primary) with left-associative iteration instead
//! of left recursion.
//!
//! ```text
//! program     := function*
//! function    := 'func' IDENT '(' params? ')' '->' type block
//! params      := param (',' param)*
//! param       := IDENT ':' type
//! block       := '{' statement* '}'
//! statement   := 'return' expression ';'
//!              | 'if' '(' expression ')' block ('else' block)?
//!              | 'while' '(' expression ')' block
//!              | 'let' IDENT ':' type '=' expression ';'
//!              | 'free' '(' expression ')' ';'
//!              | IDENT assignop expression ';'
//!              | expression ';'
//! expression  := comparison
//! comparison  := addition (('<'|'>'|'=='|'<='|'>=') addition)*
//! addition    := multiplication (('+'|'-') multiplication)*
//! multiplication := primary (('*'|'/'|'%') primary)*
//! primary     := INTEGER | FLOAT | STRING | IDENT
//!              | 'alloc' '(' type ',' expression ')'
//!              | 'sizeof' '(' type ')'
//!              | '&' expression
//!              | '@' expression
//!              | '(' expression ')'
//! type        := 'i32' | 'i64' | 'f32' | 'f64' | 'string'
//!              | 'ptr' '<' type '>'
//! ```
//!
//! Parsing is fail-fast: there is no error recovery, and the first
//! [`ParseError`] aborts the compilation (the error carries the offending
//! token and its position).
//!
//! # Example
//!
//! ```
//! use lumac_lex::tokenize;
//! use lumac_par::Parser;
//!
//! let tokens = tokenize("func answer() -> i32 { return 42; }").unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! assert_eq!(program.functions.len(), 1);
//! ```

pub mod ast;
mod expr;
mod items;
mod stmt;
mod types;

pub use ast::*;

use lumac_lex::{Token, TokenWithSpan};
use lumac_util::{Span, Symbol};
use thiserror::Error;

/// Error raised when the token stream violates the grammar.
///
/// Carries the offending token; the rendered message points at that
/// token's line and column.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}, found {} at line {}, column {}", .token.token, .token.span.line, .token.span.column)]
pub struct ParseError {
    /// What the parser expected at this point.
    pub message: String,

    /// The token that did not fit the grammar.
    pub token: TokenWithSpan,
}

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Recursive-descent parser over a token stream.
///
/// The token vector must be terminated by [`Token::Eof`], which
/// [`lumac_lex::tokenize`] guarantees.
pub struct Parser {
    tokens: Vec<TokenWithSpan>,
    position: usize,
}

impl Parser {
    /// Create a new parser from tokens.
    pub fn new(tokens: Vec<TokenWithSpan>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse a complete program.
    pub fn parse(&mut self) -> Result<Program> {
        let mut functions = Vec::new();
        while !self.is_at_end() {
            functions.push(self.parse_function()?);
        }
        Ok(Program { functions })
    }

    /// The current token with its span.
    ///
    /// Past the end of the vector this keeps returning the final `Eof`
    /// token, so lookahead never goes out of bounds.
    pub(crate) fn current(&self) -> TokenWithSpan {
        self.tokens
            .get(self.position)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    /// The current token, without its span.
    pub(crate) fn current_token(&self) -> Token {
        self.current().token
    }

    /// The token after the current one.
    pub(crate) fn peek_token(&self) -> Token {
        self.tokens
            .get(self.position + 1)
            .map(|t| t.token)
            .unwrap_or(Token::Eof)
    }

    /// Consume and return the current token.
    pub(crate) fn advance(&mut self) -> TokenWithSpan {
        let token = self.current();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Whether the current token equals `token`.
    pub(crate) fn check(&self, token: Token) -> bool {
        self.current_token() == token
    }

    /// Consume the current token if it equals `token`.
    pub(crate) fn match_token(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the expected kind or fail with `message`.
    pub(crate) fn expect(&mut self, token: Token, message: &str) -> Result<TokenWithSpan> {
        if self.check(token) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    /// Consume an identifier or fail with `message`.
    pub(crate) fn expect_ident(&mut self, message: &str) -> Result<(Symbol, Span)> {
        match self.current().token {
            Token::Ident(name) => {
                let span = self.advance().span;
                Ok((name, span))
            },
            _ => Err(self.error(message)),
        }
    }

    /// Whether the parser has consumed everything but the `Eof` sentinel.
    pub(crate) fn is_at_end(&self) -> bool {
        self.current_token() == Token::Eof
    }

    /// Build a [`ParseError`] pointing at the current token.
    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            token: self.current(),
        }
    }

    fn eof_token(&self) -> TokenWithSpan {
        self.tokens
            .last()
            .copied()
            .unwrap_or_else(|| TokenWithSpan::new(Token::Eof, Span::DUMMY))
    }
}
