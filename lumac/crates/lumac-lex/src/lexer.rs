//! Core lexer implementation.
//!
//! The lexer owns a [`Cursor`] and produces one token per call to
//! [`Lexer::next_token`], dispatching on the first character after skipping
//! whitespace and `//` line comments. Two-character operators are matched
//! before their one-character prefixes.

use lumac_util::{Span, Symbol};

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{keyword, Token, TokenWithSpan};

/// Lexer for the Luma language.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    cursor: Cursor<'a>,

    /// Starting byte offset of the current token.
    token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,

    /// Column number where the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token from the source code.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character. Returns [`Token::Eof`] at end of input; every subsequent
    /// call keeps returning it.
    pub fn next_token(&mut self) -> Result<TokenWithSpan, LexError> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(self.spanned(Token::Eof));
        }

        let token = match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                Token::LParen
            },
            ')' => {
                self.cursor.advance();
                Token::RParen
            },
            '{' => {
                self.cursor.advance();
                Token::LBrace
            },
            '}' => {
                self.cursor.advance();
                Token::RBrace
            },
            ':' => {
                self.cursor.advance();
                Token::Colon
            },
            ';' => {
                self.cursor.advance();
                Token::Semicolon
            },
            ',' => {
                self.cursor.advance();
                Token::Comma
            },
            '&' => {
                self.cursor.advance();
                Token::Ampersand
            },
            '@' => {
                self.cursor.advance();
                Token::At
            },
            '.' => {
                self.cursor.advance();
                Token::Dot
            },
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => {
                self.cursor.advance();
                Token::Percent
            },
            '=' => self.lex_equals(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '"' => self.lex_string()?,
            c if c.is_ascii_digit() => self.lex_number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c => {
                return Err(LexError::UnexpectedChar {
                    ch: c,
                    line: self.token_start_line,
                    column: self.token_start_column,
                });
            },
        };

        Ok(self.spanned(token))
    }

    /// Lex an identifier, keyword, or type name.
    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_alphanumeric() || self.cursor.current_char() == '_'
        {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(start);
        keyword(text).unwrap_or_else(|| Token::Ident(Symbol::intern(text)))
    }

    /// Lex a numeric literal.
    ///
    /// A number is a contiguous run of digits optionally containing one
    /// `.`; the presence of the dot selects the floating-point kind.
    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.cursor.position();

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }

            let text = self.cursor.slice_from(start);
            let value = text.parse::<f64>().map_err(|_| self.invalid_number(text))?;
            return Ok(Token::Float(value));
        }

        let text = self.cursor.slice_from(start);
        let value = text.parse::<i64>().map_err(|_| self.invalid_number(text))?;
        Ok(Token::Int(value))
    }

    /// Lex a string literal with `\n`, `\t`, `\"`, `\\` escapes.
    fn lex_string(&mut self) -> Result<Token, LexError> {
        self.cursor.advance(); // opening quote

        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedString {
                    line: self.token_start_line,
                    column: self.token_start_column,
                });
            }

            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    return Ok(Token::Str(Symbol::intern(&value)));
                },
                '\\' => {
                    let escape_line = self.cursor.line();
                    let escape_column = self.cursor.column();
                    self.cursor.advance();
                    if self.cursor.is_at_end() {
                        return Err(LexError::UnterminatedString {
                            line: self.token_start_line,
                            column: self.token_start_column,
                        });
                    }
                    let escaped = self.cursor.current_char();
                    self.cursor.advance();
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        '"' => value.push('"'),
                        '\\' => value.push('\\'),
                        other => {
                            return Err(LexError::InvalidEscape {
                                ch: other,
                                line: escape_line,
                                column: escape_column,
                            });
                        },
                    }
                },
                c => {
                    value.push(c);
                    self.cursor.advance();
                },
            }
        }
    }

    /// Lex `+` or `+=`.
    fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::PlusEq
        } else {
            Token::Plus
        }
    }

    /// Lex `-`, `->`, or `-=`.
    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            Token::Arrow
        } else if self.cursor.match_char('=') {
            Token::MinusEq
        } else {
            Token::Minus
        }
    }

    /// Lex `*` or `*=`.
    fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::StarEq
        } else {
            Token::Star
        }
    }

    /// Lex `/` or `/=`.
    ///
    /// `//` never reaches this method; comments are consumed while
    /// skipping whitespace.
    fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::SlashEq
        } else {
            Token::Slash
        }
    }

    /// Lex `=` or `==`.
    fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::EqEq
        } else {
            Token::Eq
        }
    }

    /// Lex `<` or `<=`.
    fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::LtEq
        } else {
            Token::Lt
        }
    }

    /// Lex `>` or `>=`.
    fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::GtEq
        } else {
            Token::Gt
        }
    }

    /// Skip whitespace and `//` line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let c = self.cursor.current_char();
            if c.is_whitespace() && !self.cursor.is_at_end() {
                self.cursor.advance();
            } else if c == '/' && self.cursor.peek_char(1) == '/' {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
            } else {
                break;
            }
        }
    }

    fn spanned(&self, token: Token) -> TokenWithSpan {
        TokenWithSpan::new(
            token,
            Span::new(
                self.token_start,
                self.cursor.position(),
                self.token_start_line,
                self.token_start_column,
            ),
        )
    }

    fn invalid_number(&self, text: &str) -> LexError {
        LexError::InvalidNumber {
            text: text.to_owned(),
            line: self.token_start_line,
            column: self.token_start_column,
        }
    }
}
