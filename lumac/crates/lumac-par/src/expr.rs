//! Expression parsing - precedence ladder and primaries.

use crate::ast::*;
use crate::{Parser, Result};
use lumac_lex::Token;

impl Parser {
    /// Parse an expression.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_comparison()
    }

    /// Parse comparison expressions (`<`, `>`, `==`, `<=`, `>=`).
    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut expr = self.parse_addition()?;

        loop {
            let op = match self.current_token() {
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::EqEq => BinOp::Eq,
                Token::LtEq => BinOp::Le,
                Token::GtEq => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_addition()?;
            expr = binary(op, expr, right);
        }

        Ok(expr)
    }

    /// Parse addition and subtraction.
    fn parse_addition(&mut self) -> Result<Expr> {
        let mut expr = self.parse_multiplication()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplication()?;
            expr = binary(op, expr, right);
        }

        Ok(expr)
    }

    /// Parse multiplication, division, and remainder.
    ///
    /// `%` parses here so that unsupported-operator programs are rejected
    /// by the generator rather than the grammar.
    fn parse_multiplication(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_primary()?;
            expr = binary(op, expr, right);
        }

        Ok(expr)
    }

    /// Parse a primary expression.
    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current_token() {
            Token::Int(value) => {
                let span = self.advance().span;
                Ok(Expr::Number(NumberLit {
                    value: value as f64,
                    span,
                }))
            },
            Token::Float(value) => {
                let span = self.advance().span;
                Ok(Expr::Number(NumberLit { value, span }))
            },
            Token::Str(value) => {
                let span = self.advance().span;
                Ok(Expr::Str(StrLit { value, span }))
            },
            Token::Ident(name) => {
                let span = self.advance().span;
                Ok(Expr::Ident(IdentExpr { name, span }))
            },
            Token::Alloc => self.parse_alloc(),
            Token::Sizeof => self.parse_sizeof(),
            Token::Ampersand => {
                let span = self.advance().span;
                let expr = self.parse_expr()?;
                let span = span.merge(expr.span());
                Ok(Expr::AddrOf(Box::new(AddrOfExpr { expr, span })))
            },
            Token::At => {
                let span = self.advance().span;
                let ptr = self.parse_expr()?;
                let span = span.merge(ptr.span());
                Ok(Expr::Deref(Box::new(DerefExpr { ptr, span })))
            },
            Token::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(Token::RParen, "expected ')' after expression")?;
                Ok(expr)
            },
            _ => Err(self.error("expected expression")),
        }
    }

    /// Parse `alloc ( type , expression )`.
    fn parse_alloc(&mut self) -> Result<Expr> {
        let kw = self.expect(Token::Alloc, "expected 'alloc'")?;
        self.expect(Token::LParen, "expected '(' after 'alloc'")?;
        let ty = self.parse_type()?;
        self.expect(Token::Comma, "expected ',' after allocation type")?;
        let count = self.parse_expr()?;
        let close = self.expect(Token::RParen, "expected ')' after allocation count")?;

        Ok(Expr::Alloc(Box::new(AllocExpr {
            ty,
            count,
            span: kw.span.merge(close.span),
        })))
    }

    /// Parse `sizeof ( type )`.
    fn parse_sizeof(&mut self) -> Result<Expr> {
        let kw = self.expect(Token::Sizeof, "expected 'sizeof'")?;
        self.expect(Token::LParen, "expected '(' after 'sizeof'")?;
        let ty = self.parse_type()?;
        let close = self.expect(Token::RParen, "expected ')' after sizeof type")?;

        Ok(Expr::Sizeof(SizeofExpr {
            ty,
            span: kw.span.merge(close.span),
        }))
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    let span = left.span().merge(right.span());
    Expr::Binary(Box::new(BinaryExpr {
        op,
        left,
        right,
        span,
    }))
}
