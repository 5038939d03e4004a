//! Statement parsing - return, if, while, let, free, assignment.

use crate::ast::*;
use crate::{Parser, Result};
use lumac_lex::Token;

impl Parser {
    /// Parse a brace-delimited block of statements.
    pub(crate) fn parse_block(&mut self) -> Result<Block> {
        let open = self.expect(Token::LBrace, "expected '{'")?;

        let mut stmts = Vec::new();
        while !self.check(Token::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }

        let close = self.expect(Token::RBrace, "expected '}'")?;

        Ok(Block {
            stmts,
            span: open.span.merge(close.span),
        })
    }

    /// Parse a single statement, dispatching on the leading token.
    ///
    /// An identifier leads an assignment when the following token is an
    /// assignment operator; otherwise it begins an expression statement.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.current_token() {
            Token::Return => self.parse_return_stmt(),
            Token::If => self.parse_if_stmt(),
            Token::While => self.parse_while_stmt(),
            Token::Let => self.parse_let_stmt(),
            Token::Free => self.parse_free_stmt(),
            Token::Ident(_) => match self.peek_token() {
                Token::Eq | Token::PlusEq | Token::MinusEq | Token::StarEq | Token::SlashEq => {
                    self.parse_assign_stmt()
                },
                _ => self.parse_expr_stmt(),
            },
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse `return expression ;`.
    fn parse_return_stmt(&mut self) -> Result<Stmt> {
        let kw = self.expect(Token::Return, "expected 'return'")?;
        let value = self.parse_expr()?;
        self.expect(Token::Semicolon, "expected ';' after return value")?;

        Ok(Stmt::Return(ReturnStmt {
            value,
            span: kw.span,
        }))
    }

    /// Parse `if ( expression ) block (else block)?`.
    fn parse_if_stmt(&mut self) -> Result<Stmt> {
        self.expect(Token::If, "expected 'if'")?;
        self.expect(Token::LParen, "expected '(' after 'if'")?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen, "expected ')' after if condition")?;

        let then_block = self.parse_block()?;

        let else_block = if self.match_token(Token::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            else_block,
        }))
    }

    /// Parse `while ( expression ) block`.
    fn parse_while_stmt(&mut self) -> Result<Stmt> {
        self.expect(Token::While, "expected 'while'")?;
        self.expect(Token::LParen, "expected '(' after 'while'")?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen, "expected ')' after while condition")?;

        let body = self.parse_block()?;

        Ok(Stmt::While(WhileStmt { cond, body }))
    }

    /// Parse `let IDENT : type = expression ;`.
    fn parse_let_stmt(&mut self) -> Result<Stmt> {
        self.expect(Token::Let, "expected 'let'")?;
        let (name, span) = self.expect_ident("expected variable name")?;
        self.expect(Token::Colon, "expected ':' after variable name")?;
        let ty = self.parse_type()?;
        self.expect(Token::Eq, "expected '=' after variable type")?;
        let init = self.parse_expr()?;
        self.expect(Token::Semicolon, "expected ';' after variable initializer")?;

        Ok(Stmt::Let(LetStmt {
            name,
            ty,
            init,
            span,
        }))
    }

    /// Parse `free ( expression ) ;`.
    fn parse_free_stmt(&mut self) -> Result<Stmt> {
        let kw = self.expect(Token::Free, "expected 'free'")?;
        self.expect(Token::LParen, "expected '(' after 'free'")?;
        let ptr = self.parse_expr()?;
        self.expect(Token::RParen, "expected ')' after freed pointer")?;
        self.expect(Token::Semicolon, "expected ';' after 'free'")?;

        Ok(Stmt::Free(FreeStmt { ptr, span: kw.span }))
    }

    /// Parse `IDENT assignop expression ;`.
    fn parse_assign_stmt(&mut self) -> Result<Stmt> {
        let (name, span) = self.expect_ident("expected variable name")?;

        let op = match self.current_token() {
            Token::Eq => AssignOp::Assign,
            Token::PlusEq => AssignOp::Add,
            Token::MinusEq => AssignOp::Sub,
            Token::StarEq => AssignOp::Mul,
            Token::SlashEq => AssignOp::Div,
            _ => return Err(self.error("expected assignment operator")),
        };
        self.advance();

        let value = self.parse_expr()?;
        self.expect(Token::Semicolon, "expected ';' after assignment")?;

        Ok(Stmt::Assign(AssignStmt {
            name,
            op,
            value,
            span,
        }))
    }

    /// Parse a bare expression statement.
    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(Token::Semicolon, "expected ';' after expression")?;
        Ok(Stmt::Expr(expr))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::Parser;
    use lumac_lex::tokenize;
    use lumac_util::Symbol;

    fn parse(source: &str) -> Program {
        Parser::new(tokenize(source).unwrap()).parse().unwrap()
    }

    fn body(source: &str) -> Vec<Stmt> {
        parse(source).functions.remove(0).body.stmts
    }

    #[test]
    fn test_if_else() {
        let stmts = body("func max(a: i32, b: i32) -> i32 { if (a > b) { return a; } else { return b; } }");
        let Stmt::If(if_stmt) = &stmts[0] else {
            panic!("expected if");
        };
        let Expr::Binary(cond) = &if_stmt.cond else {
            panic!("expected binary condition");
        };
        assert_eq!(cond.op, BinOp::Gt);
        assert_eq!(if_stmt.then_block.stmts.len(), 1);
        assert_eq!(if_stmt.else_block.as_ref().unwrap().stmts.len(), 1);
    }

    #[test]
    fn test_if_without_else() {
        let stmts = body("func pos(x: i32) -> i32 { if (x > 0) { return 1; } return 0; }");
        let Stmt::If(if_stmt) = &stmts[0] else {
            panic!("expected if");
        };
        assert!(if_stmt.else_block.is_none());
        assert!(matches!(&stmts[1], Stmt::Return(_)));
    }

    #[test]
    fn test_while_loop() {
        let stmts = body(
            "func sum_to(n: i32) -> i32 { let s: i32 = 0; let i: i32 = 1; \
             while (i <= n) { s += i; i += 1; } return s; }",
        );
        assert_eq!(stmts.len(), 4);
        assert!(matches!(&stmts[0], Stmt::Let(l) if l.name == Symbol::intern("s")));
        assert!(matches!(&stmts[1], Stmt::Let(l) if l.ty == Ty::I32));

        let Stmt::While(while_stmt) = &stmts[2] else {
            panic!("expected while");
        };
        assert_eq!(while_stmt.body.stmts.len(), 2);
        let Stmt::Assign(first) = &while_stmt.body.stmts[0] else {
            panic!("expected assignment");
        };
        assert_eq!(first.op, AssignOp::Add);
    }

    #[test]
    fn test_assignment_operators() {
        for (text, op) in [
            ("=", AssignOp::Assign),
            ("+=", AssignOp::Add),
            ("-=", AssignOp::Sub),
            ("*=", AssignOp::Mul),
            ("/=", AssignOp::Div),
        ] {
            let source = format!("func f(x: i32) -> i32 {{ x {} 2; return x; }}", text);
            let mut program = Parser::new(tokenize(&source).unwrap()).parse().unwrap();
            let stmts = program.functions.remove(0).body.stmts;
            let Stmt::Assign(assign) = &stmts[0] else {
                panic!("expected assignment for {text}");
            };
            assert_eq!(assign.op, op);
        }
    }

    #[test]
    fn test_free_statement() {
        let stmts = body("func f(p: ptr<i32>) -> i32 { free(p); return 0; }");
        let Stmt::Free(free) = &stmts[0] else {
            panic!("expected free");
        };
        assert!(matches!(&free.ptr, Expr::Ident(i) if i.name == Symbol::intern("p")));
    }

    #[test]
    fn test_expression_statement() {
        let stmts = body("func f(x: i32) -> i32 { x + 1; return x; }");
        assert!(matches!(&stmts[0], Stmt::Expr(Expr::Binary(_))));
    }

    #[test]
    fn test_nested_blocks() {
        let stmts = body(
            "func f(x: i32) -> i32 { while (x > 0) { if (x == 1) { return 1; } x -= 1; } return 0; }",
        );
        let Stmt::While(w) = &stmts[0] else {
            panic!("expected while");
        };
        assert!(matches!(&w.body.stmts[0], Stmt::If(_)));
    }
}
