//! Top-level item parsing - function definitions and parameter lists.

use crate::ast::*;
use crate::{Parser, Result};
use lumac_lex::Token;

impl Parser {
    /// Parse a function definition.
    pub(crate) fn parse_function(&mut self) -> Result<Function> {
        self.expect(Token::Func, "expected 'func'")?;
        let (name, span) = self.expect_ident("expected function name")?;

        self.expect(Token::LParen, "expected '(' after function name")?;
        let params = if self.check(Token::RParen) {
            Vec::new()
        } else {
            self.parse_params()?
        };
        self.expect(Token::RParen, "expected ')' after parameters")?;

        self.expect(Token::Arrow, "expected '->' before return type")?;
        let ret_ty = self.parse_type()?;

        let body = self.parse_block()?;

        Ok(Function {
            name,
            params,
            ret_ty,
            body,
            span,
        })
    }

    /// Parse a comma-separated parameter list.
    fn parse_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();

        loop {
            let (name, _) = self.expect_ident("expected parameter name")?;
            self.expect(Token::Colon, "expected ':' after parameter name")?;
            let ty = self.parse_type()?;
            params.push(Param { name, ty });

            if !self.match_token(Token::Comma) {
                break;
            }
        }

        Ok(params)
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

    #[test]
    fn test_no_params() {
        let program = parse("func zero() -> i32 { return 0; }");
        assert!(program.functions[0].params.is_empty());
    }

    #[test]
    fn test_pointer_param() {
        let program = parse("func first(arr: ptr<i32>, n: i32) -> i32 { return @arr; }");
        let func = &program.functions[0];
        assert_eq!(func.params[0].ty, Ty::Ptr(Box::new(Ty::I32)));
        assert_eq!(func.params[1].ty, Ty::I32);
    }

    #[test]
    fn test_pointer_return_type() {
        let program = parse("func buf(n: i32) -> ptr<f64> { return alloc(f64, n); }");
        assert_eq!(
            program.functions[0].ret_ty,
            Ty::Ptr(Box::new(Ty::F64))
        );
    }

    #[test]
    fn test_function_span_points_at_name() {
        let program = parse("func answer() -> i32 { return 42; }");
        let func = &program.functions[0];
        assert_eq!(func.name, Symbol::intern("answer"));
        assert_eq!(func.span.column, 6);
    }
}
