//! Type expression parsing.

use crate::ast::Ty;
use crate::{Parser, Result};
use lumac_lex::Token;

impl Parser {
    /// Parse a type expression: a scalar type name, `string`, or
    /// `ptr<type>`.
    pub(crate) fn parse_type(&mut self) -> Result<Ty> {
        match self.current_token() {
            Token::Type(kw) => {
                self.advance();
                Ok(Ty::from(kw))
            },
            Token::Ptr => {
                self.advance();
                self.expect(Token::Lt, "expected '<' after 'ptr'")?;
                let inner = self.parse_type()?;
                self.expect(Token::Gt, "expected '>' after pointer element type")?;
                Ok(Ty::Ptr(Box::new(inner)))
            },
            _ => Err(self.error("expected type")),
        }
    }
}
