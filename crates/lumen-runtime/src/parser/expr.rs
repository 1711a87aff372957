//! Expression parsing
//!
//! One method per precedence level, lowest first:
//! assignment, object literal, additive, multiplicative, member/call, primary.

use crate::ast::*;
use crate::parser::{ParseError, Parser};
use crate::token::TokenKind;

impl Parser {
    /// Parse an expression
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(|p| p.parse_assignment())
    }

    /// `target = value`, right-associative
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_object()?;

        if self.match_token(TokenKind::Equals) {
            let value = self.parse_expression()?;
            return Ok(Expr::Assignment {
                target: Box::new(target),
                value: Box::new(value),
            });
        }

        Ok(target)
    }

    /// `{ key, key: value, ... }`, or fall through to additive
    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        if !self.match_token(TokenKind::LeftBrace) {
            return self.parse_additive();
        }

        let mut properties = Vec::new();

        while !self.check(TokenKind::RightBrace) {
            let key = self.consume(TokenKind::Identifier)?.lexeme;

            let value = if self.match_token(TokenKind::Colon) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            properties.push(Property { key, value });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::RightBrace)?;
        Ok(Expr::Object(properties))
    }

    /// Left-associative `+ -`
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        self.chained(|p| {
            let mut left = p.parse_multiplicative()?;

            while let Some(op) = p.binary_operator(|op| !op.is_multiplicative()) {
                p.extend_chain()?;
                p.advance();
                let right = p.parse_multiplicative()?;
                left = Expr::Binary {
                    left: Box::new(left),
                    right: Box::new(right),
                    op,
                };
            }

            Ok(left)
        })
    }

    /// Left-associative `* / %`
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        self.chained(|p| {
            let mut left = p.parse_call_member()?;

            while let Some(op) = p.binary_operator(BinaryOp::is_multiplicative) {
                p.extend_chain()?;
                p.advance();
                let right = p.parse_call_member()?;
                left = Expr::Binary {
                    left: Box::new(left),
                    right: Box::new(right),
                    op,
                };
            }

            Ok(left)
        })
    }

    /// The operator at the current token, if it is one `accept` allows
    fn binary_operator(&self, accept: impl Fn(&BinaryOp) -> bool) -> Option<BinaryOp> {
        let token = self.peek();
        if token.kind != TokenKind::BinaryOperator {
            return None;
        }
        BinaryOp::from_symbol(&token.lexeme).filter(|op| accept(op))
    }

    /// Primary followed by any chain of `.name`, `[expr]` and `(args)`
    fn parse_call_member(&mut self) -> Result<Expr, ParseError> {
        self.chained(|p| {
            let mut expr = p.parse_primary()?;

            loop {
                if !matches!(
                    p.peek().kind,
                    TokenKind::Dot | TokenKind::LeftBracket | TokenKind::LeftParen
                ) {
                    return Ok(expr);
                }
                p.extend_chain()?;

                expr = match p.peek().kind {
                    TokenKind::Dot => {
                        p.advance();
                        let property = p.parse_primary()?;
                        if !matches!(property, Expr::Identifier(_)) {
                            return Err(ParseError::InvalidMemberProperty {
                                found: property.kind_name().to_string(),
                            });
                        }
                        Expr::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: false,
                        }
                    }
                    TokenKind::LeftBracket => {
                        p.advance();
                        let property = p.parse_expression()?;
                        p.consume(TokenKind::RightBracket)?;
                        Expr::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: true,
                        }
                    }
                    _ => Expr::Call {
                        callee: Box::new(expr),
                        args: p.parse_arguments()?,
                    },
                };
            }
        })
    }

    /// `( expr, expr, ... )`
    pub(super) fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.consume(TokenKind::LeftParen)?;
        let mut args = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen)?;
        Ok(args)
    }

    /// Identifier, number, or parenthesized expression
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().kind {
            TokenKind::Identifier => Ok(Expr::Identifier(self.advance().lexeme)),
            TokenKind::Number => {
                let token = self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    ParseError::UnexpectedToken {
                        expected: "number".to_string(),
                        found: token.lexeme.clone(),
                    }
                })?;
                Ok(Expr::Number(value))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RightParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}
