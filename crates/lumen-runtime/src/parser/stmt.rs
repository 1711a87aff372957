//! Statement parsing

use crate::ast::*;
use crate::parser::{ParseError, Parser};
use crate::token::TokenKind;
use std::rc::Rc;

impl Parser {
    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().kind {
            TokenKind::Let | TokenKind::Const => self.parse_var_decl(),
            TokenKind::Func => self.parse_function(),
            _ => Ok(Stmt::Expr(self.parse_expression()?)),
        }
    }

    /// `let name [= value]` or `const name = value`
    fn parse_var_decl(&mut self) -> Result<Stmt, ParseError> {
        let constant = self.advance().kind == TokenKind::Const;
        let name = self.consume(TokenKind::Identifier)?.lexeme;

        let value = if self.match_token(TokenKind::Equals) {
            Some(self.parse_expression()?)
        } else if constant {
            return Err(ParseError::MissingConstInitializer { name });
        } else {
            None
        };

        Ok(Stmt::VarDecl(VarDecl {
            name,
            constant,
            value,
        }))
    }

    /// `func name(params) { body }`
    fn parse_function(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::Func)?;
        let name = self.consume(TokenKind::Identifier)?.lexeme;

        let params = self
            .parse_arguments()?
            .into_iter()
            .map(|arg| match arg {
                Expr::Identifier(param) => Ok(param),
                other => Err(ParseError::InvalidParameter {
                    found: other.kind_name().to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.consume(TokenKind::LeftBrace)?;
        let body = self.nested(|p| p.parse_body())?;
        self.consume(TokenKind::RightBrace)?;

        Ok(Stmt::FunctionDecl(Rc::new(FunctionDecl {
            name,
            params,
            body,
        })))
    }

    /// Statements up to (not including) the closing brace
    fn parse_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut body = Vec::new();

        self.skip_semicolons();
        while !self.is_at_end() && !self.check(TokenKind::RightBrace) {
            body.push(self.parse_statement()?);
            self.skip_semicolons();
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::{ParseError, Parser};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::rc::Rc;

    fn parse(source: &str) -> Result<Program, ParseError> {
        let (tokens, _) = Lexer::new(source).tokenize();
        Parser::new(tokens).parse_program()
    }

    #[test]
    fn test_let_with_initializer() {
        let program = parse("let x = 5;").unwrap();
        assert_eq!(
            program.body,
            vec![Stmt::VarDecl(VarDecl {
                name: "x".to_string(),
                constant: false,
                value: Some(Expr::Number(5.0)),
            })]
        );
    }

    #[test]
    fn test_let_without_initializer() {
        let program = parse("let x;").unwrap();
        assert_eq!(
            program.body,
            vec![Stmt::VarDecl(VarDecl {
                name: "x".to_string(),
                constant: false,
                value: None,
            })]
        );
    }

    #[rstest]
    #[case("const x;")]
    #[case("const x")]
    fn test_const_requires_initializer(#[case] source: &str) {
        assert_eq!(
            parse(source).unwrap_err(),
            ParseError::MissingConstInitializer {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_function_declaration() {
        let program = parse("func add(a, b) { a + b }").unwrap();
        assert_eq!(
            program.body,
            vec![Stmt::FunctionDecl(Rc::new(FunctionDecl {
                name: "add".to_string(),
                params: vec!["a".to_string(), "b".to_string()],
                body: vec![Stmt::Expr(Expr::Binary {
                    left: Box::new(Expr::Identifier("a".to_string())),
                    right: Box::new(Expr::Identifier("b".to_string())),
                    op: BinaryOp::Add,
                })],
            }))]
        );
    }

    #[test]
    fn test_empty_function() {
        let program = parse("func noop() {}").unwrap();
        match &program.body[0] {
            Stmt::FunctionDecl(decl) => {
                assert!(decl.params.is_empty());
                assert!(decl.body.is_empty());
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[rstest]
    #[case("func f(1) {}", "number")]
    #[case("func f(a + b) {}", "binary expression")]
    #[case("func f(a, g()) {}", "call")]
    fn test_parameters_must_be_identifiers(#[case] source: &str, #[case] found: &str) {
        assert_eq!(
            parse(source).unwrap_err(),
            ParseError::InvalidParameter {
                found: found.to_string()
            }
        );
    }

    #[rstest]
    #[case("func f(a) { a")]
    #[case("func (a) { a }")]
    #[case("func f a { a }")]
    #[case("let = 5")]
    fn test_malformed_declarations(#[case] source: &str) {
        assert!(matches!(
            parse(source),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_nested_function() {
        let program = parse("func outer() { let x = 1; func inner() { x } inner() }").unwrap();
        match &program.body[0] {
            Stmt::FunctionDecl(decl) => assert_eq!(decl.body.len(), 3),
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }
}
