//! Parsing (tokens to AST)
//!
//! Recursive descent over the token stream. Statements are handled in
//! `stmt.rs`, expressions (one function per precedence level) in `expr.rs`.
//! Parse errors are fatal: the first one aborts the parse and is returned.

mod expr;
mod stmt;

use crate::ast::Program;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenKind};
use thiserror::Error;
use tracing::trace;

/// Default limit on syntactic nesting (parentheses, objects, bodies, and each
/// link of an operator or call chain)
pub const DEFAULT_MAX_NESTING: usize = 512;

/// Error produced while parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token other than the one the grammar requires
    #[error("Expected {expected} but found {found}")]
    UnexpectedToken { expected: String, found: String },
    /// `const` declared without `= value`
    #[error("Constant '{name}' must be initialized")]
    MissingConstInitializer { name: String },
    /// A function parameter that is not a bare identifier
    #[error("Function parameters must be identifiers, found {found}")]
    InvalidParameter { found: String },
    /// `object.<not an identifier>`
    #[error("Expected identifier after '.', found {found}")]
    InvalidMemberProperty { found: String },
    /// Input nested deeper than the parser's limit
    #[error("Nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Parser state for building AST from tokens
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    /// Create a new parser for the given tokens
    ///
    /// An `Eof` token is appended if the stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            tokens.push(Token::eof());
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_NESTING,
        }
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse tokens into a program, consuming everything up to `Eof`
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();

        self.skip_semicolons();
        while !self.is_at_end() {
            let stmt = self.parse_statement()?;
            trace!(index = body.len(), "parsed statement");
            body.push(stmt);
            self.skip_semicolons();
        }

        Ok(Program { body })
    }

    // === Helper methods ===

    /// Run `f` one nesting level deeper, failing past the limit
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Run a left-to-right chain, restoring the depth its links took
    pub(super) fn chained<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let start = self.depth;
        let result = f(self);
        self.depth = start;
        result
    }

    /// Charge one nesting level for another link of a chain
    ///
    /// Each operator or postfix link wraps everything before it in a new
    /// node, so a chain is as deep as it is long.
    pub(super) fn extend_chain(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Advance to next token and return the consumed one
    pub(super) fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume token of given kind or fail
    pub(super) fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    /// Build an error for the current token
    pub(super) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: describe_token(self.peek()),
        }
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Statement separators are optional; skip any run of them
    pub(super) fn skip_semicolons(&mut self) {
        while self.match_token(TokenKind::Semicolon) {}
    }
}

/// Describe a token for error messages
fn describe_token(token: &Token) -> String {
    match token.kind {
        TokenKind::Number | TokenKind::Identifier | TokenKind::BinaryOperator => {
            format!("{} '{}'", token.kind.describe(), token.lexeme)
        }
        kind => kind.describe().to_string(),
    }
}

/// Tokenize and parse source text
pub fn parse_source(source: &str) -> Result<Program, crate::Error> {
    let tokens = crate::lexer::tokenize(source)?;
    Ok(Parser::new(tokens).parse_program()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Program, ParseError> {
        let (tokens, error) = Lexer::new(source).tokenize();
        assert_eq!(error, None);
        Parser::new(tokens).parse_program()
    }

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_parser_creation() {
        let program = Parser::new(Vec::new()).parse_program().unwrap();
        assert!(program.body.is_empty());
    }

    #[test]
    fn test_precedence() {
        let program = parse("2 + 3 * 4").unwrap();
        assert_eq!(
            program.body,
            vec![Stmt::Expr(Expr::Binary {
                left: num(2.0),
                right: Box::new(Expr::Binary {
                    left: num(3.0),
                    right: num(4.0),
                    op: BinaryOp::Mul,
                }),
                op: BinaryOp::Add,
            })]
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let program = parse("(2 + 3) * 4").unwrap();
        assert_eq!(
            program.body,
            vec![Stmt::Expr(Expr::Binary {
                left: Box::new(Expr::Binary {
                    left: num(2.0),
                    right: num(3.0),
                    op: BinaryOp::Add,
                }),
                right: num(4.0),
                op: BinaryOp::Mul,
            })]
        );
    }

    #[test]
    fn test_semicolons_are_optional() {
        let with = parse("let x = 1; x;").unwrap();
        let without = parse("let x = 1 x").unwrap();
        assert_eq!(with, without);
        assert_eq!(parse(";;;").unwrap().body.len(), 0);
    }

    #[test]
    fn test_missing_closing_paren() {
        let err = parse("(1 + 2").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "')'".to_string(),
                found: "end of input".to_string(),
            }
        );
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("{}1{}", "(".repeat(40), ")".repeat(40));
        let (tokens, _) = Lexer::new(&source).tokenize();
        let err = Parser::new(tokens.clone())
            .with_max_depth(16)
            .parse_program()
            .unwrap_err();
        assert_eq!(err, ParseError::NestingTooDeep { limit: 16 });

        assert!(Parser::new(tokens).parse_program().is_ok());
    }

    #[test]
    fn test_long_operator_chain_hits_nesting_limit() {
        for source in [
            format!("1{}", "+1".repeat(200)),
            format!("2{}", "*2".repeat(200)),
            format!("1{}", "-x*2".repeat(200)),
        ] {
            let (tokens, _) = Lexer::new(&source).tokenize();
            let err = Parser::new(tokens)
                .with_max_depth(64)
                .parse_program()
                .unwrap_err();
            assert_eq!(err, ParseError::NestingTooDeep { limit: 64 });
        }
    }

    #[test]
    fn test_long_postfix_chain_hits_nesting_limit() {
        for source in [
            format!("f{}", "()".repeat(200)),
            format!("o{}", ".a".repeat(200)),
            format!("o{}", "[0]".repeat(200)),
        ] {
            let (tokens, _) = Lexer::new(&source).tokenize();
            let err = Parser::new(tokens)
                .with_max_depth(64)
                .parse_program()
                .unwrap_err();
            assert_eq!(err, ParseError::NestingTooDeep { limit: 64 });
        }
    }

    #[test]
    fn test_huge_chain_fails_cleanly_at_default_limit() {
        let err = parse(&format!("1{}", "+1".repeat(50_000))).unwrap_err();
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                limit: DEFAULT_MAX_NESTING
            }
        );

        let err = parse(&format!("f{}", "()".repeat(50_000))).unwrap_err();
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                limit: DEFAULT_MAX_NESTING
            }
        );
    }

    #[test]
    fn test_chain_depth_is_released_between_statements() {
        // Each statement stays under the limit; only a single chain may not.
        let line = format!("1{}\n", "+1".repeat(40));
        let source = line.repeat(20);
        let (tokens, _) = Lexer::new(&source).tokenize();
        let program = Parser::new(tokens)
            .with_max_depth(64)
            .parse_program()
            .unwrap();
        assert_eq!(program.body.len(), 20);

        let source = format!("f(1{})(2{})", "+1".repeat(40), "+1".repeat(40));
        let (tokens, _) = Lexer::new(&source).tokenize();
        assert!(Parser::new(tokens).with_max_depth(64).parse_program().is_ok());
    }

    #[test]
    fn test_appends_missing_eof() {
        let tokens = vec![Token::new(TokenKind::Number, "7")];
        let program = Parser::new(tokens).parse_program().unwrap();
        assert_eq!(program.body, vec![Stmt::Expr(Expr::Number(7.0))]);
    }
}
