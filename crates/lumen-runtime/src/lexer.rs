//! Lexical analysis (tokenization)
//!
//! The lexer converts Lumen source code into a stream of tokens in a single
//! left-to-right pass. Scanning stops at the first unrecognized character;
//! the stream is still terminated with `Eof` and the error is reported
//! alongside it, so callers can tell a truncated stream from a complete one.

use crate::token::{Token, TokenKind};
use thiserror::Error;
use tracing::{trace, warn};

/// Error produced while tokenizing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A character that starts no token. Scanning stopped here.
    #[error("Unexpected character '{character}'")]
    UnexpectedCharacter { character: char },
}

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Characters of source code
    chars: Vec<char>,
    /// Current position in chars
    current: usize,
    /// Start position of current token
    start_pos: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            chars: source.as_ref().chars().collect(),
            current: 0,
            start_pos: 0,
        }
    }

    /// Tokenize the source code, returning tokens and the error that stopped
    /// scanning, if any
    ///
    /// The returned stream always ends with exactly one `Eof` token. When an
    /// error is returned the stream only covers the input before the
    /// offending character.
    pub fn tokenize(&mut self) -> (Vec<Token>, Option<LexError>) {
        let mut tokens = Vec::new();
        let mut error = None;

        loop {
            match self.next_token() {
                Ok(Some(token)) => {
                    trace!(kind = ?token.kind, lexeme = %token.lexeme, "token");
                    tokens.push(token);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, consumed = tokens.len(), "lexing stopped early");
                    error = Some(e);
                    break;
                }
            }
        }

        tokens.push(Token::eof());
        (tokens, error)
    }

    /// Scan the next token, or `None` at end of input
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();
        self.start_pos = self.current;

        if self.is_at_end() {
            return Ok(None);
        }

        let c = self.advance();

        let token = match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ',' => self.make_token(TokenKind::Comma),
            '.' => self.make_token(TokenKind::Dot),
            ':' => self.make_token(TokenKind::Colon),
            ';' => self.make_token(TokenKind::Semicolon),
            '=' => self.make_token(TokenKind::Equals),
            '+' | '-' | '*' | '/' | '%' => self.make_token(TokenKind::BinaryOperator),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() => self.identifier(),

            character => return Err(LexError::UnexpectedCharacter { character }),
        };

        Ok(Some(token))
    }

    /// Skip whitespace
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\n' | '\t' | '\r')) {
            self.advance();
        }
    }

    /// Scan an integer literal (maximal run of digits)
    fn number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        self.make_token(TokenKind::Number)
    }

    /// Scan an identifier or keyword (maximal run of letters)
    fn identifier(&mut self) -> Token {
        while self.peek().is_some_and(char::is_alphabetic) {
            self.advance();
        }

        let text = self.lexeme();
        let kind = TokenKind::is_keyword(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text)
    }

    // === Character navigation ===

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current).copied()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    // === Token creation ===

    fn lexeme(&self) -> String {
        self.chars[self.start_pos..self.current].iter().collect()
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme())
    }
}

/// Tokenize source text, failing if the lexer could not scan all of it
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    match Lexer::new(source).tokenize() {
        (tokens, None) => Ok(tokens),
        (_, Some(error)) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, error) = Lexer::new(source).tokenize();
        assert_eq!(error, None);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        let (tokens, error) = Lexer::new("").tokenize();
        assert_eq!(tokens, vec![Token::eof()]);
        assert_eq!(error, None);
    }

    #[test]
    fn test_let_statement() {
        let (tokens, _) = Lexer::new("let x = 5;").tokenize();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Let, "let"),
                Token::new(TokenKind::Identifier, "x"),
                Token::new(TokenKind::Equals, "="),
                Token::new(TokenKind::Number, "5"),
                Token::new(TokenKind::Semicolon, ";"),
                Token::eof(),
            ]
        );
    }

    #[test]
    fn test_single_char_tokens() {
        assert_eq!(
            kinds("(){}[],.:;="),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Equals,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators_share_one_kind() {
        let (tokens, _) = Lexer::new("+-*/%").tokenize();
        let lexemes: Vec<&str> = tokens[..5].iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["+", "-", "*", "/", "%"]);
        assert!(tokens[..5].iter().all(|t| t.kind == TokenKind::BinaryOperator));
    }

    #[test]
    fn test_maximal_runs() {
        let (tokens, _) = Lexer::new("1234abc 9").tokenize();
        assert_eq!(tokens[0], Token::new(TokenKind::Number, "1234"));
        assert_eq!(tokens[1], Token::new(TokenKind::Identifier, "abc"));
        assert_eq!(tokens[2], Token::new(TokenKind::Number, "9"));
    }

    #[test]
    fn test_keywords_need_exact_match() {
        assert_eq!(
            kinds("let const func letter constant"),
            vec![
                TokenKind::Let,
                TokenKind::Const,
                TokenKind::Func,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(
            kinds(" \t\r\n x \n"),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unexpected_character_truncates() {
        let (tokens, error) = Lexer::new("let x = 1 # 2;").tokenize();
        assert_eq!(error, Some(LexError::UnexpectedCharacter { character: '#' }));
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_surfaces_error() {
        assert!(tokenize("x_y").is_err());
        assert_eq!(tokenize("x").map(|t| t.len()), Ok(2));
    }
}
