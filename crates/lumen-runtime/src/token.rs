//! Token types for lexical analysis
//!
//! Defines all token types recognized by the Lumen lexer.

use serde::{Deserialize, Serialize};

/// Token type produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
        }
    }

    /// The end-of-input marker appended to every token stream
    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Integer literal (42)
    Number,
    /// Identifier
    Identifier,

    // Keywords
    /// `let` keyword (mutable variable)
    Let,
    /// `const` keyword (constant variable)
    Const,
    /// `func` keyword (function declaration)
    Func,

    // Operators
    /// One of `+ - * / %`
    BinaryOperator,
    /// `=` (assignment)
    Equals,

    // Punctuation
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Check if an identifier string is a keyword
    pub fn is_keyword(s: &str) -> Option<Self> {
        match s {
            "let" => Some(TokenKind::Let),
            "const" => Some(TokenKind::Const),
            "func" => Some(TokenKind::Func),
            _ => None,
        }
    }

    /// Human-readable description used in parse errors
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Let => "'let'",
            TokenKind::Const => "'const'",
            TokenKind::Func => "'func'",
            TokenKind::BinaryOperator => "operator",
            TokenKind::Equals => "'='",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Eof => "end of input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::is_keyword("let"), Some(TokenKind::Let));
        assert_eq!(TokenKind::is_keyword("const"), Some(TokenKind::Const));
        assert_eq!(TokenKind::is_keyword("func"), Some(TokenKind::Func));
        assert_eq!(TokenKind::is_keyword("fn"), None);
        assert_eq!(TokenKind::is_keyword("Let"), None);
    }

    #[test]
    fn test_eof_token() {
        let eof = Token::eof();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert!(eof.lexeme.is_empty());
    }
}
