//! Top-level error type for the embedding API

use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::value::RuntimeError;
use thiserror::Error;

/// Any failure while turning source text into a value
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Result alias for the embedding API
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The runtime error, if evaluation is what failed
    pub fn as_runtime(&self) -> Option<&RuntimeError> {
        match self {
            Error::Runtime(e) => Some(e),
            _ => None,
        }
    }
}
