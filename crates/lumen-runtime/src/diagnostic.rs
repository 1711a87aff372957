//! Diagnostics for errors
//!
//! Every failure a host can see (lex, parse or runtime) converts into a
//! `Diagnostic` with a stable code, so the CLI and REPL format them the same
//! way and tooling can consume them as JSON.

use crate::error::Error;
use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::value::RuntimeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic schema version
pub const DIAG_VERSION: u32 = 1;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Evaluation could not complete
    Error,
    /// Reported but not fatal
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// Pipeline stage that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lex,
    Parse,
    Runtime,
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic schema version
    pub diag_version: u32,
    /// Severity level
    pub level: DiagnosticLevel,
    /// Error code (e.g., "RT0001")
    pub code: String,
    /// Stage that failed
    pub phase: Phase,
    /// Main diagnostic message
    pub message: String,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(code: impl Into<String>, phase: Phase, message: impl Into<String>) -> Self {
        Self {
            diag_version: DIAG_VERSION,
            level: DiagnosticLevel::Error,
            code: code.into(),
            phase,
            message: message.into(),
            help: None,
        }
    }

    /// Create a new warning diagnostic with code
    pub fn warning_with_code(
        code: impl Into<String>,
        phase: Phase,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            ..Self::error_with_code(code, phase, message)
        }
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        // error[RT0001]: Cannot resolve variable 'x'
        let mut output = format!("{}[{}]: {}\n", self.level, self.code, self.message);

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }

    /// Format as JSON string
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.level, self.code, self.message)
    }
}

/// Error code registry
pub mod error_codes {
    // LX - Lexer
    pub const UNEXPECTED_CHARACTER: &str = "LX0001";

    // PA - Parser
    pub const UNEXPECTED_TOKEN: &str = "PA0001";
    pub const MISSING_CONST_INITIALIZER: &str = "PA0002";
    pub const INVALID_PARAMETER: &str = "PA0003";
    pub const INVALID_MEMBER_PROPERTY: &str = "PA0004";
    pub const NESTING_TOO_DEEP: &str = "PA0005";

    // RT - Runtime
    pub const UNDEFINED_VARIABLE: &str = "RT0001";
    pub const REDECLARATION: &str = "RT0002";
    pub const CONSTANT_REASSIGNMENT: &str = "RT0003";
    pub const INVALID_ASSIGNMENT_TARGET: &str = "RT0004";
    pub const DIVISION_BY_ZERO: &str = "RT0005";
    pub const NOT_CALLABLE: &str = "RT0006";
    pub const ARITY_MISMATCH: &str = "RT0007";
    pub const INVALID_MEMBER_ACCESS: &str = "RT0008";
    pub const INVALID_PROPERTY_KEY: &str = "RT0009";
    pub const RECURSION_LIMIT: &str = "RT0010";
    pub const NATIVE_ERROR: &str = "RT0011";
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        match err {
            LexError::UnexpectedCharacter { .. } => Diagnostic::error_with_code(
                error_codes::UNEXPECTED_CHARACTER,
                Phase::Lex,
                err.to_string(),
            )
            .with_help("only digits, letters, whitespace and ( ) { } [ ] , . : ; = + - * / % are valid"),
        }
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        let (code, help) = match err {
            ParseError::UnexpectedToken { .. } => (error_codes::UNEXPECTED_TOKEN, None),
            ParseError::MissingConstInitializer { .. } => (
                error_codes::MISSING_CONST_INITIALIZER,
                Some("use `let` for a variable without an initial value"),
            ),
            ParseError::InvalidParameter { .. } => (error_codes::INVALID_PARAMETER, None),
            ParseError::InvalidMemberProperty { .. } => (
                error_codes::INVALID_MEMBER_PROPERTY,
                Some("use `object[key]` for computed keys"),
            ),
            ParseError::NestingTooDeep { .. } => (error_codes::NESTING_TOO_DEEP, None),
        };

        let diag = Diagnostic::error_with_code(code, Phase::Parse, err.to_string());
        match help {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(err: &RuntimeError) -> Self {
        let (code, help) = match err {
            RuntimeError::UndefinedVariable { .. } => (
                error_codes::UNDEFINED_VARIABLE,
                Some("declare it first with `let` or `const`"),
            ),
            RuntimeError::Redeclaration { .. } => (
                error_codes::REDECLARATION,
                Some("assign with `name = value` to change an existing variable"),
            ),
            RuntimeError::ConstantReassignment { .. } => (
                error_codes::CONSTANT_REASSIGNMENT,
                Some("declare it with `let` if it needs to change"),
            ),
            RuntimeError::InvalidAssignmentTarget { .. } => {
                (error_codes::INVALID_ASSIGNMENT_TARGET, None)
            }
            RuntimeError::DivisionByZero => (error_codes::DIVISION_BY_ZERO, None),
            RuntimeError::NotCallable { .. } => (error_codes::NOT_CALLABLE, None),
            RuntimeError::ArityMismatch { .. } => (error_codes::ARITY_MISMATCH, None),
            RuntimeError::InvalidMemberAccess { .. } => (error_codes::INVALID_MEMBER_ACCESS, None),
            RuntimeError::InvalidPropertyKey { .. } => (error_codes::INVALID_PROPERTY_KEY, None),
            RuntimeError::RecursionLimit { .. } => (error_codes::RECURSION_LIMIT, None),
            RuntimeError::Native { .. } => (error_codes::NATIVE_ERROR, None),
        };

        let diag = Diagnostic::error_with_code(code, Phase::Runtime, err.to_string());
        match help {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        match err {
            Error::Lex(e) => e.into(),
            Error::Parse(e) => e.into(),
            Error::Runtime(e) => e.into(),
        }
    }
}

impl From<Error> for Diagnostic {
    fn from(err: Error) -> Self {
        Diagnostic::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_diagnostic() {
        let diag = Diagnostic::from(&LexError::UnexpectedCharacter { character: '#' });
        assert_eq!(diag.code, "LX0001");
        assert_eq!(diag.phase, Phase::Lex);
        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert!(diag.help.is_some());
    }

    #[test]
    fn test_runtime_codes_are_distinct() {
        let errors = [
            RuntimeError::UndefinedVariable { name: "x".into() },
            RuntimeError::Redeclaration { name: "x".into() },
            RuntimeError::ConstantReassignment { name: "x".into() },
            RuntimeError::InvalidAssignmentTarget { found: "number".into() },
            RuntimeError::DivisionByZero,
            RuntimeError::NotCallable { type_name: "null".into() },
            RuntimeError::ArityMismatch {
                name: "f".into(),
                expected: 1,
                found: 0,
            },
            RuntimeError::InvalidMemberAccess { type_name: "null".into() },
            RuntimeError::InvalidPropertyKey { type_name: "null".into() },
            RuntimeError::RecursionLimit { limit: 1 },
            RuntimeError::Native {
                name: "print".into(),
                message: "closed".into(),
            },
        ];

        let mut codes: Vec<String> = errors.iter().map(|e| Diagnostic::from(e).code).collect();
        assert!(codes.iter().all(|c| c.starts_with("RT")));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_human_format() {
        let diag = Diagnostic::from(&RuntimeError::DivisionByZero);
        assert_eq!(diag.to_human_string(), "error[RT0005]: Division by zero\n");

        let diag = Diagnostic::from(&RuntimeError::UndefinedVariable { name: "y".into() });
        assert_eq!(
            diag.to_human_string(),
            "error[RT0001]: Cannot resolve variable 'y'\n   = help: declare it first with `let` or `const`\n"
        );
    }

    #[test]
    fn test_json_shape() {
        let diag = Diagnostic::from(&ParseError::NestingTooDeep { limit: 4 });
        let json: serde_json::Value = serde_json::from_str(&diag.to_json_compact().unwrap()).unwrap();
        assert_eq!(json["code"], "PA0005");
        assert_eq!(json["phase"], "parse");
        assert_eq!(json["level"], "error");
        assert!(json.get("help").is_none());
    }

    #[test]
    fn test_warning_level() {
        let diag = Diagnostic::warning_with_code("RT9999", Phase::Runtime, "note");
        assert_eq!(diag.level, DiagnosticLevel::Warning);
        assert_eq!(diag.to_string(), "warning[RT9999]: note");
    }
}
