//! Lumen Runtime - Core language implementation
//!
//! This library provides the complete Lumen language runtime:
//! - Lexical analysis and parsing
//! - Lexically scoped environments and closures
//! - Tree-walking interpretation
//! - Standard globals and the native function bridge
//! - Embedding and REPL APIs

/// Lumen runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod stack;
pub mod stdlib;
pub mod token;
pub mod value;

// Re-export commonly used types
pub use ast::{Program, VersionedProgram, AST_VERSION};
pub use diagnostic::{error_codes, Diagnostic, DiagnosticLevel, Phase, DIAG_VERSION};
pub use environment::{Environment, Mutability, ScopeLink, WeakEnvironment};
pub use error::{Error, Result};
pub use interpreter::{Interpreter, InterpreterConfig};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser};
pub use repl::{ReplBinding, ReplCore, ReplResult};
pub use runtime::Lumen;
pub use token::{Token, TokenKind};
pub use value::{FunctionRef, FunctionValue, NativeFunction, RuntimeError, Value};

/// Lex and parse source text into a program
///
/// ```
/// let program = lumen_runtime::parse_program("let x = 1; x + 1").unwrap();
/// assert_eq!(program.body.len(), 2);
/// ```
pub fn parse_program(source: &str) -> Result<Program> {
    parser::parse_source(source)
}

/// Evaluate a program against `env` with default limits
///
/// ```
/// use lumen_runtime::{evaluate, parse_program, Environment, Value};
///
/// let env = Environment::new();
/// let program = parse_program("func sq(n) { n * n } sq(7)").unwrap();
/// assert_eq!(evaluate(&program, &env).unwrap(), Value::Number(49.0));
/// ```
pub fn evaluate(program: &Program, env: &Environment) -> std::result::Result<Value, RuntimeError> {
    Interpreter::new().evaluate_program(program, env)
}
