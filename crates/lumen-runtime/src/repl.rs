//! REPL core logic (UI-agnostic)

use crate::diagnostic::Diagnostic;
use crate::environment::Environment;
use crate::interpreter::{Interpreter, InterpreterConfig};
use crate::lexer;
use crate::parser::Parser;
use crate::stdlib::{self, CaptureBuffer};
use crate::value::Value;
use tracing::debug;

/// REPL result type
#[derive(Debug)]
pub struct ReplResult {
    /// The value produced by evaluation (None on error)
    pub value: Option<Value>,
    /// Diagnostics from whichever phase failed
    pub diagnostics: Vec<Diagnostic>,
    /// Output written by `print` and `log` during execution
    pub stdout: String,
}

/// A user binding, as listed by `ReplCore::variables`
#[derive(Debug, Clone, PartialEq)]
pub struct ReplBinding {
    pub name: String,
    pub value: Value,
    pub constant: bool,
}

/// REPL core state
///
/// Maintains persistent state across multiple eval calls:
/// - Variable and function declarations persist
/// - A failing line does not reset state; declarations it completed before
///   failing stay in place
pub struct ReplCore {
    interpreter: Interpreter,
    env: Environment,
    output: CaptureBuffer,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Create a new REPL core with the given interpreter limits
    pub fn with_config(config: InterpreterConfig) -> Self {
        let output = CaptureBuffer::new();
        Self {
            interpreter: Interpreter::with_config(config),
            env: stdlib::root_environment(output.sink()),
            output,
        }
    }

    /// Evaluate a line of input
    ///
    /// Runs the full pipeline: lex -> parse -> eval
    pub fn eval_line(&mut self, input: &str) -> ReplResult {
        let tokens = match lexer::tokenize(input) {
            Ok(tokens) => tokens,
            Err(e) => return self.failed(Diagnostic::from(&e)),
        };

        let program = match Parser::new(tokens).parse_program() {
            Ok(program) => program,
            Err(e) => return self.failed(Diagnostic::from(&e)),
        };

        match self.interpreter.evaluate_program(&program, &self.env) {
            Ok(value) => ReplResult {
                value: Some(value),
                diagnostics: Vec::new(),
                stdout: self.output.take(),
            },
            Err(e) => {
                debug!(error = %e, "line failed");
                self.failed(Diagnostic::from(&e))
            }
        }
    }

    fn failed(&self, diagnostic: Diagnostic) -> ReplResult {
        ReplResult {
            value: None,
            diagnostics: vec![diagnostic],
            stdout: self.output.take(),
        }
    }

    /// User bindings of the session, sorted by name
    ///
    /// Standard globals are left out.
    pub fn variables(&self) -> Vec<ReplBinding> {
        self.env
            .bindings()
            .into_iter()
            .filter(|(name, _, _)| !stdlib::is_global(name))
            .map(|(name, value, mutability)| ReplBinding {
                name,
                value,
                constant: mutability.is_constant(),
            })
            .collect()
    }

    /// The session's root environment
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Reset REPL state
    ///
    /// Drops all user declarations and rebuilds the standard globals.
    pub fn reset(&mut self) {
        let config = *self.interpreter.config();
        *self = Self::with_config(config);
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}
