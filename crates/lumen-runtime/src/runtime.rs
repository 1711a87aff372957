//! Lumen runtime API for embedding

use crate::ast::Program;
use crate::environment::{Environment, Mutability};
use crate::error::Result;
use crate::interpreter::{Interpreter, InterpreterConfig};
use crate::parser::{Parser, DEFAULT_MAX_NESTING};
use crate::stdlib::{self, OutputSink};
use crate::value::{RuntimeError, Value};
use crate::lexer;
use std::cell::RefCell;
use tracing::debug;

/// Lumen runtime instance
///
/// Owns a root environment seeded with the standard globals. Declarations
/// persist across `eval` calls, so a host can feed a program piece by piece.
///
/// # Examples
///
/// ```
/// use lumen_runtime::{Lumen, Value};
///
/// let runtime = Lumen::new();
/// runtime.eval("let x = 20").unwrap();
/// assert_eq!(runtime.eval("x + 22").unwrap(), Value::Number(42.0));
/// ```
pub struct Lumen {
    /// Interpreter for executing code (using interior mutability)
    interpreter: RefCell<Interpreter>,
    /// Root scope shared by every evaluation
    env: Environment,
    /// Parser nesting limit
    max_nesting: usize,
}

impl Lumen {
    /// Create a runtime that prints to stdout
    pub fn new() -> Self {
        Self::with_output(stdlib::stdout_sink())
    }

    /// Create a runtime whose `print` and `log` write to `output`
    ///
    /// ```
    /// use lumen_runtime::{stdlib::CaptureBuffer, Lumen};
    ///
    /// let buffer = CaptureBuffer::new();
    /// let runtime = Lumen::with_output(buffer.sink());
    /// runtime.eval("print(1, 2)").unwrap();
    /// assert_eq!(buffer.take(), "1, 2\n");
    /// ```
    pub fn with_output(output: OutputSink) -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::new()),
            env: stdlib::root_environment(output),
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    /// Replace the interpreter limits
    pub fn with_config(self, config: InterpreterConfig) -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::with_config(config)),
            ..self
        }
    }

    /// Replace the parser nesting limit
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// The root environment
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Bind a native function in the root environment as a constant
    ///
    /// ```
    /// use lumen_runtime::{Lumen, Value};
    ///
    /// let runtime = Lumen::new();
    /// runtime.register_native("twice", |args, _| match args {
    ///     [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
    ///     _ => Ok(Value::Null),
    /// });
    /// assert_eq!(runtime.eval("twice(21)").unwrap(), Value::Number(42.0));
    /// ```
    pub fn register_native(
        &self,
        name: &str,
        func: impl Fn(&[Value], &Environment) -> std::result::Result<Value, RuntimeError> + 'static,
    ) {
        debug!(name, "register native");
        self.env
            .define(name, Value::native(name, func), Mutability::Constant);
    }

    /// Parse source text with this runtime's nesting limit
    pub fn parse(&self, source: &str) -> Result<Program> {
        let tokens = lexer::tokenize(source)?;
        let program = Parser::new(tokens)
            .with_max_depth(self.max_nesting)
            .parse_program()?;
        Ok(program)
    }

    /// Evaluate Lumen source code
    ///
    /// Returns the value of the last statement. A lex, parse or runtime error
    /// is returned as is; declarations made before a runtime error persist.
    pub fn eval(&self, source: &str) -> Result<Value> {
        let program = self.parse(source)?;
        Ok(self.eval_program(&program)?)
    }

    /// Evaluate an already parsed program in the root environment
    pub fn eval_program(&self, program: &Program) -> std::result::Result<Value, RuntimeError> {
        self.interpreter
            .borrow_mut()
            .evaluate_program(program, &self.env)
    }
}

impl Default for Lumen {
    fn default() -> Self {
        Self::new()
    }
}
