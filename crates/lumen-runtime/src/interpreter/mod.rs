//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation against a chain of `Environment` scopes.
//! Supports:
//! - Expression evaluation (numbers, identifiers, arithmetic, objects, members)
//! - Declarations (`let`, `const`, `func`) and assignment
//! - Calls to user closures and native functions
//!
//! The interpreter itself holds no variables; every evaluation receives the
//! environment to run in, so a host can evaluate many programs against one
//! long-lived root scope.

mod expr;
mod stmt;

use crate::ast::{Program, Stmt};
use crate::environment::Environment;
use crate::stack::ensure_sufficient_stack;
use crate::value::{FunctionValue, RuntimeError, Value};
use tracing::debug;

/// Default limit on nested evaluation depth
pub const DEFAULT_MAX_DEPTH: usize = 2048;

/// Interpreter limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Deepest nesting of expression evaluation before `RecursionLimit`
    pub max_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Interpreter state
pub struct Interpreter {
    config: InterpreterConfig,
    /// Current evaluation depth
    depth: usize,
}

impl Interpreter {
    /// Create a new interpreter with default limits
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Create a new interpreter with the given limits
    pub fn with_config(config: InterpreterConfig) -> Self {
        Self { config, depth: 0 }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Evaluate a program
    ///
    /// Statements run in order; the result is the value of the last one, or
    /// `Null` for an empty program. The first error aborts the rest.
    pub fn evaluate_program(
        &mut self,
        program: &Program,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        // A previous run may have been cut short by an error mid-call
        self.depth = 0;
        self.eval_block(&program.body, env)
    }

    /// Evaluate statements in order, returning the last value
    pub(super) fn eval_block(
        &mut self,
        body: &[Stmt],
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let mut last_value = Value::Null;
        for stmt in body {
            last_value = self.eval_statement(stmt, env)?;
        }
        Ok(last_value)
    }

    /// Run `f` one evaluation level deeper, failing past the limit
    pub(super) fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<Value, RuntimeError>,
    ) -> Result<Value, RuntimeError> {
        if self.depth >= self.config.max_depth {
            return Err(RuntimeError::RecursionLimit {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Call a user function with already-evaluated arguments
    ///
    /// The body runs in a fresh child of the captured environment with one
    /// mutable binding per parameter.
    pub(super) fn call_function(
        &mut self,
        func: &FunctionValue,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let params = func.params();
        if args.len() != params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: func.name().to_string(),
                expected: params.len(),
                found: args.len(),
            });
        }

        debug!(function = func.name(), args = args.len(), depth = self.depth, "call");

        let scope = func.closure.child();
        for (param, arg) in params.iter().zip(args) {
            scope.declare(param.as_str(), arg, false)?;
        }

        self.eval_block(&func.decl.body, &scope)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
