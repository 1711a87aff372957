//! Statement evaluation

use crate::ast::*;
use crate::environment::Environment;
use crate::interpreter::Interpreter;
use crate::value::{FunctionRef, FunctionValue, RuntimeError, Value};
use std::rc::Rc;
use tracing::{debug, trace};

impl Interpreter {
    /// Evaluate a statement, producing its value
    pub(super) fn eval_statement(
        &mut self,
        stmt: &Stmt,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        match stmt {
            Stmt::VarDecl(decl) => self.eval_var_decl(decl, env),
            Stmt::FunctionDecl(decl) => self.eval_function_decl(decl, env),
            Stmt::Expr(expr) => {
                trace!(kind = expr.kind_name(), "expression statement");
                self.eval_expr(expr, env)
            }
        }
    }

    /// `let` / `const`: the value is the declared value
    fn eval_var_decl(&mut self, decl: &VarDecl, env: &Environment) -> Result<Value, RuntimeError> {
        let value = match &decl.value {
            Some(expr) => self.eval_expr(expr, env)?,
            None => Value::Null,
        };

        debug!(name = %decl.name, constant = decl.constant, "declare");
        env.declare(decl.name.as_str(), value, decl.constant)
    }

    /// `func`: bind a closure over the current scope as a constant
    fn eval_function_decl(
        &mut self,
        decl: &Rc<FunctionDecl>,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let func = Value::Function(FunctionRef::new(FunctionValue {
            decl: Rc::clone(decl),
            closure: env.link(),
        }));

        debug!(name = %decl.name, params = decl.params.len(), "declare function");
        env.declare(decl.name.as_str(), func, true)
    }
}
