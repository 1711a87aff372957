//! Expression evaluation

use crate::ast::*;
use crate::environment::Environment;
use crate::interpreter::Interpreter;
use crate::value::{RuntimeError, Value};
use tracing::debug;

impl Interpreter {
    /// Evaluate an expression
    pub(super) fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> Result<Value, RuntimeError> {
        self.nested(|interp| match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Identifier(name) => env.lookup(name),
            Expr::Binary { left, right, op } => interp.eval_binary(left, right, *op, env),
            Expr::Assignment { target, value } => interp.eval_assignment(target, value, env),
            Expr::Object(properties) => interp.eval_object(properties, env),
            Expr::Call { callee, args } => interp.eval_call(callee, args, env),
            Expr::Member {
                object,
                property,
                computed,
            } => interp.eval_member(object, property, *computed, env),
        })
    }

    /// Arithmetic on numbers; any other operand yields `Null`
    fn eval_binary(
        &mut self,
        left: &Expr,
        right: &Expr,
        op: BinaryOp,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let left = self.eval_expr(left, env)?;
        let right = self.eval_expr(right, env)?;

        let (a, b) = match (left, right) {
            (Value::Number(a), Value::Number(b)) => (a, b),
            _ => return Ok(Value::Null),
        };

        let result = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => {
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                a / b
            }
            BinaryOp::Mod => a % b,
        };

        Ok(Value::Number(result))
    }

    /// `name = value`; the result is the assigned value
    fn eval_assignment(
        &mut self,
        target: &Expr,
        value: &Expr,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let name = match target {
            Expr::Identifier(name) => name,
            other => {
                return Err(RuntimeError::InvalidAssignmentTarget {
                    found: other.kind_name().to_string(),
                })
            }
        };

        let value = self.eval_expr(value, env)?;
        env.assign(name, value)
    }

    /// Object literal; shorthand properties read the variable of the same name
    fn eval_object(
        &mut self,
        properties: &[Property],
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let mut entries = Vec::with_capacity(properties.len());

        for property in properties {
            let value = match &property.value {
                Some(expr) => self.eval_expr(expr, env)?,
                None => env.lookup(&property.key)?,
            };
            entries.push((property.key.clone(), value));
        }

        Ok(Value::object(entries))
    }

    /// Call: arguments left to right, then the callee
    fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let args = args
            .iter()
            .map(|arg| self.eval_expr(arg, env))
            .collect::<Result<Vec<_>, _>>()?;

        match self.eval_expr(callee, env)? {
            Value::NativeFunction(native) => {
                debug!(function = native.name(), args = args.len(), "native call");
                native.call(&args, env)
            }
            Value::Function(func) => self.call_function(&func, args),
            other => Err(RuntimeError::NotCallable {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    /// `object.name` or `object[key]`; a missing property is `Null`
    fn eval_member(
        &mut self,
        object: &Expr,
        property: &Expr,
        computed: bool,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let map = match self.eval_expr(object, env)? {
            Value::Object(map) => map,
            other => {
                return Err(RuntimeError::InvalidMemberAccess {
                    type_name: other.type_name().to_string(),
                })
            }
        };

        let key = match (computed, property) {
            (false, Expr::Identifier(name)) => name.clone(),
            (false, other) => {
                return Err(RuntimeError::InvalidPropertyKey {
                    type_name: other.kind_name().to_string(),
                })
            }
            // Object keys are identifiers, so a numeric key never matches one
            (true, expr) => match self.eval_expr(expr, env)? {
                key @ Value::Number(_) => key.to_string(),
                other => {
                    return Err(RuntimeError::InvalidPropertyKey {
                        type_name: other.type_name().to_string(),
                    })
                }
            },
        };

        Ok(map.get(&key).cloned().unwrap_or(Value::Null))
    }
}
