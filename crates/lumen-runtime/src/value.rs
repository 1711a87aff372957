//! Runtime value representation
//!
//! - Null, Number, Bool: immediate values
//! - Object: reference-counted string-keyed map, immutable once built
//! - Function: a declaration plus the environment it was declared in
//! - NativeFunction: Rust closure callable from Lumen

use crate::ast::FunctionDecl;
use crate::environment::{self, Environment, ScopeLink};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use thiserror::Error;

/// Copy-on-write string-keyed map. Cheap to clone (refcount bump).
/// Mutations clone the inner HashMap if shared (`Rc::make_mut`).
#[derive(Clone, Debug, Default)]
pub struct ValueMap(Rc<HashMap<String, Value>>);

impl ValueMap {
    pub fn new() -> Self {
        ValueMap(Rc::new(HashMap::new()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: String, value: Value) {
        Rc::make_mut(&mut self.0).insert(key, value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Keys in sorted order, for stable display
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub(crate) fn shared(&self) -> &Rc<HashMap<String, Value>> {
        &self.0
    }
}

impl Drop for ValueMap {
    fn drop(&mut self) {
        if Rc::strong_count(&self.0) > 1 {
            environment::release_object(&self.0);
        }
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl From<HashMap<String, Value>> for ValueMap {
    fn from(m: HashMap<String, Value>) -> Self {
        ValueMap(Rc::new(m))
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        ValueMap(Rc::new(iter.into_iter().collect()))
    }
}

/// Native function implementation
///
/// Receives the evaluated arguments and the environment of the call site.
pub type NativeFn = Rc<dyn Fn(&[Value], &Environment) -> Result<Value, RuntimeError>>;

/// Host-provided callable, invoked exactly like a user function
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: NativeFn,
}

impl NativeFunction {
    /// Wrap a Rust closure as a callable value
    pub fn new(
        name: impl Into<Rc<str>>,
        func: impl Fn(&[Value], &Environment) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// Name given at registration (for display and errors)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with evaluated arguments and the calling environment
    pub fn call(&self, args: &[Value], env: &Environment) -> Result<Value, RuntimeError> {
        (self.func)(args, env)
    }
}

/// User-defined function: declaration plus captured declaration environment
#[derive(Clone)]
pub struct FunctionValue {
    pub decl: Rc<FunctionDecl>,
    /// Scope active where the function was declared, shared by reference
    pub closure: ScopeLink,
}

impl FunctionValue {
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn params(&self) -> &[String] {
        &self.decl.params
    }
}

/// Shared reference to a user function
///
/// Dropping one of several references may leave the function's scope held
/// only by a cycle, so drops are reported to the environment.
#[derive(Clone)]
pub struct FunctionRef(Rc<FunctionValue>);

impl FunctionRef {
    pub fn new(func: FunctionValue) -> Self {
        FunctionRef(Rc::new(func))
    }

    /// True if both refer to the same function value
    pub fn ptr_eq(&self, other: &FunctionRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn shared(&self) -> &Rc<FunctionValue> {
        &self.0
    }
}

impl Deref for FunctionRef {
    type Target = FunctionValue;

    fn deref(&self) -> &FunctionValue {
        &self.0
    }
}

impl Drop for FunctionRef {
    fn drop(&mut self) {
        if Rc::strong_count(&self.0) > 1 {
            environment::release_function(&self.0);
        }
    }
}

/// Runtime value type
#[derive(Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Numeric value (IEEE 754 double-precision)
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Object value (string keys)
    Object(ValueMap),
    /// Native function (Rust closure callable from Lumen)
    NativeFunction(NativeFunction),
    /// User-defined function (closure)
    Function(FunctionRef),
}

impl Value {
    /// Create a new object value
    pub fn object(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Object(entries.into_iter().collect())
    }

    /// Create a new native function value
    pub fn native(
        name: impl Into<Rc<str>>,
        func: impl Fn(&[Value], &Environment) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Value::NativeFunction(NativeFunction::new(name, func))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Object(_) => "object",
            Value::NativeFunction(_) => "native-function",
            Value::Function(_) => "function",
        }
    }

    /// True for both user and native functions
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::NativeFunction(_))
    }

    /// Get a display string representation
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Value {
    /// Data compares by content; functions compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(&a.func, &b.func),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => {
                // No trailing .0 for whole numbers
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Object(map) => {
                if map.is_empty() {
                    return write!(f, "{{}}");
                }
                let entries: Vec<String> = map
                    .sorted_keys()
                    .into_iter()
                    .filter_map(|key| map.get(key).map(|value| format!("{}: {}", key, value)))
                    .collect();
                write!(f, "{{ {} }}", entries.join(", "))
            }
            Value::NativeFunction(native) => write!(f, "<native fn {}>", native.name()),
            Value::Function(func) => write!(f, "<fn {}>", func.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Object(map) => {
                let mut debug = f.debug_map();
                for key in map.sorted_keys() {
                    if let Some(value) = map.get(key) {
                        debug.entry(&key, value);
                    }
                }
                debug.finish()
            }
            Value::NativeFunction(native) => write!(f, "NativeFunction({})", native.name()),
            Value::Function(func) => {
                write!(f, "Function({}({}))", func.name(), func.params().join(", "))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Runtime error type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    /// Name not declared in any enclosing scope
    #[error("Cannot resolve variable '{name}'")]
    UndefinedVariable { name: String },
    /// Name already declared in the same scope
    #[error("Variable '{name}' already declared in this scope")]
    Redeclaration { name: String },
    /// Assignment to a constant binding
    #[error("Cannot reassign constant '{name}'")]
    ConstantReassignment { name: String },
    /// Left-hand side of `=` is not an identifier
    #[error("Invalid assignment target: {found}")]
    InvalidAssignmentTarget { found: String },
    /// Division by exactly zero
    #[error("Division by zero")]
    DivisionByZero,
    /// Call on a value that is not a function
    #[error("Cannot call a value of type {type_name}")]
    NotCallable { type_name: String },
    /// Argument count differs from parameter count
    #[error("Function '{name}' expects {expected} argument(s) but got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Member access on a value that is not an object
    #[error("Cannot read a property of a value of type {type_name}")]
    InvalidMemberAccess { type_name: String },
    /// Computed member key that is not a number
    #[error("Property key must be a number, found {type_name}")]
    InvalidPropertyKey { type_name: String },
    /// Evaluation nested deeper than the configured limit
    #[error("Maximum recursion depth of {limit} exceeded")]
    RecursionLimit { limit: usize },
    /// Failure reported by a native function
    #[error("{name}: {message}")]
    Native { name: String, message: String },
}
