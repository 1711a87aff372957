//! Abstract Syntax Tree (AST) definitions
//!
//! The tree is built once per parse and is read-only afterwards. Function
//! declarations are reference-counted so that every function value created
//! from a declaration shares its body with the tree instead of copying it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// AST schema version
///
/// Included in JSON dumps. Increment when making breaking changes to the
/// AST structure.
pub const AST_VERSION: u32 = 1;

/// Top-level program: an ordered sequence of statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// Versioned AST wrapper for JSON serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedProgram {
    /// AST schema version
    pub ast_version: u32,
    /// The actual program AST
    #[serde(flatten)]
    pub program: Program,
}

impl VersionedProgram {
    /// Create a new versioned program wrapper
    pub fn new(program: Program) -> Self {
        Self {
            ast_version: AST_VERSION,
            program,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Program> for VersionedProgram {
    fn from(program: Program) -> Self {
        Self::new(program)
    }
}

/// Statement (the supertype of every node that can appear in a body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `let name = value` / `const name = value`
    VarDecl(VarDecl),
    /// `func name(params) { body }`
    FunctionDecl(Rc<FunctionDecl>),
    /// Expression statement
    Expr(Expr),
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    /// Declared with `const`
    pub constant: bool,
    /// Initializer; absent only for `let name`
    pub value: Option<Expr>,
}

/// Named function declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

/// Expression (value-producing node)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `target = value`
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// `left op right`
    Binary {
        left: Box<Expr>,
        right: Box<Expr>,
        op: BinaryOp,
    },
    /// `callee(args...)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// `object.property` or `object[property]`
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        /// True for the bracket form
        computed: bool,
    },
    /// `{ key: value, key }`
    Object(Vec<Property>),
    /// Variable reference
    Identifier(String),
    /// Numeric literal
    Number(f64),
}

/// Object literal property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    /// Absent for shorthand `{ key }`, which reads the variable `key`
    pub value: Option<Expr>,
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Map an operator lexeme to its operator
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            "%" => Some(BinaryOp::Mod),
            _ => None,
        }
    }

    /// The operator's source symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }

    /// True for `* / %`
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Expr {
    /// Short name of the node kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Assignment { .. } => "assignment",
            Expr::Binary { .. } => "binary expression",
            Expr::Call { .. } => "call",
            Expr::Member { .. } => "member expression",
            Expr::Object(_) => "object literal",
            Expr::Identifier(_) => "identifier",
            Expr::Number(_) => "number",
        }
    }
}
