//! End-to-end language behavior: source text in, value or error out.

mod common;

use common::*;
#[allow(unused_imports)]
use common::{assert_eq, assert_ne};
use lumen_runtime::ast::{BinaryOp, Expr, Stmt};
use lumen_runtime::{lexer, parse_program, RuntimeError, TokenKind, Value};
use rstest::rstest;

// ============================================================================
// Tokens and trees
// ============================================================================

#[test]
fn test_let_statement_tokens() {
    let kinds: Vec<TokenKind> = lexer::tokenize("let x = 5;")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::Identifier,
            TokenKind::Equals,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_multiplication_binds_tighter() {
    let program = parse_program("2 + 3 * 4").unwrap();
    assert_eq!(
        program.body,
        vec![Stmt::Expr(Expr::Binary {
            left: Box::new(Expr::Number(2.0)),
            right: Box::new(Expr::Binary {
                left: Box::new(Expr::Number(3.0)),
                right: Box::new(Expr::Number(4.0)),
                op: BinaryOp::Mul,
            }),
            op: BinaryOp::Add,
        })]
    );
}

#[test]
fn test_parentheses_group_first() {
    let program = parse_program("(2 + 3) * 4").unwrap();
    assert_eq!(
        program.body,
        vec![Stmt::Expr(Expr::Binary {
            left: Box::new(Expr::Binary {
                left: Box::new(Expr::Number(2.0)),
                right: Box::new(Expr::Number(3.0)),
                op: BinaryOp::Add,
            }),
            right: Box::new(Expr::Number(4.0)),
            op: BinaryOp::Mul,
        })]
    );
}

// ============================================================================
// Evaluation
// ============================================================================

#[rstest]
#[case("let x = 10; x + 5;", 15.0)]
#[case("func add(a, b) { a + b } add(2, 3)", 5.0)]
#[case("let x = 1; x = x + 1; x", 2.0)]
#[case("let a = 8; let b = 3; a % b", 2.0)]
#[case("1 - 2", -1.0)]
fn test_evaluates_to_number(#[case] source: &str, #[case] expected: f64) {
    assert_eval_number(source, expected);
}

#[test]
fn test_constant_reassignment() {
    assert_runtime_error(
        "const x = 1; x = 2;",
        RuntimeError::ConstantReassignment {
            name: "x".to_string(),
        },
    );
}

#[test]
fn test_unresolved_identifier() {
    assert_runtime_error(
        "y;",
        RuntimeError::UndefinedVariable {
            name: "y".to_string(),
        },
    );
}

#[test]
fn test_division_by_zero() {
    assert_runtime_error("10 / 0;", RuntimeError::DivisionByZero);
}

#[test]
fn test_shorthand_object() {
    let value = eval("let x = 7; { x }").unwrap();
    assert_eq!(
        value,
        Value::object([("x".to_string(), Value::Number(7.0))])
    );
}

#[test]
fn test_redeclaration_and_shadowing() {
    assert_runtime_error(
        "let x = 1; let x = 2;",
        RuntimeError::Redeclaration {
            name: "x".to_string(),
        },
    );
    assert_eval_number("let x = 1; func f() { let x = 2; x } f() + x", 3.0);
}

#[test]
fn test_empty_program_is_null() {
    assert_eval_null("");
    assert_eval_null(";;");
}

#[test]
fn test_declaration_statement_values() {
    assert_eval_number("let x = 9", 9.0);
    assert_eval_null("let x");
    assert_eq!(eval("func g() {}").unwrap().to_string(), "<fn g>");
}

#[test]
fn test_lenient_arithmetic_on_non_numbers() {
    assert_eval_null("true + 1");
    assert_eval_null("null * 2");
    assert_eval_null("let o = { a: 1 }; o - o");
}

#[rstest]
#[case("1 / 0", "RT0005")]
#[case("undefinedName", "RT0001")]
#[case("let a = 1; let a = 2", "RT0002")]
#[case("const c = 1; c = 2", "RT0003")]
#[case("1 = 2", "RT0004")]
#[case("let n = 3; n()", "RT0006")]
#[case("func f(a) { a } f()", "RT0007")]
#[case("let n = 3; n.x", "RT0008")]
#[case("let o = {}; o[o]", "RT0009")]
#[case("func f() { f() } f()", "RT0010")]
#[case("let x = #", "LX0001")]
#[case("let = 1", "PA0001")]
#[case("const k", "PA0002")]
#[case("func f(1) {}", "PA0003")]
#[case("let o = {}; o.1", "PA0004")]
fn test_error_codes(#[case] source: &str, #[case] code: &str) {
    assert_error_code(source, code);
}

// ============================================================================
// Objects and member access
// ============================================================================

#[test]
fn test_member_access() {
    assert_eval_number("let o = { a: 1, b: { c: 2 } }; o.b.c", 2.0);
    assert_eval_null("let o = { a: 1 }; o.missing");
}

#[test]
fn test_computed_member_uses_number_text() {
    // Keys are identifiers, so a numeric key can only miss
    assert_eval_null("let o = { a: 1 }; o[0]");
}

#[test]
fn test_member_call() {
    assert_eval_number(
        "func double(n) { n * 2 } let tools = { double }; tools.double(21)",
        42.0,
    );
}

#[test]
fn test_object_display() {
    let value = eval("let b = 2; { b, a: 1 }").unwrap();
    assert_eq!(value.to_string(), "{ a: 1, b: 2 }");
}

// ============================================================================
// Standard globals
// ============================================================================

#[test]
fn test_print_output() {
    let (result, output) = eval_with_output("print(1, 2, true, null, { a: 1 })");
    assert_eq!(result.unwrap(), Value::Null);
    assert_eq!(output, "1, 2, true, null, { a: 1 }\n");
}

#[test]
fn test_log_output() {
    let (_, output) = eval_with_output("log(1, null)");
    assert_eq!(output, "Number(1) Null\n");
}

#[test]
fn test_time_returns_number() {
    match eval("time()") {
        Ok(Value::Number(ms)) => assert!(ms > 0.0),
        other => panic!("Expected number, got {:?}", other),
    }
}

#[test]
fn test_globals_are_constant() {
    assert_error_code("print = 1", "RT0003");
    assert_error_code("let true = 2", "RT0002");
}
