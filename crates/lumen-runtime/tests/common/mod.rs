//! Shared test utilities
//!
//! Helpers that run source through a fresh `Lumen` runtime with captured
//! output, so tests read as source-in, value-out.

#![allow(dead_code)]

use lumen_runtime::stdlib::CaptureBuffer;
use lumen_runtime::{Diagnostic, Error, Lumen, RuntimeError, Value};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// A runtime whose `print`/`log` output is captured
pub fn runtime() -> (Lumen, CaptureBuffer) {
    let buffer = CaptureBuffer::new();
    (Lumen::with_output(buffer.sink()), buffer)
}

/// Evaluate source in a fresh runtime
pub fn eval(source: &str) -> Result<Value, Error> {
    runtime().0.eval(source)
}

/// Evaluate source in a fresh runtime, returning the value and printed output
pub fn eval_with_output(source: &str) -> (Result<Value, Error>, String) {
    let (runtime, buffer) = runtime();
    let result = runtime.eval(source);
    (result, buffer.take())
}

/// Assert that source code evaluates to a number
///
/// # Example
/// ```
/// assert_eval_number("1 + 2", 3.0);
/// ```
pub fn assert_eval_number(source: &str, expected: f64) {
    match eval(source) {
        Ok(Value::Number(n)) => assert_eq!(n, expected, "Expected {}, got {}", expected, n),
        other => panic!("Expected Number({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to null
pub fn assert_eval_null(source: &str) {
    match eval(source) {
        Ok(Value::Null) => {}
        other => panic!("Expected Null, got {:?}", other),
    }
}

/// Assert that source code fails at runtime with exactly `expected`
pub fn assert_runtime_error(source: &str, expected: RuntimeError) {
    match eval(source) {
        Err(Error::Runtime(e)) => assert_eq!(e, expected),
        other => panic!("Expected runtime error {:?}, got {:?}", expected, other),
    }
}

/// Assert that source code produces an error with a specific code
///
/// # Example
/// ```
/// assert_error_code("1 / 0", "RT0005");
/// ```
pub fn assert_error_code(source: &str, expected_code: &str) {
    match eval(source) {
        Err(e) => {
            let diag = Diagnostic::from(&e);
            assert_eq!(
                diag.code, expected_code,
                "Expected error code {}, got {}: {}",
                expected_code, diag.code, diag.message
            );
        }
        Ok(value) => panic!("Expected error {}, got {:?}", expected_code, value),
    }
}
