//! Clock native

use crate::environment::Environment;
use crate::value::{RuntimeError, Value};
use chrono::Utc;

/// `time()`: milliseconds since the Unix epoch
///
/// Arguments are ignored.
pub fn time(_args: &[Value], _env: &Environment) -> Result<Value, RuntimeError> {
    Ok(Value::Number(Utc::now().timestamp_millis() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_is_after_2020() {
        // 2020-01-01T00:00:00Z
        const JAN_2020_MS: f64 = 1_577_836_800_000.0;

        match time(&[], &Environment::new()) {
            Ok(Value::Number(ms)) => {
                assert!(ms > JAN_2020_MS);
                assert_eq!(ms.fract(), 0.0);
            }
            other => panic!("Expected number, got {:?}", other),
        }
    }

    #[test]
    fn test_time_is_monotonic_enough() {
        let env = Environment::new();
        let a = time(&[], &env).unwrap();
        let b = time(&[], &env).unwrap();
        match (a, b) {
            (Value::Number(a), Value::Number(b)) => assert!(b >= a),
            other => panic!("Expected numbers, got {:?}", other),
        }
    }
}
