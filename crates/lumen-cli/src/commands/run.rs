//! Run command - execute Lumen source files

use super::{read_source, report};
use anyhow::{anyhow, Result};
use lumen_runtime::{Diagnostic, InterpreterConfig, Lumen, Value};
use tracing::debug;

/// Options for `lumen run`
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Emit diagnostics as JSON
    pub json: bool,
    /// Interpreter limits
    pub interpreter: InterpreterConfig,
}

/// Run a Lumen source file
///
/// Evaluates the file and prints the final value to stdout unless it is null.
/// Output from `print` and `log` goes straight to stdout as the program runs.
pub fn run(file_path: &str, options: RunOptions) -> Result<()> {
    let source = read_source(file_path)?;
    debug!(file = file_path, bytes = source.len(), "running file");

    let runtime = Lumen::new().with_config(options.interpreter);
    match evaluate(&runtime, &source) {
        Ok(value) => {
            if !matches!(value, Value::Null) {
                println!("{}", value);
            }
            Ok(())
        }
        Err(diag) => {
            report(&diag, options.json)?;
            Err(anyhow!("Failed to execute {}", file_path))
        }
    }
}

fn evaluate(runtime: &Lumen, source: &str) -> Result<Value, Diagnostic> {
    runtime.eval(source).map_err(Diagnostic::from)
}
