//! Output natives: `print` and `log`

use crate::stdlib::OutputSink;
use crate::value::{RuntimeError, Value};

/// Write the arguments joined by `", "` and a newline. Returns `Null`.
pub fn print(args: &[Value], out: &OutputSink) -> Result<Value, RuntimeError> {
    let line = args
        .iter()
        .map(Value::to_display_string)
        .collect::<Vec<_>>()
        .join(", ");
    write_line("print", &line, out)
}

/// Write the debug form of each argument separated by spaces. Returns `Null`.
pub fn log(args: &[Value], out: &OutputSink) -> Result<Value, RuntimeError> {
    let line = args
        .iter()
        .map(|arg| format!("{:?}", arg))
        .collect::<Vec<_>>()
        .join(" ");
    write_line("log", &line, out)
}

fn write_line(name: &str, line: &str, out: &OutputSink) -> Result<Value, RuntimeError> {
    writeln!(out.borrow_mut(), "{}", line).map_err(|e| RuntimeError::Native {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    Ok(Value::Null)
}
