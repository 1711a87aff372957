//! Standard globals
//!
//! Every root environment a host creates is seeded here: the constants
//! `true`, `false` and `null`, plus the natives `print`, `log` and `time`.
//! All of them are declared constant.

pub mod datetime;
pub mod io;

use crate::environment::{Environment, Mutability};
use crate::value::Value;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tracing::debug;

/// Shared destination for program output
pub type OutputSink = Rc<RefCell<dyn Write>>;

/// Output sink writing to the process stdout
pub fn stdout_sink() -> OutputSink {
    Rc::new(RefCell::new(std::io::stdout()))
}

/// In-memory output sink, for hosts and tests that capture output
#[derive(Clone, Default)]
pub struct CaptureBuffer(Rc<RefCell<Vec<u8>>>);

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that appends to this buffer
    pub fn sink(&self) -> OutputSink {
        Rc::new(RefCell::new(self.clone()))
    }

    /// Everything written so far, leaving the buffer empty
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Names declared by `register_globals`
pub const GLOBAL_NAMES: &[&str] = &["true", "false", "null", "print", "log", "time"];

/// Check if a name is one of the standard globals
pub fn is_global(name: &str) -> bool {
    GLOBAL_NAMES.contains(&name)
}

/// Bind the standard globals in `env` as constants
///
/// Existing bindings with the same names are replaced.
pub fn register_globals(env: &Environment, output: OutputSink) {
    env.define("true", Value::Bool(true), Mutability::Constant);
    env.define("false", Value::Bool(false), Mutability::Constant);
    env.define("null", Value::Null, Mutability::Constant);

    let print_out = Rc::clone(&output);
    env.define(
        "print",
        Value::native("print", move |args, _| io::print(args, &print_out)),
        Mutability::Constant,
    );
    env.define(
        "log",
        Value::native("log", move |args, _| io::log(args, &output)),
        Mutability::Constant,
    );
    env.define(
        "time",
        Value::native("time", datetime::time),
        Mutability::Constant,
    );

    debug!(count = GLOBAL_NAMES.len(), "registered standard globals");
}

/// A fresh root environment holding the standard globals
pub fn root_environment(output: OutputSink) -> Environment {
    let env = Environment::new();
    register_globals(&env, output);
    env
}
