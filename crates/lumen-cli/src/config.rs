//! CLI configuration via environment variables
//!
//! Lumen uses environment variables for optional configuration.
//! Command-line flags take precedence over anything set here.

use std::env;
use std::path::PathBuf;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Default to JSON diagnostic output (LUMEN_DIAGNOSTICS=json)
    pub default_json: bool,
    /// Disable colored output (LUMEN_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Custom history file path (LUMEN_HISTORY_FILE=/path/to/file)
    pub history_file: Option<PathBuf>,
    /// Disable history by default (LUMEN_NO_HISTORY=1)
    pub no_history: bool,
    /// Interpreter call depth limit (LUMEN_MAX_DEPTH=4096)
    pub max_depth: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            default_json: lookup("LUMEN_DIAGNOSTICS")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            no_color: lookup("LUMEN_NO_COLOR").is_some() || lookup("NO_COLOR").is_some(),
            history_file: lookup("LUMEN_HISTORY_FILE").map(PathBuf::from),
            no_history: lookup("LUMEN_NO_HISTORY").is_some(),
            // An unparsable limit falls back to the interpreter default
            max_depth: lookup("LUMEN_MAX_DEPTH")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|depth| *depth > 0),
        }
    }

    /// Get the history file path
    ///
    /// Returns:
    /// 1. LUMEN_HISTORY_FILE if set
    /// 2. ~/.lumen/history if home directory exists
    /// 3. None otherwise
    pub fn get_history_path(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.history_file {
            return Some(path.clone());
        }
        dirs::home_dir().map(|home| home.join(".lumen").join("history"))
    }

    /// Interpreter limits derived from this configuration
    pub fn interpreter_config(&self) -> lumen_runtime::InterpreterConfig {
        let mut config = lumen_runtime::InterpreterConfig::default();
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        config
    }
}
