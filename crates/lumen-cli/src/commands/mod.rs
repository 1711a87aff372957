pub mod ast;
pub mod repl;
pub mod run;
pub mod tokens;

use anyhow::{Context, Result};
use colored::Colorize;
use lumen_runtime::{Diagnostic, DiagnosticLevel};
use std::fs;

/// Read a source file, naming it in the error on failure
pub fn read_source(file_path: &str) -> Result<String> {
    fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))
}

/// Format a diagnostic for the terminal
///
/// `error[RT0005]: Division by zero`, followed by the help line if any.
pub fn format_diagnostic(diag: &Diagnostic) -> String {
    let header = format!("{}[{}]", diag.level, diag.code);
    let header = match diag.level {
        DiagnosticLevel::Error => header.red().bold(),
        DiagnosticLevel::Warning => header.yellow().bold(),
    };

    let mut output = format!("{}: {}", header, diag.message);
    if let Some(help) = &diag.help {
        output.push_str(&format!("\n   {} {}", "= help:".cyan(), help));
    }
    output
}

/// Write a diagnostic to stderr, as JSON or human-readable text
pub fn report(diag: &Diagnostic, json: bool) -> Result<()> {
    if json {
        eprintln!("{}", diag.to_json_string()?);
    } else {
        eprintln!("{}", format_diagnostic(diag));
    }
    Ok(())
}
