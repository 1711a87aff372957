//! REPL command implementation

use super::format_diagnostic;
use crate::config::Config;
use anyhow::Result;
use colored::Colorize;
use lumen_runtime::{ReplBinding, ReplCore, ReplResult, Value};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

/// A line typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Reset,
    Help,
    Vars,
    Unknown(&'a str),
    Blank,
    Source(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed {
        "" => Input::Blank,
        ":quit" | ":q" => Input::Quit,
        ":reset" => Input::Reset,
        ":help" | ":h" => Input::Help,
        ":vars" | ":v" => Input::Vars,
        command if command.starts_with(':') => Input::Unknown(command),
        _ => Input::Source(line),
    }
}

/// Run the interactive REPL
///
/// If `no_history` is true, history is neither loaded nor saved.
pub fn run(no_history: bool, config: &Config) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut repl = ReplCore::with_config(config.interpreter_config());

    let history_path = if no_history {
        None
    } else {
        config.get_history_path()
    };
    if let Some(ref path) = history_path {
        // Missing on first launch
        if rl.load_history(path).is_err() {
            debug!(path = %path.display(), "no history loaded");
        }
    }

    println!("Lumen v{} REPL", lumen_runtime::VERSION);
    println!("Type expressions or statements, or :quit to exit");
    println!("Commands: :quit (or :q), :reset, :help, :vars");
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => match classify(&line) {
                Input::Quit => {
                    println!("Goodbye!");
                    break;
                }
                Input::Reset => {
                    repl.reset();
                    println!("REPL state reset");
                }
                Input::Help => print_help(),
                Input::Vars => print!("{}", format_vars(&repl.variables())),
                Input::Unknown(command) => {
                    println!("Unknown command {}. Type :help for a list.", command);
                }
                Input::Blank => {}
                Input::Source(source) => {
                    let _ = rl.add_history_entry(source);
                    print!("{}", render(&repl.eval_line(source)));
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                println!("Use :quit or :q to exit");
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = rl.save_history(&path) {
            warn!(path = %path.display(), error = %err, "could not save history");
        }
    }

    Ok(())
}

/// Render the outcome of one line: program output first, then the value or
/// the diagnostic
fn render(result: &ReplResult) -> String {
    let mut output = result.stdout.clone();

    for diag in &result.diagnostics {
        output.push_str(&format_diagnostic(diag));
        output.push('\n');
    }

    if let Some(value) = &result.value {
        if !matches!(value, Value::Null) {
            output.push_str(&value.to_string());
            output.push('\n');
        }
    }

    output
}

fn print_help() {
    println!("Lumen REPL Commands:");
    println!("  :quit, :q         Exit the REPL");
    println!("  :reset            Clear all variables and functions");
    println!("  :help, :h         Show this help message");
    println!("  :vars, :v         List variables and their values");
    println!();
    println!("Type any Lumen expression or statement to evaluate it.");
    println!("Examples:");
    println!("  >> 1 + 2");
    println!("  >> let x = 42");
    println!("  >> func double(n) {{ n * 2 }}");
    println!("  >> double(x)");
}

fn format_vars(bindings: &[ReplBinding]) -> String {
    if bindings.is_empty() {
        return "No variables defined.\n".to_string();
    }

    let mut output = format!("{:<16} {:<8} {}\n", "name", "kind", "value");
    output.push_str(&"-".repeat(40));
    output.push('\n');

    for binding in bindings {
        let kind = if binding.constant { "const" } else { "let" };
        output.push_str(&format!(
            "{:<16} {:<8} {}\n",
            binding.name,
            kind.dimmed(),
            binding.value
        ));
    }
    output
}
