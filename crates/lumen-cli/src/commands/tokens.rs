//! Token dump command - output the lexer's token stream as JSON

use super::{read_source, report};
use anyhow::{anyhow, Result};
use lumen_runtime::{Diagnostic, Lexer};

/// Dump tokens to JSON
///
/// The stream is printed even when lexing stops early, so the tokens read up
/// to the offending character can be inspected. The error is reported after.
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = read_source(file_path)?;
    let (rendered, error) = render(&source)?;
    println!("{}", rendered);

    match error {
        Some(diag) => {
            report(&diag, json)?;
            Err(anyhow!("Could not tokenize {}", file_path))
        }
        None => Ok(()),
    }
}

fn render(source: &str) -> Result<(String, Option<Diagnostic>)> {
    let (tokens, error) = Lexer::new(source).tokenize();
    let rendered = serde_json::to_string_pretty(&tokens)?;
    Ok((rendered, error.as_ref().map(Diagnostic::from)))
}
