//! AST dump command - output AST as JSON

use super::{read_source, report};
use anyhow::{anyhow, Result};
use lumen_runtime::{parse_program, Diagnostic, VersionedProgram};

/// Dump AST to JSON
///
/// Parses the source file and outputs the versioned AST as JSON to stdout.
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = read_source(file_path)?;
    println!("{}", render(&source, json)?);
    Ok(())
}

fn render(source: &str, json: bool) -> Result<String> {
    match parse_program(source) {
        Ok(program) => Ok(VersionedProgram::new(program).to_json()?),
        Err(e) => {
            report(&Diagnostic::from(&e), json)?;
            Err(anyhow!("Could not parse source"))
        }
    }
}
