use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

/// Lumen scripting language interpreter.
///
/// Lumen is a small expression language with numbers, objects, closures and
/// a handful of built-in functions. This CLI runs Lumen files, opens an
/// interactive REPL, and dumps the lexer and parser output for inspection.
///
/// EXAMPLES:
///     lumen run main.lm            Run a Lumen program
///     lumen repl                   Start interactive REPL
///     lumen ast main.lm            Print the syntax tree as JSON
///     lumen tokens main.lm         Print the token stream as JSON
///
/// ENVIRONMENT VARIABLES:
///     LUMEN_DIAGNOSTICS    Set to 'json' for JSON diagnostics by default
///     LUMEN_NO_HISTORY     Set to disable REPL history
///     LUMEN_HISTORY_FILE   REPL history location (default ~/.lumen/history)
///     LUMEN_MAX_DEPTH      Maximum call depth before a recursion error
///     LUMEN_LOG            Log filter, e.g. 'debug' or 'lumen_runtime=trace'
///     NO_COLOR             Set to disable colored output
#[derive(Parser)]
#[command(name = "lumen")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Log interpreter activity to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Lumen source file
    ///
    /// Evaluates the file and prints the value of its last statement
    /// unless that value is null. Exits non-zero if the program fails.
    ///
    /// EXAMPLES:
    ///     lumen run main.lm              Run a program
    ///     lumen run main.lm --json       Output diagnostics as JSON
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Lumen source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive REPL
    ///
    /// Declarations persist from line to line. A line that fails keeps
    /// whatever it declared before the failure.
    ///
    /// REPL COMMANDS:
    ///     :help, :h      Show help
    ///     :quit, :q      Exit
    ///     :reset         Clear all variables and functions
    ///     :vars, :v      List variables
    #[command(visible_alias = "i")]
    Repl {
        /// Don't load or save command history
        #[arg(long)]
        no_history: bool,
    },

    /// Print the syntax tree of a Lumen file as JSON
    ///
    /// EXAMPLES:
    ///     lumen ast main.lm
    Ast {
        /// Path to the Lumen source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the token stream of a Lumen file as JSON
    ///
    /// Tokens read before an unrecognized character are still printed.
    ///
    /// EXAMPLES:
    ///     lumen tokens main.lm
    Tokens {
        /// Path to the Lumen source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Install the stderr log subscriber
///
/// The filter comes from `LUMEN_LOG`, then `RUST_LOG`. Without either, only
/// warnings are shown, or debug events with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("LUMEN_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    init_tracing(cli.verbose);
    if cli_config.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Run { file, json } => {
            // Command-line flag overrides environment variable
            let options = commands::run::RunOptions {
                json: json || cli_config.default_json,
                interpreter: cli_config.interpreter_config(),
            };
            commands::run::run(&file, options)?;
        }
        Commands::Repl { no_history } => {
            commands::repl::run(no_history || cli_config.no_history, &cli_config)?;
        }
        Commands::Ast { file, json } => {
            commands::ast::run(&file, json || cli_config.default_json)?;
        }
        Commands::Tokens { file, json } => {
            commands::tokens::run(&file, json || cli_config.default_json)?;
        }
    }

    Ok(())
}
