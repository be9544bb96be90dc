//! # pcmd CLI Entry Point
//!
//! Reorders a list of commands by how often they have been used.
//!
//! ## Usage
//!
//! ```bash
//! # Record a use of a command (echoes it back)
//! pcmd add "git status"
//!
//! # Record a command read from stdin
//! echo "deploy service" | pcmd add -
//!
//! # Put the most used commands first
//! compgen -c | pcmd sort
//!
//! # Show the most used commands
//! pcmd top -n 5
//! ```
//!
//! `-v` only applies before the subcommand, so `pcmd add -v` records the
//! literal command `-v`.
//!
//! Counters live in `$HOME/.pcmd.txt` unless `--store`, `PCMD_STORE` or the
//! config file point elsewhere. Any error prints a message and exits with 1.

use pcmd::commands::{self, DEFAULT_TOP_LIMIT};
use pcmd::config::Config;
use pcmd::logging;
use pcmd::usage::FrequencyStore;
use pcmd::PcmdError;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

/// pcmd - sort commands by how often you use them
#[derive(Parser, Debug)]
#[command(name = "pcmd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reorder piped commands by usage frequency", long_about = None)]
struct Args {
    /// Store file to use instead of the configured or default one
    #[arg(long, global = true, value_name = "FILE", env = "PCMD_STORE")]
    store: Option<PathBuf>,

    /// Print debug logging to stderr (must come before the subcommand)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read lines from stdin and print them most used first
    Sort,

    /// Record one use of a command ("-" reads it from stdin)
    Add {
        /// The command text, or "-"
        #[arg(value_name = "COMMAND", num_args = 0.., allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Print the most used commands with their counts
    Top {
        /// Maximum number of entries to print
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_LIMIT)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version are not failures
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return Err(PcmdError::Argument(usage_message(&err)).into()),
    };

    logging::init_tracing(args.verbose);
    run(args)
}

/// clap's rendered error without its own `error: ` prefix, which `main` adds
fn usage_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let message = rendered.trim_end();
    message
        .strip_prefix("error: ")
        .unwrap_or(message)
        .to_string()
}

fn run(args: Args) -> Result<()> {
    let store_path = Config::load()
        .resolve_store_path(args.store)
        .context("Failed to locate the store file")?;

    let stdin = io::stdin();
    let stdout = io::stdout();

    match args.command {
        Command::Sort => {
            let lines = commands::read_lines(stdin.lock())?;
            let store = FrequencyStore::open(store_path)?;
            commands::run_sort(&store, lines, stdout.lock())?;
        }
        Command::Add { command } => {
            let command = commands::resolve_command(&command, stdin.lock())?;
            let mut store = FrequencyStore::open(store_path)?;
            commands::run_add(&mut store, &command, stdout.lock())?;
        }
        Command::Top { limit } => {
            let store = FrequencyStore::open(store_path)?;
            commands::run_top(&store, limit, stdout.lock())?;
        }
    }

    Ok(())
}
