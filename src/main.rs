use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cashflow::cli::Session;
use cashflow::config::paths::{CashflowPaths, CONFIG_DIR_ENV};
use cashflow::config::settings::Settings;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "CASHFLOW_LOG";

#[derive(Parser)]
#[command(
    name = "cashflow",
    version,
    about = "Model a monthly budget as a tree of cash flows",
    long_about = "Cashflow splits a planned monthly income into a tree of allocations, \
                  flags over-allocated nodes, totals expenses and savings, and projects \
                  savings balances over time."
)]
struct Cli {
    /// Log mutations and metric computation to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding config.json
    #[arg(long, global = true, env = CONFIG_DIR_ENV, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Shell,

    /// Run a session script, one command per line
    Run {
        /// Path to the script
        script: PathBuf,
        /// Keep going after a command fails
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Show current configuration and paths
    Config {
        /// Write the effective settings to config.json
        #[arg(long)]
        save: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = match cli.config_dir {
        Some(dir) => CashflowPaths::with_base_dir(dir),
        None => CashflowPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)
        .with_context(|| format!("Failed to load {}", paths.settings_file().display()))?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            if prompt {
                println!("Cashflow - type 'help' for commands, 'quit' to leave.");
            }

            let mut session = Session::new(settings, io::stdout().lock());
            session.run_shell(stdin.lock(), prompt, &mut io::stderr())?;
        }
        Commands::Run {
            script,
            continue_on_error,
        } => {
            let file = File::open(&script)
                .with_context(|| format!("Failed to open script {}", script.display()))?;

            let mut session = Session::new(settings, io::stdout().lock());
            let outcome = session.run_script(BufReader::new(file), continue_on_error)?;

            for failure in &outcome.failures {
                eprintln!("Error on line {}: {}", failure.line, failure.error);
            }
            if !outcome.is_success() {
                bail!(
                    "{} of {} commands failed",
                    outcome.failures.len(),
                    outcome.executed
                );
            }
        }
        Commands::Config { save } => {
            if save {
                settings.save(&paths)?;
                println!("Settings written to {}", paths.settings_file().display());
                println!();
            }

            println!("Cashflow Configuration");
            println!("======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:           {}", settings.currency_symbol);
            println!("  Default projection months: {}", settings.default_projection_months);
            println!("  Default export format:     {}", settings.default_export_format);
        }
    }

    Ok(())
}
