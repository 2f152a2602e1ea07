//! Session command grammar
//!
//! One line of session input is split into words and parsed with clap, the
//! same way the binary parses its own arguments.

use clap::{Parser, Subcommand};

use crate::error::{CashflowError, CashflowResult};

/// A single parsed session line
#[derive(Parser, Debug)]
#[command(
    name = "cashflow",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Commands available in a cashflow session"
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session commands
#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Start the budget with a planned monthly income
    Start {
        /// Planned monthly income (e.g., "5000" or "5,000.00")
        #[arg(allow_hyphen_values = true)]
        income: String,
    },

    /// Change the planned monthly income
    Income {
        /// New planned monthly income
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Allocate money from a node to a new node
    Add {
        /// Label of the node the money comes from
        parent: String,
        /// Label of the new node
        label: String,
        /// Monthly amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Node group: intermediate, savings, expense or holding
        #[arg(short, long, default_value = "intermediate")]
        group: String,
        /// Annual interest rate in percent (savings only)
        #[arg(long, allow_hyphen_values = true)]
        apr: Option<f64>,
        /// Current balance (savings only)
        #[arg(long, allow_hyphen_values = true)]
        balance: Option<String>,
    },

    /// Edit a node
    Edit {
        /// Label of the node to edit
        label: String,
        /// New label
        #[arg(short, long)]
        name: Option<String>,
        /// New monthly amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New group
        #[arg(short, long)]
        group: Option<String>,
        /// New annual interest rate in percent
        #[arg(long, allow_hyphen_values = true)]
        apr: Option<f64>,
        /// New current balance
        #[arg(long, allow_hyphen_values = true)]
        balance: Option<String>,
    },

    /// Remove a node and everything below it
    #[command(alias = "rm")]
    Remove {
        /// Label of the node to remove
        label: String,
    },

    /// List node labels alphabetically
    Nodes,

    /// Show the allocation tree
    Tree,

    /// Standalone asset commands
    #[command(subcommand)]
    Asset(AssetCommands),

    /// List standalone assets
    Assets,

    /// Show the budget summary, flows, gauge and projection
    Show {
        /// Projection horizon in months
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// List over-allocated nodes
    Warnings,

    /// Export the visualization payload to a file
    ///
    /// With a single argument the format comes from the settings.
    Export {
        /// Format (json, yaml or csv) followed by the output path, or just the path
        #[arg(required = true, num_args = 1..=2, value_names = ["FORMAT", "PATH"])]
        target: Vec<String>,
        /// Projection horizon in months
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Standalone asset subcommands
#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// Add a standalone asset
    Add {
        /// Asset name
        name: String,
        /// Asset value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Remove a standalone asset
    #[command(alias = "rm")]
    Remove {
        /// Asset name
        name: String,
    },
}

/// Split a line into words
///
/// Words are separated by whitespace; double quotes group words and a `#`
/// outside quotes starts a comment. A backslash inside quotes escapes the
/// next character.
pub fn split_line(line: &str) -> CashflowResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            '\\' if in_quotes => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '#' if !in_quotes => break,
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quotes {
        return Err(CashflowError::Validation("Unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}
