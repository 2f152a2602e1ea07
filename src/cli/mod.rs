//! CLI session handling
//!
//! Bridges clap argument parsing with the budget service layer. The binary
//! drives a [`Session`] either interactively or from a script file.

pub mod commands;
pub mod session;

pub use commands::{split_line, AssetCommands, SessionCommand, SessionLine};
pub use session::{Flow, LineFailure, ScriptOutcome, Session, PROMPT};
