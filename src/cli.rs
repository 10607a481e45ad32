//! Operational command-line interface.
//!
//! `serve` runs the scheduler daemon; `generate` triggers one catch-up pass
//! (the manual counterpart of a scheduled tick); `init-db` creates the schema.

use clap::{Parser, Subcommand};

/// SpendWise command-line interface.
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Personal finance tracker with recurring-expense generation")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available operational commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the recurring-expense scheduler daemon
    Serve,
    /// Run one catch-up generation pass and exit
    Generate,
    /// Create the database schema and exit
    InitDb,
}
