//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Persistent record tooling
#[derive(Parser, Debug)]
#[command(name = "records")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to the database and run a trivial query
    Ping,

    /// Print the table names derived for the given types
    TableName {
        /// Module path the types are declared in (e.g. "palvin::models::user")
        #[arg(short, long, default_value = "")]
        module: String,

        /// Type names (e.g. "UserAccount")
        #[arg(required = true)]
        types: Vec<String>,
    },
}
