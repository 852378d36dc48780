// src/cli/mod.rs
use clap::Parser;

pub mod commands;
pub mod menu;
pub mod handlers;

pub use commands::CliCommand;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Database URL (defaults to a SQLite file in the app config directory)
    #[arg(long, short, env = "DATABASE_URL")]
    pub db: Option<String>,

    /// Command to execute; the interactive menu runs when omitted
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}
