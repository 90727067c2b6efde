//! Command-line interface for strictly_hangman.

use clap::{Parser, Subcommand};

/// Strictly Hangman - server-authoritative hangman
#[derive(Parser, Debug)]
#[command(name = "strictly_hangman")]
#[command(about = "Hangman with a server-authoritative game store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it doesn't exist)
    #[arg(short, long, global = true, default_value = "hangman.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP relay service
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,

        /// Attempts per game (overrides config)
        #[arg(long)]
        max_attempts: Option<u8>,
    },

    /// Play in the terminal
    Play {
        /// Player id to play as
        #[arg(long)]
        player: String,

        /// Relay URL. If not provided, plays against an in-process store.
        #[arg(long)]
        server_url: Option<String>,

        /// Database file for in-process play
        #[arg(long)]
        db_path: Option<String>,
    },
}
