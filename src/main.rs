//! Strictly Hangman - Unified CLI
//!
//! Runs the relay service or a terminal client.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_hangman::{
    GameStore, HangmanConfig, LocalBackend, PlayerSession, Reconciler, RestGameClient, play,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { .. } => init_server_tracing(),
        Command::Play { .. } => init_play_tracing()?,
    }
    let config = HangmanConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Serve {
            host,
            port,
            db_path,
            max_attempts,
        } => {
            let host = host.unwrap_or_else(|| config.host().clone());
            let port = port.unwrap_or(*config.port());
            let max_attempts = max_attempts.unwrap_or(*config.max_attempts());
            let db_path = db_path.or_else(|| config.db_path().clone());
            let config = config
                .with_bind(host, port)
                .with_db_path(db_path)
                .with_max_attempts(max_attempts);
            run_server(config).await
        }
        Command::Play {
            player,
            server_url,
            db_path,
        } => {
            let db_path = db_path.or_else(|| config.db_path().clone());
            run_play(config.with_db_path(db_path), player, server_url).await
        }
    }
}

/// Run the HTTP relay
#[instrument(skip_all)]
async fn run_server(config: HangmanConfig) -> Result<()> {
    info!(
        host = %config.host(),
        port = config.port(),
        max_attempts = config.max_attempts(),
        db_path = ?config.db_path(),
        "Starting Strictly Hangman relay"
    );
    let store = GameStore::from_config(&config)?;
    strictly_hangman::serve(store, config.host().clone(), *config.port()).await
}

/// Run the terminal client, remote or standalone
#[instrument(skip(config))]
async fn run_play(config: HangmanConfig, player: String, server_url: Option<String>) -> Result<()> {
    let session = PlayerSession::parse(player)?;

    match server_url {
        Some(url) => {
            info!(url = %url, "Playing against relay");
            let client = RestGameClient::new(&url, config.request_timeout())?;
            play::run(Reconciler::new(client, session)).await
        }
        None => {
            info!("Playing standalone");
            let store = GameStore::from_config(&config)?;
            let backend = LocalBackend::new(store, config.request_timeout());
            play::run(Reconciler::new(backend, session)).await
        }
    }
}

fn init_server_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn init_play_tracing() -> Result<()> {
    // Log to file to avoid interfering with the game screen
    let log_file = std::fs::File::create("strictly_hangman_play.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
