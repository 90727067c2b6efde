//! Strictly Hangman library - server-authoritative hangman
//!
//! One hangman game per player lives in an authoritative store. Clients send
//! guesses and always render the snapshot the store sends back.
//!
//! # Architecture
//!
//! - **Games**: Hangman state, turn resolution, and rule contracts
//! - **Store**: Per-player serialized mutations over a repository
//! - **Db**: SQLite (diesel) and in-memory repositories
//! - **Server**: JSON relay over HTTP (axum)
//! - **Client**: REST and in-process backends, plus the view reconciler
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_hangman::{GameStore, MemoryRepository, PlayerId, RandomWords, DEFAULT_WORDS};
//!
//! # fn example() -> anyhow::Result<()> {
//! let words = RandomWords::new(DEFAULT_WORDS.iter().copied())?;
//! let store = GameStore::new(Arc::new(MemoryRepository::new()), Arc::new(words), 6);
//!
//! let player = PlayerId::new("alice")?;
//! store.start(&player)?;
//! let state = store.apply(&player, "e")?;
//! println!("{}", state.masked_word());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod config;
mod db;
mod games;
mod protocol;
mod reconciler;
mod server;
mod session;
mod store;
mod word_source;

/// Terminal front end.
pub mod play;

// Crate-level exports - Game types
pub use games::hangman::{
    AttemptsMatchMisses, BudgetBounded, Contract, GameState, GameStatus, GuessContract, GuessError,
    GuessOutcome, Invariant, InvalidPlayerId, InvalidWord, InvariantViolation, Letter, MASK_GLYPH,
    NoWinAfterLoss, PlayerId, SecretWord, classify, resolve, resolve_letter,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, HangmanConfig, MAX_ATTEMPT_BUDGET};

// Crate-level exports - Persistence
pub use db::{
    DbError, GameOutcome, GameRecord, GameRepository, GameStat, MemoryRepository, NewGameStat,
    PlayerStats, SqliteRepository,
};

// Crate-level exports - Store and words
pub use store::{GameStore, StoreError};
pub use word_source::{DEFAULT_WORDS, FixedWord, RandomWords, WordSource};

// Crate-level exports - Wire protocol and relay
pub use protocol::{ErrorBody, ErrorKind, GameSnapshot, GuessRequest};
pub use server::{ApiError, router, serve};

// Crate-level exports - Client side
pub use client::{ClientError, GameBackend, LocalBackend, RestGameClient};
pub use reconciler::{LocalView, Reconciler};
pub use session::PlayerSession;
