//! Client-side transports to the authoritative store.
//!
//! Every mutating call returns the new authoritative snapshot directly, so a
//! client never needs a follow-up fetch to learn what its action did.

mod local;
mod rest;

pub use local::LocalBackend;
pub use rest::RestGameClient;

use async_trait::async_trait;

use crate::db::PlayerStats;
use crate::games::hangman::PlayerId;
use crate::protocol::{ErrorBody, ErrorKind, GameSnapshot};
use crate::store::StoreError;

/// Error surfaced to the presentation layer. All variants are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ClientError {
    /// Guess input was not a single letter.
    #[display("Please enter a single alphabetic character ({})", _0)]
    InvalidGuess(String),

    /// The game is already won or lost.
    #[display("The game is over; reset to play again")]
    GameOver,

    /// No game exists yet for the player.
    #[display("No active game; start one first")]
    NotFound,

    /// A game is already in progress.
    #[display("A game is already in progress")]
    AlreadyActive,

    /// The request never produced an authoritative answer.
    #[display("Request failed: {}", _0)]
    Transport(String),

    /// The server answered with an error it could not recover from.
    #[display("Server error: {}", _0)]
    Server(String),
}

impl std::error::Error for ClientError {}

impl ClientError {
    /// True for failures worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<ErrorBody> for ClientError {
    fn from(body: ErrorBody) -> Self {
        match body.error {
            ErrorKind::InvalidGuess => Self::InvalidGuess(body.message),
            ErrorKind::GameOver => Self::GameOver,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::AlreadyActive => Self::AlreadyActive,
            ErrorKind::InvalidPlayer | ErrorKind::Storage => Self::Server(body.message),
        }
    }
}

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidGuess(input) => Self::InvalidGuess(input),
            StoreError::GameOver => Self::GameOver,
            StoreError::NotFound => Self::NotFound,
            StoreError::AlreadyActive => Self::AlreadyActive,
            other @ (StoreError::Internal(_) | StoreError::Storage(_)) => {
                Self::Server(other.to_string())
            }
        }
    }
}

/// The operation set a client can perform against the authoritative store.
#[async_trait]
pub trait GameBackend: Send + Sync {
    /// Starts a new game for the player.
    async fn start_game(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError>;

    /// Submits one guess and returns the resulting state.
    async fn make_guess(
        &self,
        player_id: &PlayerId,
        letter: &str,
    ) -> Result<GameSnapshot, ClientError>;

    /// Replaces the player's game with a fresh one.
    async fn reset_game(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError>;

    /// Reads the player's current game.
    async fn fetch_state(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError>;

    /// Reads the player's aggregated results.
    async fn stats(&self, player_id: &PlayerId) -> Result<PlayerStats, ClientError>;
}
