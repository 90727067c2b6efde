//! Storage errors for the game repositories.

use derive_more::{Display, Error};
use tracing::{instrument, warn};

/// Failure to read or write a player's game, tagged with where it was raised.
#[derive(Debug, Clone, Display, Error)]
#[display("Storage error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// What went wrong.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// File that raised the error.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// A stored game the turn resolver could not have produced.
    #[track_caller]
    pub fn corrupt_record(player_id: &str, detail: impl std::fmt::Display) -> Self {
        warn!(player_id, %detail, "Rejecting corrupt game record");
        Self::new(format!("Corrupt game record for '{}': {}", player_id, detail))
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}
