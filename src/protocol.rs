//! Wire types shared by the relay service and its clients.

use crate::games::hangman::{GameState, PlayerId};
use serde::{Deserialize, Serialize};

/// Body of a guess request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    /// Raw guess input; validated by the server.
    pub letter: String,
}

/// Authoritative view of one player's game as sent over the wire.
///
/// The secret word stays hidden until the game is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Owner of the game.
    pub player_id: PlayerId,
    /// The word with unguessed letters masked.
    pub masked_word: String,
    /// Number of letters in the word.
    pub word_length: usize,
    /// Letters guessed so far, alphabetical.
    pub guessed_letters: Vec<char>,
    /// Attempts left.
    pub remaining_attempts: u8,
    /// Attempt budget of this game.
    pub max_attempts: u8,
    /// Game is won or lost.
    pub is_over: bool,
    /// Every letter has been guessed.
    pub is_won: bool,
    /// The secret word, only once the game is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revealed_word: Option<String>,
}

impl GameSnapshot {
    /// Projects a game state for its owner.
    pub fn new(player_id: &PlayerId, state: &GameState) -> Self {
        let is_over = state.is_over();
        Self {
            player_id: player_id.clone(),
            masked_word: state.masked_word(),
            word_length: state.secret_word().len(),
            guessed_letters: state.guessed_letters().iter().map(|l| l.as_char()).collect(),
            remaining_attempts: state.remaining_attempts(),
            max_attempts: state.max_attempts(),
            is_over,
            is_won: state.is_won(),
            revealed_word: is_over.then(|| state.secret_word().as_str().to_string()),
        }
    }

    /// Number of incorrect guesses so far.
    pub fn wrong_guesses(&self) -> u8 {
        self.max_attempts.saturating_sub(self.remaining_attempts)
    }
}

/// Machine-readable error category carried in error bodies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Guess input was not a single letter.
    InvalidGuess,
    /// The game is already won or lost.
    GameOver,
    /// No game exists for the player.
    NotFound,
    /// A game is already in progress for the player.
    AlreadyActive,
    /// The player id failed validation.
    InvalidPlayer,
    /// The store failed.
    Storage,
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error category.
    pub error: ErrorKind,
    /// Human-readable description.
    pub message: String,
}
