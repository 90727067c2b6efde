//! Guess outcomes and errors.
//!
//! A guess is a domain event: it is validated into a [`Letter`] before it
//! ever touches a game, and classified against the state it is applied to.

use super::Letter;
use serde::{Deserialize, Serialize};

/// How a valid guess relates to the game it was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GuessOutcome {
    /// New letter that occurs in the word.
    Hit(Letter),
    /// New letter that does not occur in the word; costs one attempt.
    Miss(Letter),
    /// Letter guessed before; absorbed without cost.
    Repeat(Letter),
}

impl GuessOutcome {
    /// Returns the guessed letter.
    pub fn letter(&self) -> Letter {
        match self {
            Self::Hit(l) | Self::Miss(l) | Self::Repeat(l) => *l,
        }
    }

    /// True if the guess consumed an attempt.
    pub fn costs_attempt(&self) -> bool {
        matches!(self, Self::Miss(_))
    }
}

/// Error that can occur when validating or applying a guess.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GuessError {
    /// Input was not exactly one alphabetic character.
    #[display("Invalid guess {:?}: enter a single letter a-z", _0)]
    InvalidGuess(String),

    /// The game is already won or lost.
    #[display("Game is already over")]
    GameOver,

    /// A postcondition failed after applying the guess.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for GuessError {}
