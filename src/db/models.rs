//! Database models and domain types.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::games::hangman::{GameState, Letter, PlayerId, SecretWord};

/// Stored form of one player's current game.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRecord {
    player_id: String,
    secret_word: String,
    guessed_letters: String,
    remaining_attempts: i32,
    max_attempts: i32,
    updated_at: NaiveDateTime,
}

impl GameRecord {
    /// Flattens a game state into a storable record.
    #[instrument(skip(state), fields(player_id = %player_id))]
    pub fn from_state(player_id: &PlayerId, state: &GameState) -> Self {
        Self {
            player_id: player_id.to_string(),
            secret_word: state.secret_word().as_str().to_string(),
            guessed_letters: state.guessed_letters().iter().map(|l| l.as_char()).collect(),
            remaining_attempts: i32::from(state.remaining_attempts()),
            max_attempts: i32::from(state.max_attempts()),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Rebuilds the game state, rejecting records that break game invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any column holds a value the turn resolver
    /// could never have produced.
    #[instrument(skip(self), fields(player_id = %self.player_id))]
    pub fn into_state(self) -> Result<GameState, DbError> {
        let player = self.player_id.as_str();
        let word = SecretWord::new(self.secret_word.as_str())
            .map_err(|e| DbError::corrupt_record(player, e))?;
        let guessed = self
            .guessed_letters
            .chars()
            .map(Letter::try_from)
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|e| DbError::corrupt_record(player, e))?;
        let remaining = u8::try_from(self.remaining_attempts).map_err(|_| {
            DbError::corrupt_record(
                player,
                format!("remaining_attempts {}", self.remaining_attempts),
            )
        })?;
        let max = u8::try_from(self.max_attempts).map_err(|_| {
            DbError::corrupt_record(player, format!("max_attempts {}", self.max_attempts))
        })?;

        GameState::restore(word, guessed, remaining, max).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            DbError::corrupt_record(player, descriptions)
        })
    }
}

/// A finished game as recorded in the statistics table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game_stats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameStat {
    id: i32,
    player_id: String,
    outcome: String,
    secret_word: String,
    wrong_guesses: i32,
    played_at: NaiveDateTime,
}

impl GameStat {
    /// Parses the stored outcome string into a [`GameOutcome`] enum.
    #[instrument(skip(self), fields(outcome = %self.outcome))]
    pub fn parse_outcome(&self) -> Result<GameOutcome, DbError> {
        GameOutcome::from_db_string(self.outcome())
    }
}

/// Insertable game stat model for recording finished games.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::game_stats)]
pub struct NewGameStat {
    player_id: String,
    outcome: String,
    secret_word: String,
    wrong_guesses: i32,
}

impl NewGameStat {
    /// Builds the stat row for a terminal game.
    #[instrument(skip(state), fields(player_id = %player_id, outcome = ?outcome))]
    pub fn from_finished(player_id: &PlayerId, state: &GameState, outcome: GameOutcome) -> Self {
        Self::new(
            player_id.to_string(),
            outcome.to_db_string().to_string(),
            state.secret_word().as_str().to_string(),
            i32::from(state.wrong_guesses()),
        )
    }
}

/// Game outcome from the player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// Player guessed the word.
    Win,
    /// Player ran out of attempts.
    Loss,
}

impl GameOutcome {
    /// Outcome of a terminal game, `None` while it is still in progress.
    pub fn of(state: &GameState) -> Option<Self> {
        if state.is_won() {
            Some(Self::Win)
        } else if state.is_over() {
            Some(Self::Loss)
        } else {
            None
        }
    }

    /// Converts outcome to the string stored in the database.
    #[instrument]
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
        }
    }

    /// Parses outcome from the string stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a valid outcome value.
    #[instrument(skip(s), fields(s = %s))]
    pub fn from_db_string(s: &str) -> Result<Self, DbError> {
        match s {
            "win" => Ok(Self::Win),
            "loss" => Ok(Self::Loss),
            _ => Err(DbError::new(format!("Invalid outcome: '{}'", s))),
        }
    }
}

/// Aggregated results for a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PlayerStats {
    total_games: u32,
    wins: u32,
    losses: u32,
}

impl PlayerStats {
    /// Counts one more finished game.
    pub fn record(&mut self, outcome: GameOutcome) {
        self.total_games += 1;
        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss => self.losses += 1,
        }
    }

    /// Calculates win rate as a percentage (0.0–100.0).
    #[instrument(skip(self))]
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (f64::from(self.wins) / f64::from(self.total_games)) * 100.0
        }
    }
}
