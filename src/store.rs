//! Authoritative game state store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument, warn};

use crate::config::{HangmanConfig, MAX_ATTEMPT_BUDGET};
use crate::db::{
    DbError, GameOutcome, GameRepository, MemoryRepository, PlayerStats, SqliteRepository,
};
use crate::games::hangman::{GameState, GuessError, Letter, PlayerId, classify, resolve_letter};
use crate::protocol::ErrorKind;
use crate::word_source::WordSource;

/// Error returned by store operations.
#[derive(Debug, Clone, derive_more::Display)]
pub enum StoreError {
    /// Guess input was not a single letter.
    #[display("Invalid guess {:?}: enter a single letter a-z", _0)]
    InvalidGuess(String),

    /// The game is already won or lost.
    #[display("Game is already over; reset to play again")]
    GameOver,

    /// No game exists for the player.
    #[display("No active game for this player")]
    NotFound,

    /// A game is already in progress for the player.
    #[display("A game is already in progress; reset to start over")]
    AlreadyActive,

    /// A rule postcondition failed; indicates a bug, not bad input.
    #[display("Internal rule violation: {}", _0)]
    Internal(String),

    /// The repository failed.
    #[display("{}", _0)]
    Storage(DbError),
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// Wire category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidGuess(_) => ErrorKind::InvalidGuess,
            Self::GameOver => ErrorKind::GameOver,
            Self::NotFound => ErrorKind::NotFound,
            Self::AlreadyActive => ErrorKind::AlreadyActive,
            Self::Internal(_) | Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<GuessError> for StoreError {
    fn from(err: GuessError) -> Self {
        match err {
            GuessError::InvalidGuess(input) => Self::InvalidGuess(input),
            GuessError::GameOver => Self::GameOver,
            GuessError::InvariantViolation(msg) => Self::Internal(msg),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Storage(err)
    }
}

type PlayerLocks = Arc<Mutex<HashMap<PlayerId, Arc<Mutex<()>>>>>;

/// Holds one game per player and applies every mutation through the turn
/// resolver.
///
/// Mutations for a single player run one at a time: each operation holds
/// that player's lock across its whole load-resolve-save sequence. Different
/// players never contend.
#[derive(Debug, Clone)]
pub struct GameStore {
    repository: Arc<dyn GameRepository>,
    words: Arc<dyn WordSource>,
    max_attempts: u8,
    locks: PlayerLocks,
}

impl GameStore {
    /// Creates a store over the given repository and word source.
    ///
    /// `max_attempts` is clamped to `1..=MAX_ATTEMPT_BUDGET`; a zero budget
    /// would start games that are already lost.
    #[instrument(skip(repository, words))]
    pub fn new(
        repository: Arc<dyn GameRepository>,
        words: Arc<dyn WordSource>,
        max_attempts: u8,
    ) -> Self {
        let clamped = max_attempts.clamp(1, MAX_ATTEMPT_BUDGET);
        if clamped != max_attempts {
            warn!(requested = max_attempts, using = clamped, "Attempt budget out of range");
        }
        let max_attempts = clamped;
        info!(?repository, "Creating game store");
        Self {
            repository,
            words,
            max_attempts,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Builds a store from configuration: SQLite when `db_path` is set,
    /// in-memory otherwise, with a random word source.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the database cannot be opened.
    #[instrument(skip(config))]
    pub fn from_config(config: &HangmanConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let repository: Arc<dyn GameRepository> = match config.db_path() {
            Some(path) => Arc::new(SqliteRepository::new(path.clone())?),
            None => Arc::new(MemoryRepository::new()),
        };
        let words = Arc::new(config.word_source()?);
        Ok(Self::new(repository, words, *config.max_attempts()))
    }

    /// Attempt budget for new games.
    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    fn player_lock(&self, player_id: &PlayerId) -> Arc<Mutex<()>> {
        // The maps hold no invariants a panicking holder could break.
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        Arc::clone(locks.entry(player_id.clone()).or_default())
    }

    fn fresh_game(&self) -> GameState {
        GameState::new(self.words.next_word(), self.max_attempts)
    }

    /// Starts a game for the player.
    ///
    /// A finished game is replaced; an unfinished one is kept.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyActive`] if a game is in progress.
    #[instrument(skip(self), fields(player_id = %player_id))]
    pub fn start(&self, player_id: &PlayerId) -> Result<GameState, StoreError> {
        let lock = self.player_lock(player_id);
        let _guard = lock.lock().unwrap_or_else(|p| p.into_inner());

        if let Some(existing) = self.repository.load_game(player_id)?
            && !existing.is_over()
        {
            warn!("Start rejected: game already in progress");
            return Err(StoreError::AlreadyActive);
        }

        let game = self.fresh_game();
        self.repository.save_game(player_id, &game)?;
        info!(
            word_length = game.secret_word().len(),
            max_attempts = game.max_attempts(),
            "Game started"
        );
        Ok(game)
    }

    /// Returns the player's game, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the repository fails.
    #[instrument(skip(self), fields(player_id = %player_id))]
    pub fn get(&self, player_id: &PlayerId) -> Result<Option<GameState>, StoreError> {
        Ok(self.repository.load_game(player_id)?)
    }

    /// Returns the player's game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the player has no game.
    #[instrument(skip(self), fields(player_id = %player_id))]
    pub fn fetch(&self, player_id: &PlayerId) -> Result<GameState, StoreError> {
        self.get(player_id)?.ok_or(StoreError::NotFound)
    }

    /// Applies one guess and returns the resulting state.
    ///
    /// The input is validated before the store is touched. Repeating a letter
    /// already guessed returns the current state unchanged, so resubmitting a
    /// guess whose response was lost never costs a second attempt.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidGuess`] for malformed input
    /// - [`StoreError::NotFound`] if the player has no game
    /// - [`StoreError::GameOver`] if the game is already finished
    #[instrument(skip(self), fields(player_id = %player_id))]
    pub fn apply(&self, player_id: &PlayerId, input: &str) -> Result<GameState, StoreError> {
        let letter = Letter::parse(input)?;

        let lock = self.player_lock(player_id);
        let _guard = lock.lock().unwrap_or_else(|p| p.into_inner());

        let current = self
            .repository
            .load_game(player_id)?
            .ok_or(StoreError::NotFound)?;

        let outcome = classify(&current, letter).inspect_err(|e| {
            warn!(error = %e, "Guess rejected");
        })?;
        let next = resolve_letter(&current, letter)?;

        if next == current {
            debug!(%outcome, "State unchanged");
            return Ok(next);
        }

        match GameOutcome::of(&next) {
            Some(result) => {
                self.repository.save_finished(player_id, &next, result)?;
                info!(outcome = ?result, "Game finished");
            }
            None => self.repository.save_game(player_id, &next)?,
        }

        info!(
            %outcome,
            remaining_attempts = next.remaining_attempts(),
            status = %next.status(),
            "Guess applied"
        );
        Ok(next)
    }

    /// Replaces the player's game with a fresh one, whatever its state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the repository fails.
    #[instrument(skip(self), fields(player_id = %player_id))]
    pub fn reset(&self, player_id: &PlayerId) -> Result<GameState, StoreError> {
        let lock = self.player_lock(player_id);
        let _guard = lock.lock().unwrap_or_else(|p| p.into_inner());

        let game = self.fresh_game();
        self.repository.save_game(player_id, &game)?;
        info!(word_length = game.secret_word().len(), "Game reset");
        Ok(game)
    }

    /// Returns the player's aggregated results.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the repository fails.
    #[instrument(skip(self), fields(player_id = %player_id))]
    pub fn stats(&self, player_id: &PlayerId) -> Result<PlayerStats, StoreError> {
        Ok(self.repository.stats(player_id)?)
    }
}
