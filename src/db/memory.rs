//! In-process repository.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, instrument};

use crate::db::{DbError, GameOutcome, GameRepository, PlayerStats};
use crate::games::hangman::{GameState, PlayerId};

#[derive(Debug, Default)]
struct Tables {
    games: HashMap<PlayerId, GameState>,
    stats: HashMap<PlayerId, PlayerStats>,
}

/// Keeps every game in memory; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory repository");
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DbError> {
        self.tables
            .lock()
            .map_err(|_| DbError::new("In-memory tables poisoned"))
    }
}

impl GameRepository for MemoryRepository {
    #[instrument(skip(self), fields(player_id = %player_id))]
    fn load_game(&self, player_id: &PlayerId) -> Result<Option<GameState>, DbError> {
        let game = self.tables()?.games.get(player_id).cloned();
        debug!(found = game.is_some(), "Loaded game");
        Ok(game)
    }

    #[instrument(skip(self, state), fields(player_id = %player_id, status = %state.status()))]
    fn save_game(&self, player_id: &PlayerId, state: &GameState) -> Result<(), DbError> {
        self.tables()?
            .games
            .insert(player_id.clone(), state.clone());
        debug!("Game saved");
        Ok(())
    }

    #[instrument(skip(self, state), fields(player_id = %player_id, outcome = ?outcome))]
    fn save_finished(
        &self,
        player_id: &PlayerId,
        state: &GameState,
        outcome: GameOutcome,
    ) -> Result<(), DbError> {
        let mut tables = self.tables()?;
        tables.games.insert(player_id.clone(), state.clone());
        tables
            .stats
            .entry(player_id.clone())
            .or_default()
            .record(outcome);
        info!("Finished game saved and result recorded");
        Ok(())
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    fn stats(&self, player_id: &PlayerId) -> Result<PlayerStats, DbError> {
        Ok(self
            .tables()?
            .stats
            .get(player_id)
            .copied()
            .unwrap_or_default())
    }
}
