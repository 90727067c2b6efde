//! Game repositories: the authoritative record of every player's game.

use std::sync::{Mutex, MutexGuard};

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameOutcome, GameRecord, GameStat, NewGameStat, PlayerStats, schema};
use crate::games::hangman::{GameState, PlayerId};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Durable per-player storage for games and finished-game statistics.
///
/// Implementations hold one game per player and never expose one player's
/// record through another player's id. Callers serialize writes per player.
pub trait GameRepository: Send + Sync + std::fmt::Debug {
    /// Loads the player's current game, if any.
    fn load_game(&self, player_id: &PlayerId) -> Result<Option<GameState>, DbError>;

    /// Stores the player's game, replacing any previous one.
    fn save_game(&self, player_id: &PlayerId, state: &GameState) -> Result<(), DbError>;

    /// Stores the player's finished game and records its result as one
    /// write: either both land or neither does.
    fn save_finished(
        &self,
        player_id: &PlayerId,
        state: &GameState,
        outcome: GameOutcome,
    ) -> Result<(), DbError>;

    /// Returns aggregated results for the player.
    fn stats(&self, player_id: &PlayerId) -> Result<PlayerStats, DbError>;
}

/// SQLite-backed repository.
pub struct SqliteRepository {
    db_path: String,
    conn: Mutex<SqliteConnection>,
}

impl std::fmt::Debug for SqliteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRepository")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SqliteRepository {
    /// Opens the database at the given path and applies pending migrations.
    ///
    /// Use `":memory:"` for a private in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening SqliteRepository");
        let mut conn = SqliteConnection::establish(&db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", db_path, e)))?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        debug!(count = applied.len(), "Migrations applied");

        Ok(Self {
            db_path,
            conn: Mutex::new(conn),
        })
    }

    /// Locks the shared connection.
    fn connection(&self) -> Result<MutexGuard<'_, SqliteConnection>, DbError> {
        self.conn
            .lock()
            .map_err(|_| DbError::new(format!("Connection to '{}' poisoned", self.db_path)))
    }

    /// Lists finished games for a player, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self), fields(player_id = %player_id))]
    pub fn history(&self, player_id: &PlayerId) -> Result<Vec<GameStat>, DbError> {
        debug!("Loading game history");
        let mut conn = self.connection()?;

        let stats = schema::game_stats::table
            .filter(schema::game_stats::player_id.eq(player_id.as_str()))
            .order((
                schema::game_stats::played_at.desc(),
                schema::game_stats::id.desc(),
            ))
            .select(GameStat::as_select())
            .load(&mut *conn)?;

        info!(count = stats.len(), "Game history loaded");
        Ok(stats)
    }
}

impl GameRepository for SqliteRepository {
    #[instrument(skip(self), fields(player_id = %player_id))]
    fn load_game(&self, player_id: &PlayerId) -> Result<Option<GameState>, DbError> {
        debug!("Loading game");
        let mut conn = self.connection()?;

        let record = schema::games::table
            .find(player_id.as_str())
            .select(GameRecord::as_select())
            .first(&mut *conn)
            .optional()?;

        match record {
            Some(record) => record.into_state().map(Some),
            None => {
                debug!("No game stored");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, state), fields(player_id = %player_id, status = %state.status()))]
    fn save_game(&self, player_id: &PlayerId, state: &GameState) -> Result<(), DbError> {
        let record = GameRecord::from_state(player_id, state);
        let mut conn = self.connection()?;

        diesel::replace_into(schema::games::table)
            .values(&record)
            .execute(&mut *conn)?;

        debug!(remaining_attempts = record.remaining_attempts(), "Game saved");
        Ok(())
    }

    #[instrument(skip(self, state), fields(player_id = %player_id, outcome = ?outcome))]
    fn save_finished(
        &self,
        player_id: &PlayerId,
        state: &GameState,
        outcome: GameOutcome,
    ) -> Result<(), DbError> {
        let record = GameRecord::from_state(player_id, state);
        let stat = NewGameStat::from_finished(player_id, state, outcome);
        let mut conn = self.connection()?;

        let stat_id = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::replace_into(schema::games::table)
                .values(&record)
                .execute(conn)?;
            let recorded = diesel::insert_into(schema::game_stats::table)
                .values(&stat)
                .returning(GameStat::as_returning())
                .get_result(conn)?;
            Ok(*recorded.id())
        })?;

        info!(stat_id, "Finished game saved and result recorded");
        Ok(())
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    fn stats(&self, player_id: &PlayerId) -> Result<PlayerStats, DbError> {
        debug!("Computing aggregated stats");
        let mut conn = self.connection()?;

        let rows = schema::game_stats::table
            .filter(schema::game_stats::player_id.eq(player_id.as_str()))
            .select(GameStat::as_select())
            .load(&mut *conn)?;

        let mut stats = PlayerStats::default();
        for row in &rows {
            match row.parse_outcome() {
                Ok(outcome) => stats.record(outcome),
                Err(e) => warn!(stat_id = row.id(), error = %e, "Skipping unknown outcome"),
            }
        }

        info!(
            total = stats.total_games(),
            wins = stats.wins(),
            losses = stats.losses(),
            win_rate = %format!("{:.1}%", stats.win_rate()),
            "Aggregated stats computed"
        );
        Ok(stats)
    }
}
