//! Persistence layer for game state and finished-game statistics.

mod error;
mod memory;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use memory::MemoryRepository;
pub use models::{GameOutcome, GameRecord, GameStat, NewGameStat, PlayerStats};
pub use repository::{GameRepository, SqliteRepository};
