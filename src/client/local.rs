//! In-process backend over a [`GameStore`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::{instrument, warn};

use super::{ClientError, GameBackend};
use crate::db::PlayerStats;
use crate::games::hangman::{GameState, PlayerId};
use crate::protocol::GameSnapshot;
use crate::store::{GameStore, StoreError};

/// Talks to a store in the same process, with the same timeout discipline
/// as the REST client.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    store: GameStore,
    timeout: Duration,
}

impl LocalBackend {
    /// Creates a backend over `store`; each call fails after `timeout`.
    pub fn new(store: GameStore, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    async fn run<T, F>(&self, op: F) -> Result<T, ClientError>
    where
        F: FnOnce(GameStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let task = tokio::task::spawn_blocking(move || op(store));
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result.map_err(ClientError::from),
            Ok(Err(join)) => Err(ClientError::Server(format!("store task failed: {}", join))),
            Err(_) => {
                warn!(timeout = ?self.timeout, "Store call timed out");
                Err(ClientError::Transport(format!(
                    "timed out after {:?}",
                    self.timeout
                )))
            }
        }
    }

    async fn snapshot<F>(&self, player_id: &PlayerId, op: F) -> Result<GameSnapshot, ClientError>
    where
        F: FnOnce(GameStore, PlayerId) -> Result<GameState, StoreError> + Send + 'static,
    {
        let id = player_id.clone();
        let state = self.run(move |store| op(store, id)).await?;
        Ok(GameSnapshot::new(player_id, &state))
    }
}

#[async_trait]
impl GameBackend for LocalBackend {
    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn start_game(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError> {
        self.snapshot(player_id, |store, id| store.start(&id)).await
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn make_guess(
        &self,
        player_id: &PlayerId,
        letter: &str,
    ) -> Result<GameSnapshot, ClientError> {
        let letter = letter.to_string();
        self.snapshot(player_id, move |store, id| store.apply(&id, &letter))
            .await
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn reset_game(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError> {
        self.snapshot(player_id, |store, id| store.reset(&id)).await
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn fetch_state(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError> {
        self.snapshot(player_id, |store, id| store.fetch(&id)).await
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn stats(&self, player_id: &PlayerId) -> Result<PlayerStats, ClientError> {
        let id = player_id.clone();
        self.run(move |store| store.stats(&id)).await
    }
}
