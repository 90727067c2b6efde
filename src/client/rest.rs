//! HTTP client for the relay service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::{ClientError, GameBackend};
use crate::db::PlayerStats;
use crate::games::hangman::PlayerId;
use crate::protocol::{ErrorBody, GameSnapshot, GuessRequest};

/// Type-safe HTTP game client.
///
/// Every request carries the configured timeout; a timed-out request is
/// reported as [`ClientError::Transport`] and never retried here.
#[derive(Debug, Clone)]
pub struct RestGameClient {
    base_url: String,
    client: reqwest::Client,
}

fn transport(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        warn!(error = %err, "Request timed out");
        ClientError::Transport(format!("timed out: {}", err))
    } else {
        warn!(error = %err, "Request failed");
        ClientError::Transport(err.to_string())
    }
}

impl RestGameClient {
    /// Creates a client for the relay at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref(), timeout = ?timeout))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        info!("REST client ready");
        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Returns the relay base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, player_id: &PlayerId, resource: &str) -> String {
        format!("{}/api/players/{}/{}", self.base_url, player_id, resource)
    }

    /// Decodes a success body, or maps an error body to a [`ClientError`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(transport);
        }

        let body = response.text().await.map_err(transport)?;
        debug!(status = %status, body = %body, "Error response");
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => Err(error.into()),
            Err(_) => Err(ClientError::Server(format!("HTTP {}: {}", status, body))),
        }
    }
}

#[async_trait]
impl GameBackend for RestGameClient {
    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn start_game(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError> {
        info!("Starting game via REST");
        let response = self
            .client
            .post(self.url(player_id, "game"))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn make_guess(
        &self,
        player_id: &PlayerId,
        letter: &str,
    ) -> Result<GameSnapshot, ClientError> {
        info!("Making guess via REST");
        let response = self
            .client
            .post(self.url(player_id, "guess"))
            .json(&GuessRequest {
                letter: letter.to_string(),
            })
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn reset_game(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError> {
        info!("Resetting game via REST");
        let response = self
            .client
            .post(self.url(player_id, "reset"))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn fetch_state(&self, player_id: &PlayerId) -> Result<GameSnapshot, ClientError> {
        debug!("Fetching game via REST");
        let response = self
            .client
            .get(self.url(player_id, "game"))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn stats(&self, player_id: &PlayerId) -> Result<PlayerStats, ClientError> {
        let response = self
            .client
            .get(self.url(player_id, "stats"))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }
}
