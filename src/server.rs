//! HTTP relay exposing the game store as a JSON API.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

use crate::db::PlayerStats;
use crate::games::hangman::PlayerId;
use crate::protocol::{ErrorBody, ErrorKind, GameSnapshot, GuessRequest};
use crate::store::{GameStore, StoreError};

/// Error response carrying an [`ErrorBody`].
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = match kind {
            ErrorKind::InvalidGuess | ErrorKind::InvalidPlayer => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::GameOver | ErrorKind::AlreadyActive => StatusCode::CONFLICT,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            body: ErrorBody {
                error: kind,
                message: message.into(),
            },
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::Storage(_) | StoreError::Internal(_) => {
                error!(error = %err, "Store failure");
            }
            _ => debug!(error = %err, "Request rejected"),
        }
        Self::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Builds the relay router over a shared store.
#[instrument(skip(store))]
pub fn router(store: GameStore) -> Router {
    info!("Building relay router");
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/players/{player_id}/game",
            post(start_game).get(fetch_state),
        )
        .route("/api/players/{player_id}/guess", post(make_guess))
        .route("/api/players/{player_id}/reset", post(reset_game))
        .route("/api/players/{player_id}/stats", get(player_stats))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(store)
}

/// Binds the relay and serves until Ctrl-C.
///
/// # Errors
///
/// Fails if the address cannot be bound or the server stops with an error.
#[instrument(skip(store))]
pub async fn serve(store: GameStore, host: String, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(address = %listener.local_addr()?, "Relay listening");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown requested");
        })
        .await?;

    info!("Relay stopped");
    Ok(())
}

fn parse_player(raw: String) -> Result<PlayerId, ApiError> {
    PlayerId::new(raw).map_err(|e| ApiError::new(ErrorKind::InvalidPlayer, e.to_string()))
}

/// Runs a store operation off the async executor.
async fn blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| {
            error!(error = %e, "Store task panicked");
            ApiError::new(ErrorKind::Storage, "Store task failed")
        })?
        .map_err(ApiError::from)
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(store))]
async fn start_game(
    State(store): State<GameStore>,
    Path(player_id): Path<String>,
) -> Result<(StatusCode, Json<GameSnapshot>), ApiError> {
    let player_id = parse_player(player_id)?;
    let id = player_id.clone();
    let state = blocking(move || store.start(&id)).await?;
    Ok((StatusCode::CREATED, Json(GameSnapshot::new(&player_id, &state))))
}

#[instrument(skip(store))]
async fn fetch_state(
    State(store): State<GameStore>,
    Path(player_id): Path<String>,
) -> Result<Json<GameSnapshot>, ApiError> {
    let player_id = parse_player(player_id)?;
    let id = player_id.clone();
    let state = blocking(move || store.fetch(&id)).await?;
    Ok(Json(GameSnapshot::new(&player_id, &state)))
}

/// A body that is not a `{"letter": "<string>"}` object is a bad guess, not
/// a framework rejection, so clients see the usual error body.
#[instrument(skip(store, payload))]
async fn make_guess(
    State(store): State<GameStore>,
    Path(player_id): Path<String>,
    payload: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<GameSnapshot>, ApiError> {
    let player_id = parse_player(player_id)?;
    let Json(req) = payload.map_err(|rejection| {
        debug!(rejection = %rejection, "Malformed guess body");
        ApiError::new(ErrorKind::InvalidGuess, rejection.body_text())
    })?;
    let id = player_id.clone();
    let state = blocking(move || store.apply(&id, &req.letter)).await?;
    Ok(Json(GameSnapshot::new(&player_id, &state)))
}

#[instrument(skip(store))]
async fn reset_game(
    State(store): State<GameStore>,
    Path(player_id): Path<String>,
) -> Result<Json<GameSnapshot>, ApiError> {
    let player_id = parse_player(player_id)?;
    let id = player_id.clone();
    let state = blocking(move || store.reset(&id)).await?;
    Ok(Json(GameSnapshot::new(&player_id, &state)))
}

#[instrument(skip(store))]
async fn player_stats(
    State(store): State<GameStore>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerStats>, ApiError> {
    let player_id = parse_player(player_id)?;
    let stats = blocking(move || store.stats(&player_id)).await?;
    Ok(Json(stats))
}
