//! Tests for the HTTP relay.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use strictly_hangman::{
    ErrorBody, ErrorKind, FixedWord, GameSnapshot, GameStore, MemoryRepository, SecretWord,
    router,
};

fn app(word: &str, max_attempts: u8) -> Router {
    let words = FixedWord::new(SecretWord::new(word).unwrap());
    router(GameStore::new(
        Arc::new(MemoryRepository::new()),
        Arc::new(words),
        max_attempts,
    ))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn snapshot(bytes: &[u8]) -> GameSnapshot {
    serde_json::from_slice(bytes).unwrap()
}

fn error(bytes: &[u8]) -> ErrorBody {
    serde_json::from_slice(bytes).unwrap()
}

async fn guess(app: &Router, player: &str, letter: &str) -> (StatusCode, Vec<u8>) {
    send(
        app,
        "POST",
        &format!("/api/players/{}/guess", player),
        Some(json!({ "letter": letter })),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = app("cat", 6);
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_start_returns_created_snapshot() {
    let app = app("cat", 6);
    let (status, body) = send(&app, "POST", "/api/players/alice/game", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let snap = snapshot(&body);
    assert_eq!(snap.player_id.as_str(), "alice");
    assert_eq!(snap.masked_word, "___");
    assert_eq!(snap.word_length, 3);
    assert_eq!(snap.remaining_attempts, 6);
    assert!(!snap.is_over);
    assert!(snap.revealed_word.is_none());
}

#[tokio::test]
async fn test_snapshot_never_leaks_secret_mid_game() {
    let app = app("cat", 6);
    send(&app, "POST", "/api/players/alice/game", None).await;
    let (_, body) = send(&app, "GET", "/api/players/alice/game", None).await;
    let raw: Value = serde_json::from_slice(&body).unwrap();
    assert!(raw.get("revealed_word").is_none());
    assert!(!String::from_utf8(body).unwrap().contains("cat"));
}

#[tokio::test]
async fn test_start_twice_conflicts() {
    let app = app("cat", 6);
    send(&app, "POST", "/api/players/alice/game", None).await;
    let (status, body) = send(&app, "POST", "/api/players/alice/game", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error(&body).error, ErrorKind::AlreadyActive);
}

#[tokio::test]
async fn test_fetch_missing_game_is_not_found() {
    let app = app("cat", 6);
    let (status, body) = send(&app, "GET", "/api/players/nobody/game", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error(&body).error, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_guess_returns_authoritative_state() {
    let app = app("cat", 6);
    send(&app, "POST", "/api/players/alice/game", None).await;

    let (status, body) = guess(&app, "alice", "a").await;
    assert_eq!(status, StatusCode::OK);
    let snap = snapshot(&body);
    assert_eq!(snap.masked_word, "_a_");
    assert_eq!(snap.guessed_letters, vec!['a']);
    assert_eq!(snap.remaining_attempts, 6);

    let (_, body) = guess(&app, "alice", "X").await;
    let snap = snapshot(&body);
    assert_eq!(snap.guessed_letters, vec!['a', 'x']);
    assert_eq!(snap.remaining_attempts, 5);
    assert_eq!(snap.wrong_guesses(), 1);
}

#[tokio::test]
async fn test_invalid_guess_is_bad_request() {
    let app = app("cat", 6);
    send(&app, "POST", "/api/players/alice/game", None).await;
    for bad in ["ab", "5", ""] {
        let (status, body) = guess(&app, "alice", bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "input {:?}", bad);
        assert_eq!(error(&body).error, ErrorKind::InvalidGuess);
    }
}

#[tokio::test]
async fn test_guess_without_game_is_not_found() {
    let app = app("cat", 6);
    let (status, body) = guess(&app, "alice", "a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error(&body).error, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_win_reveals_word_then_rejects_guesses() {
    let app = app("cat", 6);
    send(&app, "POST", "/api/players/alice/game", None).await;
    guess(&app, "alice", "c").await;
    guess(&app, "alice", "a").await;
    let (_, body) = guess(&app, "alice", "t").await;
    let snap = snapshot(&body);
    assert!(snap.is_won);
    assert!(snap.is_over);
    assert_eq!(snap.revealed_word.as_deref(), Some("cat"));

    let (status, body) = guess(&app, "alice", "z").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error(&body).error, ErrorKind::GameOver);
}

#[tokio::test]
async fn test_reset_and_stats() {
    let app = app("cat", 1);
    send(&app, "POST", "/api/players/alice/game", None).await;
    let (_, body) = guess(&app, "alice", "z").await;
    assert!(snapshot(&body).is_over);

    let (status, body) = send(&app, "POST", "/api/players/alice/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    let snap = snapshot(&body);
    assert!(snap.guessed_letters.is_empty());
    assert_eq!(snap.remaining_attempts, 1);
    assert!(!snap.is_over);

    let (status, body) = send(&app, "GET", "/api/players/alice/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    let stats: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stats["total_games"], 1);
    assert_eq!(stats["losses"], 1);
}

#[tokio::test]
async fn test_invalid_player_id_is_bad_request() {
    let app = app("cat", 6);
    let (status, body) = send(&app, "POST", "/api/players/bad%20id/game", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error(&body).error, ErrorKind::InvalidPlayer);
}

#[tokio::test]
async fn test_malformed_guess_body_is_invalid_guess() {
    let app = app("cat", 6);
    send(&app, "POST", "/api/players/alice/game", None).await;

    for body in [json!({ "letter": 5 }), json!({}), json!(["a"])] {
        let (status, bytes) = send(&app, "POST", "/api/players/alice/guess", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error(&bytes).error, ErrorKind::InvalidGuess);
    }

    // Nothing was charged.
    let (_, bytes) = send(&app, "GET", "/api/players/alice/game", None).await;
    assert_eq!(snapshot(&bytes).remaining_attempts, 6);
}

#[tokio::test]
async fn test_guess_without_json_content_type_is_invalid_guess() {
    let app = app("cat", 6);
    send(&app, "POST", "/api/players/alice/game", None).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/players/alice/guess")
        .body(Body::from(r#"{"letter":"a"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(error(&bytes).error, ErrorKind::InvalidGuess);
}
