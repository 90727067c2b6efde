//! Tests for database repository operations.

use std::sync::Arc;

use diesel::prelude::*;
use tempfile::NamedTempFile;

use strictly_hangman::{
    FixedWord, GameOutcome, GameRepository, GameState, GameStore, PlayerId, SecretWord,
    SqliteRepository, StoreError, resolve,
};

/// Creates a temporary database file and a repository over it. The file
/// handle must stay in scope to keep the file alive.
fn setup_test_db() -> (NamedTempFile, SqliteRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = SqliteRepository::new(db_path).expect("Failed to create repository");
    (db_file, repo)
}

fn player(id: &str) -> PlayerId {
    PlayerId::new(id).unwrap()
}

fn game_after(word: &str, max: u8, guesses: &[&str]) -> GameState {
    let mut state = GameState::new(SecretWord::new(word).unwrap(), max);
    for guess in guesses {
        state = resolve(&state, guess).unwrap();
    }
    state
}

#[test]
fn test_load_missing_game() {
    let (_db, repo) = setup_test_db();
    let loaded = repo.load_game(&player("nobody")).expect("Query failed");
    assert!(loaded.is_none());
}

#[test]
fn test_save_and_load_round_trip() {
    let (_db, repo) = setup_test_db();
    let alice = player("alice");
    let state = game_after("kettle", 6, &["e", "x", "t"]);

    repo.save_game(&alice, &state).expect("Save failed");
    let loaded = repo.load_game(&alice).expect("Load failed").expect("Game missing");
    assert_eq!(loaded, state);
    assert_eq!(loaded.masked_word(), "_ett_e");
}

#[test]
fn test_save_replaces_previous_game() {
    let (_db, repo) = setup_test_db();
    let alice = player("alice");

    repo.save_game(&alice, &game_after("cat", 6, &["x"]))
        .expect("First save failed");
    let newer = game_after("dog", 6, &[]);
    repo.save_game(&alice, &newer).expect("Second save failed");

    let loaded = repo.load_game(&alice).expect("Load failed").expect("Game missing");
    assert_eq!(loaded, newer);
}

#[test]
fn test_games_survive_reopen() {
    let (db, repo) = setup_test_db();
    let alice = player("alice");
    let state = game_after("cat", 6, &["c", "z"]);
    repo.save_game(&alice, &state).expect("Save failed");
    drop(repo);

    let path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = SqliteRepository::new(path).expect("Reopen failed");
    let loaded = reopened
        .load_game(&alice)
        .expect("Load failed")
        .expect("Game missing");
    assert_eq!(loaded, state);
}

#[test]
fn test_players_do_not_share_rows() {
    let (_db, repo) = setup_test_db();
    repo.save_game(&player("alice"), &game_after("cat", 6, &["x"]))
        .expect("Save failed");
    assert!(repo.load_game(&player("bob")).expect("Load failed").is_none());
}

#[test]
fn test_save_finished_and_stats() {
    let (_db, repo) = setup_test_db();
    let alice = player("alice");

    let won = game_after("cat", 6, &["c", "a", "t"]);
    let lost = game_after("cat", 1, &["z"]);
    repo.save_finished(&alice, &won, GameOutcome::Win)
        .expect("Save failed");
    repo.save_finished(&alice, &lost, GameOutcome::Loss)
        .expect("Save failed");
    repo.save_finished(&alice, &won, GameOutcome::Win)
        .expect("Save failed");

    let stats = repo.stats(&alice).expect("Stats failed");
    assert_eq!(*stats.total_games(), 3);
    assert_eq!(*stats.wins(), 2);
    assert_eq!(*stats.losses(), 1);
    assert!((stats.win_rate() - 66.666).abs() < 0.1);

    let history = repo.history(&alice).expect("History failed");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].secret_word(), "cat");

    let current = repo.load_game(&alice).expect("Load failed").expect("Game missing");
    assert_eq!(current, won);
}

#[test]
fn test_stats_empty_for_new_player() {
    let (_db, repo) = setup_test_db();
    let stats = repo.stats(&player("newbie")).expect("Stats failed");
    assert_eq!(*stats.total_games(), 0);
    assert_eq!(stats.win_rate(), 0.0);
}

#[test]
fn test_in_memory_database() {
    let repo = SqliteRepository::new(":memory:".to_string()).expect("Open failed");
    let alice = player("alice");
    let state = game_after("cat", 6, &["a"]);
    repo.save_game(&alice, &state).expect("Save failed");
    assert_eq!(repo.load_game(&alice).expect("Load failed"), Some(state));
}

/// Opens a second raw connection to the same database file.
fn side_connection(db: &NamedTempFile) -> SqliteConnection {
    let path = db.path().to_str().expect("Invalid path");
    SqliteConnection::establish(path).expect("Side connection failed")
}

const CREATE_GAME_STATS: &str = "CREATE TABLE game_stats (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    player_id TEXT NOT NULL,
    outcome TEXT NOT NULL CHECK (outcome IN ('win', 'loss')),
    secret_word TEXT NOT NULL,
    wrong_guesses INTEGER NOT NULL,
    played_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

#[test]
fn test_failed_stats_write_rolls_back_game() {
    let (db, repo) = setup_test_db();
    let words = FixedWord::new(SecretWord::new("cat").unwrap());
    let store = GameStore::new(Arc::new(repo), Arc::new(words), 1);
    let alice = player("alice");
    store.start(&alice).expect("Start failed");

    let mut side = side_connection(&db);
    diesel::sql_query("DROP TABLE game_stats")
        .execute(&mut side)
        .expect("Drop failed");

    assert!(matches!(store.apply(&alice, "z"), Err(StoreError::Storage(_))));
    let state = store.fetch(&alice).expect("Fetch failed");
    assert!(!state.is_over());
    assert_eq!(state.remaining_attempts(), 1);

    diesel::sql_query(CREATE_GAME_STATS)
        .execute(&mut side)
        .expect("Recreate failed");

    let finished = store.apply(&alice, "z").expect("Retry failed");
    assert!(finished.is_over());
    let stats = store.stats(&alice).expect("Stats failed");
    assert_eq!(*stats.total_games(), 1);
    assert_eq!(*stats.losses(), 1);
}

#[test]
fn test_load_rejects_won_game_with_no_attempts_left() {
    let (db, repo) = setup_test_db();
    let mut side = side_connection(&db);
    diesel::sql_query(
        "INSERT INTO games (player_id, secret_word, guessed_letters, remaining_attempts, max_attempts) \
         VALUES ('alice', 'cat', 'actx', 0, 1)",
    )
    .execute(&mut side)
    .expect("Insert failed");

    let err = repo.load_game(&player("alice")).unwrap_err();
    assert!(err.message.contains("Corrupt game record for 'alice'"));
}

#[test]
fn test_load_rejects_unparseable_word() {
    let (db, repo) = setup_test_db();
    let mut side = side_connection(&db);
    diesel::sql_query(
        "INSERT INTO games (player_id, secret_word, guessed_letters, remaining_attempts, max_attempts) \
         VALUES ('bob', 'c4t', '', 6, 6)",
    )
    .execute(&mut side)
    .expect("Insert failed");

    let err = repo.load_game(&player("bob")).unwrap_err();
    assert!(err.message.starts_with("Corrupt game record for 'bob'"));
}
