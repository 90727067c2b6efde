//! Client-side view kept in step with the authoritative store.
//!
//! The view is never advanced on its own: each successful request hands back
//! an authoritative snapshot and every displayed field is overwritten from it.
//! A failed request leaves the game fields exactly as they were.

use tracing::{debug, info, instrument, warn};

use crate::client::{ClientError, GameBackend};
use crate::games::hangman::{Letter, MASK_GLYPH};
use crate::protocol::GameSnapshot;
use crate::session::PlayerSession;

/// Display state for one player's game.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct LocalView {
    /// A game has been received from the store.
    initialized: bool,
    /// Word with unguessed letters masked.
    masked_word: String,
    /// Letters guessed so far.
    guessed_letters: Vec<char>,
    /// Attempts left.
    remaining_attempts: u8,
    /// Attempt budget.
    max_attempts: u8,
    /// Game is won or lost.
    is_over: bool,
    /// Game is won.
    is_won: bool,
    /// Secret word, once the game is over.
    revealed_word: Option<String>,
    /// Win notice is showing.
    show_celebration: bool,
    /// Loss notice is showing.
    show_failure: bool,
    /// Most recent failure, cleared by the next success.
    last_error: Option<ClientError>,
    /// One-line status for the player.
    status_message: String,
}

impl LocalView {
    fn overwrite(&mut self, snapshot: GameSnapshot) {
        self.initialized = true;
        self.masked_word = snapshot.masked_word;
        self.guessed_letters = snapshot.guessed_letters;
        self.remaining_attempts = snapshot.remaining_attempts;
        self.max_attempts = snapshot.max_attempts;
        self.is_over = snapshot.is_over;
        self.is_won = snapshot.is_won;
        self.revealed_word = snapshot.revealed_word;
        self.show_celebration = snapshot.is_won;
        self.show_failure = snapshot.is_over && !snapshot.is_won;
        self.last_error = None;
    }

    fn clear(&mut self) {
        *self = Self {
            status_message: "No game yet. Start one to play.".to_string(),
            ..Self::default()
        };
    }

    /// A guess may be submitted.
    pub fn accepts_guess(&self) -> bool {
        self.initialized && !self.is_over
    }

    /// Number of incorrect guesses.
    pub fn wrong_guesses(&self) -> u8 {
        self.max_attempts.saturating_sub(self.remaining_attempts)
    }

    /// Masked word with a space between glyphs, e.g. `_ a _`.
    pub fn spaced_word(&self) -> String {
        let glyphs: Vec<String> = self.masked_word.chars().map(String::from).collect();
        glyphs.join(" ")
    }

    /// Count of still-hidden letters.
    pub fn hidden_letters(&self) -> usize {
        self.masked_word.chars().filter(|&c| c == MASK_GLYPH).count()
    }
}

/// Drives one player's game through a backend and keeps a [`LocalView`].
///
/// Every operation borrows the reconciler mutably, so at most one request is
/// outstanding at a time.
#[derive(Debug)]
pub struct Reconciler<B> {
    backend: B,
    session: PlayerSession,
    view: LocalView,
}

impl<B: GameBackend> Reconciler<B> {
    /// Creates a reconciler with an uninitialized view.
    pub fn new(backend: B, session: PlayerSession) -> Self {
        Self {
            backend,
            session,
            view: LocalView::default(),
        }
    }

    /// Current display state.
    pub fn view(&self) -> &LocalView {
        &self.view
    }

    /// Identity this reconciler acts as.
    pub fn session(&self) -> &PlayerSession {
        &self.session
    }

    /// Underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn fail(&mut self, err: ClientError) -> Result<(), ClientError> {
        warn!(error = %err, "Request failed; view left unchanged");
        self.view.status_message = err.to_string();
        self.view.last_error = Some(err.clone());
        Err(err)
    }

    fn accept(&mut self, snapshot: GameSnapshot) {
        debug!(
            masked_word = %snapshot.masked_word,
            remaining_attempts = snapshot.remaining_attempts,
            is_over = snapshot.is_over,
            "Applying authoritative snapshot"
        );
        let message = match (snapshot.is_won, snapshot.is_over, &snapshot.revealed_word) {
            (true, _, Some(word)) => format!("Congratulations! You guessed \"{}\".", word),
            (true, _, None) => "Congratulations! You guessed the word.".to_string(),
            (false, true, Some(word)) => format!("Game over! The word was \"{}\".", word),
            (false, true, None) => "Game over!".to_string(),
            (false, false, _) => format!(
                "{} attempt(s) left.",
                snapshot.remaining_attempts
            ),
        };
        self.view.overwrite(snapshot);
        self.view.status_message = message;
    }

    /// Loads the authoritative game, clearing the view if none exists.
    ///
    /// # Errors
    ///
    /// Returns any failure other than [`ClientError::NotFound`].
    #[instrument(skip(self), fields(player_id = %self.session.player_id()))]
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.backend.fetch_state(self.session.player_id()).await {
            Ok(snapshot) => {
                self.accept(snapshot);
                Ok(())
            }
            Err(ClientError::NotFound) => {
                info!("No game on record; view needs initialization");
                self.view.clear();
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Starts a game.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadyActive`] if a game is in progress, or
    /// any transport failure. On `AlreadyActive` the game in progress is
    /// fetched and shown, so the player can carry on with it.
    #[instrument(skip(self), fields(player_id = %self.session.player_id()))]
    pub async fn start(&mut self) -> Result<(), ClientError> {
        match self.backend.start_game(self.session.player_id()).await {
            Ok(snapshot) => {
                info!("Game started");
                self.accept(snapshot);
                self.view.status_message = "New game started. Guess a letter.".to_string();
                Ok(())
            }
            Err(ClientError::AlreadyActive) => {
                match self.backend.fetch_state(self.session.player_id()).await {
                    Ok(snapshot) => {
                        info!("Resuming game in progress");
                        self.accept(snapshot);
                    }
                    Err(e) => warn!(error = %e, "Could not load the game in progress"),
                }
                self.fail(ClientError::AlreadyActive)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Submits one guess.
    ///
    /// Malformed input, a finished game, or a letter the view already shows
    /// as guessed never reach the backend.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidGuess`] for input that is not one letter
    /// - [`ClientError::NotFound`] before any game is loaded
    /// - [`ClientError::GameOver`] once the game is finished
    /// - any failure reported by the backend
    #[instrument(skip(self), fields(player_id = %self.session.player_id()))]
    pub async fn guess(&mut self, input: &str) -> Result<(), ClientError> {
        let letter = match Letter::parse(input) {
            Ok(letter) => letter,
            Err(_) => return self.fail(ClientError::InvalidGuess(input.to_string())),
        };
        if !self.view.initialized {
            return self.fail(ClientError::NotFound);
        }
        if self.view.is_over {
            return self.fail(ClientError::GameOver);
        }
        if self.view.guessed_letters.contains(&letter.as_char()) {
            debug!(%letter, "Letter already guessed; not resending");
            self.view.status_message = format!("You already guessed '{}'.", letter);
            return Ok(());
        }

        let letter = letter.to_string();
        match self
            .backend
            .make_guess(self.session.player_id(), &letter)
            .await
        {
            Ok(snapshot) => {
                self.accept(snapshot);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Replaces the game with a fresh one.
    ///
    /// # Errors
    ///
    /// Returns any failure reported by the backend.
    #[instrument(skip(self), fields(player_id = %self.session.player_id()))]
    pub async fn reset(&mut self) -> Result<(), ClientError> {
        match self.backend.reset_game(self.session.player_id()).await {
            Ok(snapshot) => {
                info!("Game reset");
                self.accept(snapshot);
                self.view.status_message = "Game reset. Guess a letter.".to_string();
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Hides the win or loss notice.
    pub fn dismiss_notice(&mut self) {
        self.view.show_celebration = false;
        self.view.show_failure = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(masked: &str, remaining: u8, over: bool, won: bool) -> GameSnapshot {
        GameSnapshot {
            player_id: crate::games::hangman::PlayerId::new("p1").unwrap(),
            masked_word: masked.to_string(),
            word_length: masked.len(),
            guessed_letters: vec!['a'],
            remaining_attempts: remaining,
            max_attempts: 6,
            is_over: over,
            is_won: won,
            revealed_word: over.then(|| "cat".to_string()),
        }
    }

    #[test]
    fn test_overwrite_sets_flags_from_snapshot() {
        let mut view = LocalView::default();
        view.overwrite(snapshot("cat", 6, true, true));
        assert!(view.show_celebration);
        assert!(!view.show_failure);

        view.overwrite(snapshot("_a_", 0, true, false));
        assert!(!view.show_celebration);
        assert!(view.show_failure);
        assert_eq!(view.revealed_word.as_deref(), Some("cat"));
    }

    #[test]
    fn test_spaced_word_and_hidden_count() {
        let mut view = LocalView::default();
        view.overwrite(snapshot("_a_", 5, false, false));
        assert_eq!(view.spaced_word(), "_ a _");
        assert_eq!(view.hidden_letters(), 2);
        assert_eq!(view.wrong_guesses(), 1);
        assert!(view.accepts_guess());
    }

    #[test]
    fn test_clear_resets_to_uninitialized() {
        let mut view = LocalView::default();
        view.overwrite(snapshot("_a_", 5, false, false));
        view.clear();
        assert!(!view.initialized);
        assert!(view.masked_word.is_empty());
        assert!(!view.accepts_guess());
    }
}
