//! Core domain types for hangman.

use super::action::GuessError;
use super::contracts::{GuessContract, InvariantViolation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;

/// Placeholder glyph for letters that have not been guessed yet.
pub const MASK_GLYPH: char = '_';

/// A single guessable letter, always ASCII lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Letter(char);

impl Letter {
    /// Parses raw player input into a letter.
    ///
    /// The input must be exactly one ASCII alphabetic character. Uppercase
    /// input is folded to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`GuessError::InvalidGuess`] for anything else, including empty
    /// input, multiple characters, digits and non-ASCII letters.
    #[instrument]
    pub fn parse(input: &str) -> Result<Self, GuessError> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(GuessError::InvalidGuess(input.to_string())),
        }
    }

    /// Returns the letter as a `char`.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl TryFrom<char> for Letter {
    type Error = GuessError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii_alphabetic() {
            Ok(Self(c.to_ascii_lowercase()))
        } else {
            Err(GuessError::InvalidGuess(c.to_string()))
        }
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> Self {
        letter.0
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The word a player is trying to guess.
///
/// Never empty and made only of ASCII lowercase letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretWord(String);

impl SecretWord {
    /// Validates a candidate secret word.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWord`] if the word is empty or contains anything
    /// other than ASCII lowercase letters.
    pub fn new(word: impl Into<String>) -> Result<Self, InvalidWord> {
        let word = word.into();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(InvalidWord(word));
        }
        Ok(Self(word))
    }

    /// Returns the word as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of letters in the word.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the letters of the word, in order, with repeats.
    pub fn letters(&self) -> impl Iterator<Item = Letter> + '_ {
        self.0.chars().map(Letter)
    }

    /// Checks whether the word contains the letter.
    pub fn contains(&self, letter: Letter) -> bool {
        self.0.contains(letter.as_char())
    }
}

impl TryFrom<String> for SecretWord {
    type Error = InvalidWord;

    fn try_from(word: String) -> Result<Self, Self::Error> {
        Self::new(word)
    }
}

impl From<SecretWord> for String {
    fn from(word: SecretWord) -> Self {
        word.0
    }
}

/// A word that cannot be used as a secret word.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invalid secret word {:?}: must be non-empty lowercase a-z", _0)]
pub struct InvalidWord(pub String);

impl std::error::Error for InvalidWord {}

/// Identity of the player owning a game.
///
/// Non-empty, at most 64 characters of ASCII alphanumerics, `_`, `-` or `.`,
/// so it is safe to embed in URL paths.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    const MAX_LEN: usize = 64;

    /// Validates a player identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPlayerId`] if the identifier is empty, too long or
    /// contains unsupported characters.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidPlayerId> {
        let id = id.into();
        let valid_chars = id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if id.is_empty() || id.len() > Self::MAX_LEN || !valid_chars {
            return Err(InvalidPlayerId(id));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = InvalidPlayerId;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player identifier that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invalid player id {:?}", _0)]
pub struct InvalidPlayerId(pub String);

impl std::error::Error for InvalidPlayerId {}

/// Current status of the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// Guesses are still accepted.
    InProgress,
    /// Every letter of the word has been guessed.
    Won,
    /// The attempt budget is exhausted.
    Lost,
}

/// Complete state of one player's game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    secret_word: SecretWord,
    guessed_letters: BTreeSet<Letter>,
    remaining_attempts: u8,
    max_attempts: u8,
}

impl GameState {
    /// Creates a fresh game with an empty guess set and a full attempt budget.
    #[instrument(skip(secret_word), fields(word_length = secret_word.len()))]
    pub fn new(secret_word: SecretWord, max_attempts: u8) -> Self {
        Self {
            secret_word,
            guessed_letters: BTreeSet::new(),
            remaining_attempts: max_attempts,
            max_attempts,
        }
    }

    /// Rebuilds a game from stored parts, checking every state invariant.
    ///
    /// # Errors
    ///
    /// Returns the violated invariants if the parts do not describe a game
    /// the turn resolver could have produced.
    #[instrument(skip(secret_word, guessed_letters))]
    pub fn restore(
        secret_word: SecretWord,
        guessed_letters: BTreeSet<Letter>,
        remaining_attempts: u8,
        max_attempts: u8,
    ) -> Result<Self, Vec<InvariantViolation>> {
        let state = Self {
            secret_word,
            guessed_letters,
            remaining_attempts,
            max_attempts,
        };
        GuessContract::check_state(&state)?;
        Ok(state)
    }

    /// Returns the secret word.
    pub fn secret_word(&self) -> &SecretWord {
        &self.secret_word
    }

    /// Returns the letters guessed so far, in alphabetical order.
    pub fn guessed_letters(&self) -> &BTreeSet<Letter> {
        &self.guessed_letters
    }

    /// Returns the attempts left before the game is lost.
    pub fn remaining_attempts(&self) -> u8 {
        self.remaining_attempts
    }

    /// Returns the attempt budget the game started with.
    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    /// Number of incorrect guesses made so far.
    pub fn wrong_guesses(&self) -> u8 {
        self.max_attempts.saturating_sub(self.remaining_attempts)
    }

    /// Checks whether the letter has already been guessed.
    pub fn has_guessed(&self, letter: Letter) -> bool {
        self.guessed_letters.contains(&letter)
    }

    /// Guessed letters that are not part of the word.
    pub fn missed_letters(&self) -> impl Iterator<Item = Letter> + '_ {
        self.guessed_letters
            .iter()
            .copied()
            .filter(|l| !self.secret_word.contains(*l))
    }

    /// True once every letter of the word has been guessed.
    pub fn is_won(&self) -> bool {
        self.secret_word.letters().all(|l| self.has_guessed(l))
    }

    /// True once the game is won or the attempt budget is spent.
    pub fn is_over(&self) -> bool {
        self.is_won() || self.remaining_attempts == 0
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        if self.is_won() {
            GameStatus::Won
        } else if self.remaining_attempts == 0 {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    /// The word with every unguessed letter replaced by [`MASK_GLYPH`].
    pub fn masked_word(&self) -> String {
        self.secret_word
            .letters()
            .map(|l| {
                if self.has_guessed(l) {
                    l.as_char()
                } else {
                    MASK_GLYPH
                }
            })
            .collect()
    }

    /// Records a new guess (unchecked - use the turn resolver for validation).
    pub(super) fn record_guess(&mut self, letter: Letter) {
        self.guessed_letters.insert(letter);
        if !self.secret_word.contains(letter) {
            self.remaining_attempts = self.remaining_attempts.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_parse_folds_case() {
        assert_eq!(Letter::parse("Q").map(Letter::as_char), Ok('q'));
    }

    #[test]
    fn test_letter_parse_rejects_garbage() {
        for input in ["", "ab", "5", " ", "é", "-"] {
            assert!(
                matches!(Letter::parse(input), Err(GuessError::InvalidGuess(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_secret_word_validation() {
        assert!(SecretWord::new("rust").is_ok());
        assert!(SecretWord::new("").is_err());
        assert!(SecretWord::new("Rust").is_err());
        assert!(SecretWord::new("two words").is_err());
    }

    #[test]
    fn test_player_id_validation() {
        assert!(PlayerId::new("alice_01").is_ok());
        assert!(PlayerId::new("0xAbC.def-9").is_ok());
        assert!(PlayerId::new("").is_err());
        assert!(PlayerId::new("a/b").is_err());
        assert!(PlayerId::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_masked_word_reveals_guessed_letters() {
        let mut state = GameState::new(SecretWord::new("banana").unwrap(), 6);
        state.record_guess(Letter::parse("a").unwrap());
        assert_eq!(state.masked_word(), "_a_a_a");
        assert_eq!(state.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_restore_rejects_inconsistent_budget() {
        let word = SecretWord::new("cat").unwrap();
        let guessed: BTreeSet<_> = [Letter::parse("x").unwrap()].into_iter().collect();
        assert!(GameState::restore(word.clone(), guessed.clone(), 5, 6).is_ok());
        assert!(GameState::restore(word, guessed, 6, 6).is_err());
    }
}
