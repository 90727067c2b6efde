//! Turn resolution for hangman.
//!
//! Pure functions mapping a game state and a guess to the next state. They
//! hold no state of their own and perform no I/O, so the same rules serve
//! the authoritative store and any local preview.

use super::action::{GuessError, GuessOutcome};
use super::contracts::{Contract, GuessContract};
use super::{GameState, Letter};
use tracing::{debug, instrument};

/// Resolves raw guess input against a game state.
///
/// # Errors
///
/// - [`GuessError::InvalidGuess`] if `input` is not exactly one alphabetic
///   character. Checked first, so malformed input never reports `GameOver`.
/// - [`GuessError::GameOver`] if the game is already won or lost.
///
/// On error the caller's state is untouched; it is borrowed, never mutated.
#[instrument(skip(state), fields(status = %state.status()))]
pub fn resolve(state: &GameState, input: &str) -> Result<GameState, GuessError> {
    let letter = Letter::parse(input)?;
    resolve_letter(state, letter)
}

/// Resolves an already validated letter against a game state.
///
/// A letter guessed before yields an identical state and costs nothing. A new
/// letter is recorded; if it is absent from the word one attempt is spent.
///
/// # Errors
///
/// Returns [`GuessError::GameOver`] if the game is already won or lost.
#[instrument(skip(state), fields(letter = %letter))]
pub fn resolve_letter(state: &GameState, letter: Letter) -> Result<GameState, GuessError> {
    GuessContract::pre(state, &letter)?;

    if state.has_guessed(letter) {
        debug!("Repeated guess absorbed");
        return Ok(state.clone());
    }

    let mut next = state.clone();
    next.record_guess(letter);

    #[cfg(debug_assertions)]
    GuessContract::post(state, &next)?;

    debug!(
        remaining_attempts = next.remaining_attempts(),
        status = %next.status(),
        "Guess resolved"
    );
    Ok(next)
}

/// Classifies a letter against a state without applying it.
///
/// # Errors
///
/// Returns [`GuessError::GameOver`] if the game is already won or lost.
pub fn classify(state: &GameState, letter: Letter) -> Result<GuessOutcome, GuessError> {
    GuessContract::pre(state, &letter)?;
    Ok(if state.has_guessed(letter) {
        GuessOutcome::Repeat(letter)
    } else if state.secret_word().contains(letter) {
        GuessOutcome::Hit(letter)
    } else {
        GuessOutcome::Miss(letter)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hangman::{GameStatus, SecretWord};

    fn game(word: &str, max: u8) -> GameState {
        GameState::new(SecretWord::new(word).unwrap(), max)
    }

    fn play(state: &GameState, guesses: &str) -> GameState {
        guesses.chars().fold(state.clone(), |s, c| {
            resolve(&s, &c.to_string()).expect("guess accepted")
        })
    }

    #[test]
    fn test_hit_keeps_budget() {
        let next = resolve(&game("cat", 6), "a").unwrap();
        assert_eq!(next.remaining_attempts(), 6);
        assert!(next.has_guessed(Letter::parse("a").unwrap()));
    }

    #[test]
    fn test_miss_spends_one_attempt() {
        let next = resolve(&game("cat", 6), "z").unwrap();
        assert_eq!(next.remaining_attempts(), 5);
        assert_eq!(next.wrong_guesses(), 1);
    }

    #[test]
    fn test_uppercase_input_counts_as_lowercase() {
        let next = resolve(&game("cat", 6), "C").unwrap();
        assert_eq!(next.masked_word(), "c__");
    }

    #[test]
    fn test_repeat_miss_is_free() {
        let once = resolve(&game("cat", 6), "z").unwrap();
        let twice = resolve(&once, "z").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_input_reported_before_game_over() {
        let lost = play(&game("cat", 1), "z");
        assert!(lost.is_over());
        assert!(matches!(resolve(&lost, "12"), Err(GuessError::InvalidGuess(_))));
        assert_eq!(resolve(&lost, "c"), Err(GuessError::GameOver));
    }

    #[test]
    fn test_repeated_letters_in_word_revealed_together() {
        let next = play(&game("banana", 6), "an");
        assert_eq!(next.masked_word(), "_anana");
        assert_eq!(next.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_classify() {
        let state = play(&game("cat", 6), "c");
        let c = Letter::parse("c").unwrap();
        let a = Letter::parse("a").unwrap();
        let q = Letter::parse("q").unwrap();
        assert_eq!(classify(&state, c), Ok(GuessOutcome::Repeat(c)));
        assert_eq!(classify(&state, a), Ok(GuessOutcome::Hit(a)));
        assert_eq!(classify(&state, q), Ok(GuessOutcome::Miss(q)));
        assert!(GuessOutcome::Miss(q).costs_attempt());
    }
}
