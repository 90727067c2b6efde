//! Contract-based validation for hangman.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P(state, guess)} resolve {Q(before, after)}.

use super::action::GuessError;
use super::{GameState, Letter};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), GuessError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), GuessError>;
}

// ─────────────────────────────────────────────────────────────
//  Invariants
// ─────────────────────────────────────────────────────────────

/// Violation of a state invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A logical property that must hold for every reachable game state.
pub trait Invariant {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &GameState) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// The attempt budget is positive and never exceeded.
pub struct BudgetBounded;

impl Invariant for BudgetBounded {
    fn holds(state: &GameState) -> bool {
        state.max_attempts() > 0 && state.remaining_attempts() <= state.max_attempts()
    }

    fn description() -> &'static str {
        "remaining attempts must lie within a positive budget"
    }
}

/// Every attempt spent corresponds to exactly one missed letter.
pub struct AttemptsMatchMisses;

impl Invariant for AttemptsMatchMisses {
    fn holds(state: &GameState) -> bool {
        let misses = state.missed_letters().count();
        misses == usize::from(state.wrong_guesses())
    }

    fn description() -> &'static str {
        "attempts spent must equal the number of missed letters"
    }
}

/// A game is never both won and out of attempts.
///
/// The budget only reaches zero on a miss, and that miss ends the game. A
/// won game with nothing left therefore took a guess after it was lost.
pub struct NoWinAfterLoss;

impl Invariant for NoWinAfterLoss {
    fn holds(state: &GameState) -> bool {
        !(state.is_won() && state.remaining_attempts() == 0)
    }

    fn description() -> &'static str {
        "a game cannot be won after its budget is exhausted"
    }
}

// ─────────────────────────────────────────────────────────────
//  Guess Contract
// ─────────────────────────────────────────────────────────────

/// Contract for guess actions.
///
/// Preconditions:
/// - Game is not over
///
/// Postconditions:
/// - State invariants hold
/// - Guessed letters only grow
/// - Remaining attempts only shrink, by at most one
/// - A terminal state is never modified
pub struct GuessContract;

impl GuessContract {
    /// Checks every state invariant, collecting all violations.
    #[instrument(skip(state))]
    pub fn check_state(state: &GameState) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<BudgetBounded>(state, &mut violations);
        check::<AttemptsMatchMisses>(state, &mut violations);
        check::<NoWinAfterLoss>(state, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            warn!(count = violations.len(), "Game state invariants violated");
            Err(violations)
        }
    }
}

fn check<I: Invariant>(state: &GameState, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

impl Contract<GameState, Letter> for GuessContract {
    fn pre(state: &GameState, _letter: &Letter) -> Result<(), GuessError> {
        if state.is_over() {
            Err(GuessError::GameOver)
        } else {
            Ok(())
        }
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), GuessError> {
        GuessContract::check_state(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            GuessError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })?;

        if before.secret_word() != after.secret_word() {
            return Err(GuessError::InvariantViolation(
                "secret word changed mid-game".to_string(),
            ));
        }
        if !before.guessed_letters().is_subset(after.guessed_letters()) {
            return Err(GuessError::InvariantViolation(
                "guessed letters shrank".to_string(),
            ));
        }
        let spent = before
            .remaining_attempts()
            .checked_sub(after.remaining_attempts());
        if !matches!(spent, Some(0 | 1)) {
            return Err(GuessError::InvariantViolation(format!(
                "remaining attempts went from {} to {}",
                before.remaining_attempts(),
                after.remaining_attempts()
            )));
        }
        if before.is_over() && before != after {
            return Err(GuessError::InvariantViolation(
                "terminal state was modified".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hangman::SecretWord;

    fn game(word: &str, max: u8) -> GameState {
        GameState::new(SecretWord::new(word).unwrap(), max)
    }

    fn letter(c: &str) -> Letter {
        Letter::parse(c).unwrap()
    }

    #[test]
    fn test_precondition_open_game() {
        assert!(GuessContract::pre(&game("cat", 6), &letter("c")).is_ok());
    }

    #[test]
    fn test_precondition_rejects_terminal_game() {
        let mut state = game("cat", 1);
        state.record_guess(letter("z"));
        assert_eq!(
            GuessContract::pre(&state, &letter("c")),
            Err(GuessError::GameOver)
        );
    }

    #[test]
    fn test_postcondition_holds_after_miss() {
        let before = game("cat", 6);
        let mut after = before.clone();
        after.record_guess(letter("q"));
        assert!(GuessContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_double_charge() {
        let before = game("cat", 6);
        let mut after = before.clone();
        after.record_guess(letter("q"));
        after.record_guess(letter("r"));
        assert!(matches!(
            GuessContract::post(&before, &after),
            Err(GuessError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_fresh_game_satisfies_invariants() {
        assert!(GuessContract::check_state(&game("rust", 6)).is_ok());
    }

    #[test]
    fn test_win_after_exhausted_budget_violates_invariants() {
        let mut state = game("cat", 1);
        for l in ["x", "c", "a", "t"] {
            state.record_guess(letter(l));
        }
        assert!(state.is_won());
        let violations = GuessContract::check_state(&state).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].description, NoWinAfterLoss::description());
    }

    #[test]
    fn test_zero_budget_violates_invariants() {
        let violations = GuessContract::check_state(&game("rust", 0)).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].description, BudgetBounded::description());
    }
}
