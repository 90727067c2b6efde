mod action;
mod contracts;
mod rules;
mod types;

pub use action::{GuessError, GuessOutcome};
pub use contracts::{
    AttemptsMatchMisses, BudgetBounded, Contract, GuessContract, Invariant, InvariantViolation,
    NoWinAfterLoss,
};
pub use rules::{classify, resolve, resolve_letter};
pub use types::{
    GameState, GameStatus, InvalidPlayerId, InvalidWord, Letter, MASK_GLYPH, PlayerId, SecretWord,
};
