//! Secret word selection.

use crate::games::hangman::{InvalidWord, SecretWord};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// Words used when the configuration does not supply any.
pub const DEFAULT_WORDS: &[&str] = &[
    "blockchain", "contract", "ledger", "wallet", "validator", "consensus", "oracle", "token",
    "account", "signature", "transaction", "module", "resource", "gallows", "hangman", "puzzle",
    "rustacean", "borrow", "lifetime", "compiler",
];

/// Supplies one secret word per game start.
pub trait WordSource: Send + Sync + std::fmt::Debug {
    /// Picks the word for a new game.
    fn next_word(&self) -> SecretWord;
}

/// Picks uniformly at random from a fixed list of words.
#[derive(Debug)]
pub struct RandomWords {
    words: Vec<SecretWord>,
    rng: Mutex<StdRng>,
}

impl RandomWords {
    /// Builds a source from candidate words, seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWord`] for the first unusable word, or for an empty
    /// list (reported as the empty word).
    #[instrument(skip(words))]
    pub fn new<I, S>(words: I) -> Result<Self, InvalidWord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rng(words, StdRng::from_os_rng())
    }

    /// Builds a source with a fixed seed, for reproducible word sequences.
    ///
    /// # Errors
    ///
    /// Same as [`RandomWords::new`].
    pub fn seeded<I, S>(words: I, seed: u64) -> Result<Self, InvalidWord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rng(words, StdRng::seed_from_u64(seed))
    }

    fn with_rng<I, S>(words: I, rng: StdRng) -> Result<Self, InvalidWord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(SecretWord::new)
            .collect::<Result<Vec<_>, _>>()?;
        if words.is_empty() {
            return Err(InvalidWord(String::new()));
        }
        info!(count = words.len(), "Word list loaded");
        Ok(Self {
            words,
            rng: Mutex::new(rng),
        })
    }

    /// Number of candidate words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for RandomWords {
    fn next_word(&self) -> SecretWord {
        // A poisoned lock only means another picker panicked; the rng is still usable.
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let word = self
            .words
            .choose(&mut *rng)
            .unwrap_or(&self.words[0])
            .clone();
        debug!(word_length = word.len(), "Picked secret word");
        word
    }
}

/// Always supplies the same word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedWord(SecretWord);

impl FixedWord {
    /// Creates a source that always yields `word`.
    pub fn new(word: SecretWord) -> Self {
        Self(word)
    }
}

impl WordSource for FixedWord {
    fn next_word(&self) -> SecretWord {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_words_are_valid() {
        let source = RandomWords::new(DEFAULT_WORDS.iter().copied()).expect("valid words");
        assert_eq!(source.len(), DEFAULT_WORDS.len());
    }

    #[test]
    fn test_rejects_empty_list() {
        assert!(RandomWords::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_rejects_bad_word() {
        let err = RandomWords::new(["fine", "Not Fine"]).unwrap_err();
        assert_eq!(err, InvalidWord("Not Fine".to_string()));
    }

    #[test]
    fn test_seeded_sources_agree() {
        let a = RandomWords::seeded(DEFAULT_WORDS.iter().copied(), 7).unwrap();
        let b = RandomWords::seeded(DEFAULT_WORDS.iter().copied(), 7).unwrap();
        let left: Vec<_> = (0..10).map(|_| a.next_word()).collect();
        let right: Vec<_> = (0..10).map(|_| b.next_word()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_picks_come_from_list() {
        let source = RandomWords::seeded(["alpha", "beta"], 1).unwrap();
        for _ in 0..20 {
            let word = source.next_word();
            assert!(["alpha", "beta"].contains(&word.as_str()));
        }
    }
}
