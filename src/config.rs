//! Game and service configuration.

use crate::games::hangman::SecretWord;
use crate::word_source::{DEFAULT_WORDS, RandomWords};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Largest attempt budget; a player can never miss more than 26 letters.
pub const MAX_ATTEMPT_BUDGET: u8 = 26;

/// Configuration for the game store, the relay service and its clients.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HangmanConfig {
    /// Attempts a player starts each game with.
    #[serde(default = "default_max_attempts")]
    max_attempts: u8,

    /// Candidate secret words.
    #[serde(default = "default_words")]
    words: Vec<String>,

    /// SQLite database path; in-memory storage when absent.
    #[serde(default)]
    db_path: Option<String>,

    /// Host the relay binds to.
    #[serde(default = "default_host")]
    host: String,

    /// Port the relay binds to.
    #[serde(default = "default_port")]
    port: u16,

    /// Client-side timeout for one request, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,
}

fn default_max_attempts() -> u8 {
    6
}

fn default_words() -> Vec<String> {
    DEFAULT_WORDS.iter().map(|w| w.to_string()).collect()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl Default for HangmanConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            words: default_words(),
            db_path: None,
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl HangmanConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, does not parse, or
    /// holds invalid values.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Loads configuration from a file if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`HangmanConfig::from_file`] for an existing file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text does not parse or holds invalid values.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(
            max_attempts = config.max_attempts,
            words = config.words.len(),
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Checks value ranges and the word list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid value.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ATTEMPT_BUDGET).contains(&self.max_attempts) {
            return Err(ConfigError::new(format!(
                "max_attempts must be between 1 and {}, got {}",
                MAX_ATTEMPT_BUDGET, self.max_attempts
            )));
        }
        if self.words.is_empty() {
            return Err(ConfigError::new("words must not be empty".to_string()));
        }
        for word in &self.words {
            SecretWord::new(word.as_str()).map_err(|e| ConfigError::new(e.to_string()))?;
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::new("request_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Sets the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u8) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the database path.
    pub fn with_db_path(mut self, db_path: Option<String>) -> Self {
        self.db_path = db_path;
        self
    }

    /// Sets the bind address.
    pub fn with_bind(mut self, host: String, port: u16) -> Self {
        self.host = host;
        self.port = port;
        self
    }

    /// Client request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Builds a random word source from the configured words.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the word list is unusable.
    pub fn word_source(&self) -> Result<RandomWords, ConfigError> {
        RandomWords::new(self.words.iter().cloned()).map_err(|e| ConfigError::new(e.to_string()))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HangmanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(*config.max_attempts(), 6);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = HangmanConfig::from_toml("max_attempts = 10\nwords = [\"ferris\"]\n")
            .expect("valid config");
        assert_eq!(*config.max_attempts(), 10);
        assert_eq!(config.words(), &vec!["ferris".to_string()]);
        assert_eq!(*config.port(), 3000);
        assert!(config.db_path().is_none());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        assert!(HangmanConfig::from_toml("max_attempts = 0").is_err());
    }

    #[test]
    fn test_rejects_bad_word() {
        assert!(HangmanConfig::from_toml("words = [\"Hello World\"]").is_err());
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(HangmanConfig::from_toml("max_guesses = 6").is_err());
    }
}
