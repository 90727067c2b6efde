//! Player identity context for client sessions.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::games::hangman::{InvalidPlayerId, PlayerId};

/// Identity a client acts as.
///
/// Passed explicitly to everything that talks to the store; there is no
/// process-wide "current player".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PlayerSession {
    /// Player the session acts for.
    player_id: PlayerId,
}

impl PlayerSession {
    /// Opens a session for a validated player id.
    #[instrument(skip_all, fields(player_id = %player_id))]
    pub fn new(player_id: PlayerId) -> Self {
        info!("Opening player session");
        Self { player_id }
    }

    /// Opens a session from a raw id string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPlayerId`] if the id is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_.-]`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidPlayerId> {
        PlayerId::new(raw).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        let session = PlayerSession::parse("alice-01").unwrap();
        assert_eq!(session.player_id().as_str(), "alice-01");
    }

    #[test]
    fn test_parse_rejects_bad_id() {
        assert!(PlayerSession::parse("").is_err());
        assert!(PlayerSession::parse("has space").is_err());
    }
}
