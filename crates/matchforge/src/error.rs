//! Unified error type for Matchforge.

use matchforge_draft::DraftError;
use matchforge_protocol::ProtocolError;
use matchforge_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MatchforgeError {
    /// An encode/decode or format-name error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The intent was rejected by the draft engine. Nothing was written.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// The store rejected or couldn't perform the write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The roster collaborator couldn't list the room's players.
    #[error("roster unavailable: {0}")]
    Roster(String),
}

impl MatchforgeError {
    /// Returns `true` if recomputing the intent from a fresh session may
    /// succeed. Only version conflicts qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchforge_protocol::{RoomId, Step};
    use matchforge_store::Version;

    #[test]
    fn test_from_draft_error() {
        let err: MatchforgeError = DraftError::IllegalTransition {
            from: Step::Config,
            to: Step::Ban,
        }
        .into();
        assert!(matches!(err, MatchforgeError::Draft(_)));
        assert_eq!(err.to_string(), "illegal transition from config to ban");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_store_conflict_is_retryable() {
        let err: MatchforgeError = StoreError::VersionConflict {
            room_id: RoomId::new("R"),
            expected: Version::new(1),
            actual: Version::new(2),
        }
        .into();
        assert!(matches!(err, MatchforgeError::Store(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_store_not_found_is_not_retryable() {
        let err: MatchforgeError = StoreError::NotFound(RoomId::new("R")).into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_protocol_error() {
        let err: MatchforgeError = ProtocolError::UnknownFormat("6v6".into()).into();
        assert!(matches!(err, MatchforgeError::Protocol(_)));
        assert!(err.to_string().contains("6v6"));
    }
}
