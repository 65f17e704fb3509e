//! Error types for the shared state store.

use matchforge_protocol::{ProtocolError, RoomId};

use crate::Version;

/// Errors returned by a [`SharedStateStore`](crate::SharedStateStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No session has been created for this room.
    #[error("no session for {0}")]
    NotFound(RoomId),

    /// The write was based on a version that is no longer current.
    ///
    /// The caller should read the session again, recompute, and retry.
    #[error("version conflict on {room_id}: expected {expected}, store is at {actual}")]
    VersionConflict {
        room_id: RoomId,
        expected: Version,
        actual: Version,
    },

    /// The record names a different room than the key it was written under.
    #[error("session for {record} can't be written under {key}")]
    RoomMismatch { key: RoomId, record: RoomId },

    /// The store can't be reached (its task stopped, its channel closed).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A session couldn't be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] ProtocolError),
}

impl StoreError {
    /// Returns `true` for errors that a refresh-and-retry can resolve.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}
