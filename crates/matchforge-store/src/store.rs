//! The shared state store abstraction.
//!
//! The draft engine never talks to a database. It depends on the
//! [`SharedStateStore`] trait: read the current session, create it once,
//! write a new value conditioned on the version it was computed from, and
//! subscribe to every accepted write.
//!
//! # Why versions?
//!
//! Every transition recomputes the whole session from the value the
//! client last observed. Two captains racing for the same turn slot would
//! otherwise both compute from the same base, and the second write would
//! silently erase the first. A write carries the version it was computed
//! from, and the store rejects it with
//! [`StoreError::VersionConflict`] if anything was accepted in between.

use std::fmt;
use std::future::Future;

use matchforge_protocol::{MatchSession, RoomId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::StoreError;

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// Revision of a room's session. Starts at 1 on creation and increases by
/// one on every accepted write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// The version of a freshly created session.
    pub const INITIAL: Self = Self(1);

    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The version after one more accepted write.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A session together with the version the store holds it at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub session: MatchSession,
    pub version: Version,
}

// ---------------------------------------------------------------------------
// SharedStateStore
// ---------------------------------------------------------------------------

/// Trait for the storage and change-notification backend.
///
/// Implement this over whatever keeps the canonical session per room (a
/// realtime database, a key-value store with a change feed, ...). The
/// crate ships [`MemoryStore`](crate::MemoryStore) for single-process use
/// and tests.
///
/// Writes from one caller must be applied in the order they are issued.
///
/// # Example
///
/// ```rust
/// use matchforge_protocol::{MatchFormat, MatchSession, RoomId, TeamFormat};
/// use matchforge_store::{MemoryStore, SharedStateStore, StoreConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), matchforge_store::StoreError> {
/// let store = MemoryStore::new(StoreConfig::default());
/// let room = RoomId::new("K7QX2M");
/// let session = MatchSession::empty(
///     room.clone(),
///     TeamFormat::FiveVFive,
///     MatchFormat::Md1,
///     "Team A",
///     "Team B",
///     ["mirage", "inferno"],
/// );
///
/// let created = store.create(session).await?;
/// let read = store.read(&room).await?;
/// assert_eq!(created, read);
/// # Ok(())
/// # }
/// ```
pub trait SharedStateStore: Send + Sync + 'static {
    /// Returns the current session of a room.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the room has no session yet.
    fn read(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<StoredSession, StoreError>> + Send;

    /// Creates the session of `initial.room_id`.
    ///
    /// If another caller created it first, returns the existing record
    /// unchanged instead of failing.
    fn create(
        &self,
        initial: MatchSession,
    ) -> impl Future<Output = Result<StoredSession, StoreError>> + Send;

    /// Replaces the session of `room_id` with `session`.
    ///
    /// With `expected = Some(v)` the write is accepted only if the store
    /// is still at `v`; `None` writes unconditionally.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if the room has no session.
    /// - [`StoreError::VersionConflict`] if the store moved past `expected`.
    /// - [`StoreError::RoomMismatch`] if `session` belongs to another room.
    fn write(
        &self,
        room_id: &RoomId,
        session: MatchSession,
        expected: Option<Version>,
    ) -> impl Future<Output = Result<StoredSession, StoreError>> + Send;

    /// Subscribes to every accepted write of a room, including the
    /// subscriber's own. Creation counts as a write.
    fn subscribe(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<Subscription, StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A stream of accepted writes for one room.
///
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    room_id: RoomId,
    receiver: broadcast::Receiver<StoredSession>,
}

impl Subscription {
    pub fn new(room_id: RoomId, receiver: broadcast::Receiver<StoredSession>) -> Self {
        Self { room_id, receiver }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Waits for the next accepted write.
    ///
    /// A subscriber that fell behind skips the records it missed and
    /// resumes with the oldest one still buffered; every record carries
    /// the full session, so nothing is lost but intermediate states.
    /// Returns `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<StoredSession> {
        loop {
            match self.receiver.recv().await {
                Ok(record) => return Some(record),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        room_id = %self.room_id,
                        skipped,
                        "subscription lagged, skipping ahead"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering_and_next() {
        let v = Version::INITIAL;
        assert_eq!(v.get(), 1);
        assert_eq!(v.next(), Version::new(2));
        assert!(v.next() > v);
        assert_eq!(v.to_string(), "v1");
    }

    #[test]
    fn test_version_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Version::new(7)).unwrap(), "7");
    }

    #[tokio::test]
    async fn test_subscription_skips_lagged_records() {
        let (tx, rx) = broadcast::channel(2);
        let mut sub = Subscription::new(RoomId::new("R"), rx);
        let session = MatchSession::empty(
            RoomId::new("R"),
            Default::default(),
            Default::default(),
            "A",
            "B",
            ["mirage"],
        );
        for v in 1..=5 {
            tx.send(StoredSession {
                session: session.clone(),
                version: Version::new(v),
            })
            .unwrap();
        }

        // Capacity 2: versions 1-3 were overwritten.
        assert_eq!(sub.recv().await.unwrap().version, Version::new(4));
        assert_eq!(sub.recv().await.unwrap().version, Version::new(5));

        drop(tx);
        assert!(sub.recv().await.is_none());
    }
}
