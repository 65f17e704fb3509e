//! In-memory store: a single Tokio task that owns every room's record.
//!
//! All commands go through one bounded channel and are handled one at a
//! time, so version checks and the writes they guard can't interleave.
//! Records are kept encoded with the store's [`Codec`], the same way a
//! remote backend would hold them.

use std::collections::HashMap;

use matchforge_protocol::{Codec, JsonCodec, MatchSession, RoomId};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{SharedStateStore, StoreConfig, StoreError, StoredSession, Subscription, Version};

type Reply<T> = oneshot::Sender<Result<T, StoreError>>;

enum StoreCommand {
    Read {
        room_id: RoomId,
        reply: Reply<StoredSession>,
    },
    Create {
        initial: MatchSession,
        reply: Reply<StoredSession>,
    },
    Write {
        room_id: RoomId,
        session: MatchSession,
        expected: Option<Version>,
        reply: Reply<StoredSession>,
    },
    Subscribe {
        room_id: RoomId,
        reply: oneshot::Sender<broadcast::Receiver<StoredSession>>,
    },
}

/// Handle to the in-memory store task.
///
/// Cheap to clone; every clone talks to the same task. The task stops once
/// the last handle is dropped, which closes every open subscription.
#[derive(Clone)]
pub struct MemoryStore {
    sender: mpsc::Sender<StoreCommand>,
}

impl MemoryStore {
    /// Spawns a store that keeps records as JSON.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_codec(config, JsonCodec)
    }

    /// Spawns a store that keeps records encoded with `codec`.
    pub fn with_codec<C: Codec>(config: StoreConfig, codec: C) -> Self {
        let (tx, rx) = mpsc::channel(config.command_channel_size);
        let actor = StoreActor {
            codec,
            notify_capacity: config.notify_capacity,
            records: HashMap::new(),
            watchers: HashMap::new(),
            receiver: rx,
        };
        tokio::spawn(actor.run());
        Self { sender: tx }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> StoreCommand,
    ) -> Result<T, StoreError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| StoreError::Unavailable("store task stopped".into()))?;
        reply_rx
            .await
            .map_err(|_| StoreError::Unavailable("store task dropped the request".into()))?
    }
}

impl SharedStateStore for MemoryStore {
    async fn read(&self, room_id: &RoomId) -> Result<StoredSession, StoreError> {
        let room_id = room_id.clone();
        self.request(|reply| StoreCommand::Read { room_id, reply }).await
    }

    async fn create(&self, initial: MatchSession) -> Result<StoredSession, StoreError> {
        self.request(|reply| StoreCommand::Create { initial, reply }).await
    }

    async fn write(
        &self,
        room_id: &RoomId,
        session: MatchSession,
        expected: Option<Version>,
    ) -> Result<StoredSession, StoreError> {
        let room_id = room_id.clone();
        self.request(|reply| StoreCommand::Write {
            room_id,
            session,
            expected,
            reply,
        })
        .await
    }

    async fn subscribe(&self, room_id: &RoomId) -> Result<Subscription, StoreError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(StoreCommand::Subscribe {
                room_id: room_id.clone(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| StoreError::Unavailable("store task stopped".into()))?;
        let receiver = reply_rx
            .await
            .map_err(|_| StoreError::Unavailable("store task dropped the request".into()))?;
        Ok(Subscription::new(room_id.clone(), receiver))
    }
}

struct Record {
    bytes: Vec<u8>,
    version: Version,
}

struct StoreActor<C: Codec> {
    codec: C,
    notify_capacity: usize,
    records: HashMap<RoomId, Record>,
    /// Per-room notification channels. Created on first subscribe or
    /// create, whichever comes first.
    watchers: HashMap<RoomId, broadcast::Sender<StoredSession>>,
    receiver: mpsc::Receiver<StoreCommand>,
}

impl<C: Codec> StoreActor<C> {
    async fn run(mut self) {
        tracing::debug!("store task started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                StoreCommand::Read { room_id, reply } => {
                    let _ = reply.send(self.handle_read(&room_id));
                }
                StoreCommand::Create { initial, reply } => {
                    let _ = reply.send(self.handle_create(initial));
                }
                StoreCommand::Write {
                    room_id,
                    session,
                    expected,
                    reply,
                } => {
                    let _ = reply.send(self.handle_write(room_id, session, expected));
                }
                StoreCommand::Subscribe { room_id, reply } => {
                    let _ = reply.send(self.watcher(&room_id).subscribe());
                }
            }
        }

        tracing::debug!(rooms = self.records.len(), "store task stopped");
    }

    fn handle_read(&self, room_id: &RoomId) -> Result<StoredSession, StoreError> {
        let record = self
            .records
            .get(room_id)
            .ok_or_else(|| StoreError::NotFound(room_id.clone()))?;
        self.decode(record)
    }

    fn handle_create(&mut self, initial: MatchSession) -> Result<StoredSession, StoreError> {
        if let Some(existing) = self.records.get(&initial.room_id) {
            tracing::debug!(room_id = %initial.room_id, "session already exists");
            return self.decode(existing);
        }

        let room_id = initial.room_id.clone();
        let stored = self.store(room_id.clone(), &initial, Version::INITIAL)?;
        tracing::info!(room_id = %room_id, version = %stored.version, "session created");
        self.notify(&room_id, &stored);
        Ok(stored)
    }

    fn handle_write(
        &mut self,
        room_id: RoomId,
        session: MatchSession,
        expected: Option<Version>,
    ) -> Result<StoredSession, StoreError> {
        if session.room_id != room_id {
            tracing::warn!(
                room_id = %room_id,
                record = %session.room_id,
                "write rejected: room mismatch"
            );
            return Err(StoreError::RoomMismatch {
                key: room_id,
                record: session.room_id,
            });
        }

        let current = self
            .records
            .get(&room_id)
            .map(|r| r.version)
            .ok_or_else(|| StoreError::NotFound(room_id.clone()))?;

        if let Some(expected) = expected {
            if expected != current {
                tracing::warn!(
                    room_id = %room_id,
                    %expected,
                    actual = %current,
                    "write rejected: version conflict"
                );
                return Err(StoreError::VersionConflict {
                    room_id,
                    expected,
                    actual: current,
                });
            }
        }

        let stored = self.store(room_id.clone(), &session, current.next())?;
        tracing::info!(
            room_id = %room_id,
            version = %stored.version,
            step = %stored.session.current_step,
            "session written"
        );
        self.notify(&room_id, &stored);
        Ok(stored)
    }

    /// Encodes and keeps `session`, returning it as decoded back from the
    /// stored bytes.
    fn store(
        &mut self,
        room_id: RoomId,
        session: &MatchSession,
        version: Version,
    ) -> Result<StoredSession, StoreError> {
        let bytes = self.codec.encode(session)?;
        let record = Record { bytes, version };
        let stored = self.decode(&record)?;
        self.records.insert(room_id, record);
        Ok(stored)
    }

    fn decode(&self, record: &Record) -> Result<StoredSession, StoreError> {
        Ok(StoredSession {
            session: self.codec.decode(&record.bytes)?,
            version: record.version,
        })
    }

    fn watcher(&mut self, room_id: &RoomId) -> &broadcast::Sender<StoredSession> {
        let capacity = self.notify_capacity;
        self.watchers
            .entry(room_id.clone())
            .or_insert_with(|| broadcast::channel(capacity).0)
    }

    fn notify(&mut self, room_id: &RoomId, stored: &StoredSession) {
        // No subscribers is not an error.
        let _ = self.watcher(room_id).send(stored.clone());
    }
}
