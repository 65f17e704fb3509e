//! `DraftClient`: one participant's connection to a room's shared session.
//!
//! The client ties the draft engine to the store:
//!
//! 1. On connect it subscribes to the room, then reads the session (or
//!    creates it on first access).
//! 2. A listener task folds every store echo into a `watch` channel,
//!    keeping only versions newer than the one already observed, and
//!    re-broadcasts the [`DraftEvent`]s derived between the two.
//! 3. An intent is applied to the last observed session and written with
//!    that session's version. If someone else wrote first, the store
//!    rejects the write, the client refreshes, and the caller gets a
//!    retryable error (or [`submit_with_retry`](DraftClient::submit_with_retry)
//!    recomputes the intent against the new base).
//!
//! The store's copy is the only one that counts. The client never edits its
//! observed session in place; it only replaces it with a record the store
//! accepted.

use std::sync::Arc;

use matchforge_draft::{
    Actor, DraftEvent, DraftMachine, Intent, MapPool, can_act, current_action,
    derive_events, final_maps,
};
use matchforge_protocol::{
    ActionKind, MapId, MapState, MatchFormat, MatchSession, RoomId, SessionId, Step,
    TeamFormat, TeamSide,
};
use matchforge_store::{SharedStateStore, StoreError, StoredSession, Subscription, Version};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::{AdminDirectory, MatchforgeError, Roster};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Buffer of the event broadcast. A slow event consumer skips ahead.
    pub event_capacity: usize,

    /// How many times [`DraftClient::submit_with_retry`] recomputes an
    /// intent after a version conflict before giving up.
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            max_retries: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// The latest observed record plus the event fan-out, shared between the
/// client and its listener task.
struct Observer {
    room_id: RoomId,
    pool: MapPool,
    state: watch::Sender<StoredSession>,
    events: broadcast::Sender<DraftEvent>,
}

impl Observer {
    /// Adopts `record` if it is newer than the observed one. Returns
    /// whether it was adopted.
    fn observe(&self, record: StoredSession) -> bool {
        self.state.send_if_modified(|current| {
            if record.version <= current.version {
                return false;
            }

            let events = derive_events(Some(&current.session), &record.session, &self.pool);
            tracing::debug!(
                room_id = %self.room_id,
                version = %record.version,
                step = %record.session.current_step,
                events = events.len(),
                "observed session"
            );
            *current = record;
            for event in events {
                // No event subscribers is fine.
                let _ = self.events.send(event);
            }
            true
        })
    }
}

async fn listen(mut subscription: Subscription, observer: Arc<Observer>) {
    while let Some(record) = subscription.recv().await {
        observer.observe(record);
    }
    tracing::debug!(room_id = %observer.room_id, "store feed closed");
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for connecting a [`DraftClient`].
///
/// # Example
///
/// ```rust,no_run
/// use matchforge::prelude::*;
///
/// # async fn run() -> Result<(), MatchforgeError> {
/// let store = MemoryStore::new(StoreConfig::default());
/// let admins = SingleAdmin(SessionId::new("admin-session"));
///
/// let client = DraftClient::builder(store)
///     .config(ClientConfig::default())
///     .connect(RoomId::new("K7QX2M"), SessionId::new("admin-session"), &admins)
///     .await?;
/// assert_eq!(client.session().current_step, Step::Config);
/// # Ok(())
/// # }
/// ```
pub struct DraftClientBuilder<S: SharedStateStore> {
    store: S,
    machine: DraftMachine,
    config: ClientConfig,
}

impl<S: SharedStateStore> DraftClientBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            machine: DraftMachine::default(),
            config: ClientConfig::default(),
        }
    }

    /// Sets the draft engine (default names and formats for new rooms).
    pub fn machine(mut self, machine: DraftMachine) -> Self {
        self.machine = machine;
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Joins `room_id` as `session_id`, creating the room's session if no
    /// one has yet.
    ///
    /// Whether this session is the admin is asked once, here.
    ///
    /// # Errors
    /// Any store error other than the room not existing yet.
    pub async fn connect<A: AdminDirectory>(
        self,
        room_id: RoomId,
        session_id: SessionId,
        admins: &A,
    ) -> Result<DraftClient<S>, MatchforgeError> {
        let actor = if admins.is_admin(&session_id).await {
            Actor::admin(session_id)
        } else {
            Actor::player(session_id)
        };

        // Subscribe first so no write between the read and the
        // subscription goes unseen.
        let subscription = self.store.subscribe(&room_id).await?;
        let initial = match self.store.read(&room_id).await {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => {
                let session = self.machine.new_session(room_id.clone());
                self.store.create(session).await?
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            %room_id,
            session_id = %actor.session_id,
            admin = actor.is_admin,
            version = %initial.version,
            step = %initial.session.current_step,
            "client connected"
        );

        let (state_tx, state_rx) = watch::channel(initial);
        let (events_tx, _) = broadcast::channel(self.config.event_capacity);
        let observer = Arc::new(Observer {
            room_id: room_id.clone(),
            pool: *self.machine.pool(),
            state: state_tx,
            events: events_tx,
        });
        let listener = tokio::spawn(listen(subscription, Arc::clone(&observer)));

        Ok(DraftClient {
            room_id,
            actor,
            store: self.store,
            machine: self.machine,
            config: self.config,
            observer,
            state: state_rx,
            listener,
        })
    }
}

// ---------------------------------------------------------------------------
// DraftClient
// ---------------------------------------------------------------------------

/// One participant (admin, captain or spectator-player) in a room.
///
/// Dropping the client stops its listener task.
pub struct DraftClient<S: SharedStateStore> {
    room_id: RoomId,
    actor: Actor,
    store: S,
    machine: DraftMachine,
    config: ClientConfig,
    observer: Arc<Observer>,
    state: watch::Receiver<StoredSession>,
    listener: JoinHandle<()>,
}

impl<S: SharedStateStore> DraftClient<S> {
    pub fn builder(store: S) -> DraftClientBuilder<S> {
        DraftClientBuilder::new(store)
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn is_admin(&self) -> bool {
        self.actor.is_admin
    }

    // -- Observed state ------------------------------------------------------

    /// The last observed session.
    pub fn session(&self) -> MatchSession {
        self.state.borrow().session.clone()
    }

    /// Version of the last observed session.
    pub fn version(&self) -> Version {
        self.state.borrow().version
    }

    pub fn current_step(&self) -> Step {
        self.state.borrow().session.current_step
    }

    /// The action due next, if the draft is running.
    pub fn current_action(&self) -> Option<ActionKind> {
        current_action(&self.state.borrow().session)
    }

    /// Whether this client may ban or pick right now.
    pub fn can_act(&self) -> bool {
        can_act(&self.state.borrow().session, &self.actor)
    }

    /// The team this client captains, if any.
    pub fn captain_side(&self) -> Option<TeamSide> {
        self.state.borrow().session.captain_side(&self.actor.session_id)
    }

    /// The maps to be played, in match order.
    pub fn final_maps(&self) -> Vec<MapState> {
        final_maps(&self.state.borrow().session, self.machine.pool())
    }

    /// A receiver that sees every observed record.
    pub fn watch(&self) -> watch::Receiver<StoredSession> {
        self.state.clone()
    }

    /// Subscribes to events derived from observed records. Only events
    /// after this call are delivered.
    pub fn events(&self) -> broadcast::Receiver<DraftEvent> {
        self.observer.events.subscribe()
    }

    /// Waits until a record at `version` or later has been observed.
    ///
    /// # Errors
    /// [`StoreError::Unavailable`] if the client's state channel closed.
    pub async fn wait_for_version(
        &self,
        version: Version,
    ) -> Result<StoredSession, MatchforgeError> {
        let mut rx = self.state.clone();
        let seen = rx
            .wait_for(|record| record.version >= version)
            .await
            .map_err(|_| StoreError::Unavailable("client state closed".into()))?;
        Ok(seen.clone())
    }

    /// Reads the session from the store and adopts it if newer.
    pub async fn refresh(&self) -> Result<StoredSession, MatchforgeError> {
        let record = self.store.read(&self.room_id).await?;
        self.observer.observe(record.clone());
        Ok(record)
    }

    // -- Writing -------------------------------------------------------------

    /// Applies `intent` to the last observed session and writes the result
    /// conditioned on that session's version.
    ///
    /// On success the accepted record is adopted at once; the store's echo
    /// of it is then a no-op.
    ///
    /// # Errors
    /// - [`MatchforgeError::Draft`] if the engine rejects the intent.
    ///   Nothing is written.
    /// - A retryable [`MatchforgeError::Store`] on a version conflict. The
    ///   observed session has already been refreshed when this returns.
    pub async fn submit(&self, intent: Intent) -> Result<StoredSession, MatchforgeError> {
        let base = self.state.borrow().clone();
        let next = {
            let mut rng = rand::rng();
            self.machine.apply(&base.session, &self.actor, intent, &mut rng)?
        };

        match self.store.write(&self.room_id, next, Some(base.version)).await {
            Ok(record) => {
                self.observer.observe(record.clone());
                Ok(record)
            }
            Err(e) if e.is_conflict() => {
                tracing::warn!(
                    room_id = %self.room_id,
                    session_id = %self.actor.session_id,
                    base = %base.version,
                    "write lost a race, refreshing"
                );
                self.refresh().await?;
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`submit`](Self::submit), but recomputes the intent against the
    /// refreshed session after each version conflict, up to
    /// `max_retries` times.
    ///
    /// A recomputed intent can fail validation where the first one didn't
    /// (the turn it was meant for was taken by the winning write); that
    /// error is returned as is.
    pub async fn submit_with_retry(
        &self,
        intent: Intent,
    ) -> Result<StoredSession, MatchforgeError> {
        let mut attempt = 0;
        loop {
            match self.submit(intent.clone()).await {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        room_id = %self.room_id,
                        intent = intent.name(),
                        attempt,
                        "retrying after version conflict"
                    );
                }
                other => return other,
            }
        }
    }

    // -- Intents -------------------------------------------------------------

    pub async fn set_team_format(
        &self,
        format: TeamFormat,
    ) -> Result<StoredSession, MatchforgeError> {
        self.submit_with_retry(Intent::SetTeamFormat { format }).await
    }

    pub async fn set_match_format(
        &self,
        format: MatchFormat,
    ) -> Result<StoredSession, MatchforgeError> {
        self.submit_with_retry(Intent::SetMatchFormat { format }).await
    }

    pub async fn rename_team(
        &self,
        side: TeamSide,
        name: impl Into<String>,
    ) -> Result<StoredSession, MatchforgeError> {
        self.submit_with_retry(Intent::RenameTeam { side, name: name.into() })
            .await
    }

    /// Takes a roster snapshot and forms the teams from it.
    pub async fn create_teams<R: Roster>(
        &self,
        roster: &R,
    ) -> Result<StoredSession, MatchforgeError> {
        let players = roster.list_players(&self.room_id).await?;
        self.submit_with_retry(Intent::CreateTeams { roster: players }).await
    }

    pub async fn start_ban(&self) -> Result<StoredSession, MatchforgeError> {
        self.submit_with_retry(Intent::StartBan).await
    }

    /// Map actions go through [`submit`](Self::submit), never the retry
    /// loop: after a conflict the turn may belong to the other team, and
    /// an admin's retried ban would be spent on that team's slot.
    pub async fn ban(&self, map_id: impl Into<String>) -> Result<StoredSession, MatchforgeError> {
        self.submit(Intent::Act {
            map_id: MapId::new(map_id),
            kind: ActionKind::Ban,
        })
        .await
    }

    pub async fn pick(&self, map_id: impl Into<String>) -> Result<StoredSession, MatchforgeError> {
        self.submit(Intent::Act {
            map_id: MapId::new(map_id),
            kind: ActionKind::Pick,
        })
        .await
    }

    /// Bans or picks `map_id`, whichever the plan calls for next.
    pub async fn act(&self, map_id: impl Into<String>) -> Result<StoredSession, MatchforgeError> {
        let map_id = MapId::new(map_id);
        let kind = self.current_action().unwrap_or(ActionKind::Ban);
        self.submit(Intent::Act { map_id, kind }).await
    }

    pub async fn go_back(&self) -> Result<StoredSession, MatchforgeError> {
        self.submit_with_retry(Intent::GoBack).await
    }

    pub async fn reset(&self) -> Result<StoredSession, MatchforgeError> {
        self.submit_with_retry(Intent::Reset).await
    }
}

impl<S: SharedStateStore> Drop for DraftClient<S> {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
