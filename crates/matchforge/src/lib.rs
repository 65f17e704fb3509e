//! # Matchforge
//!
//! Realtime CS2 match setup: random team formation with captains, then a
//! turn-based map ban/pick draft, shared by every participant of a room
//! through a versioned state store.
//!
//! Each participant runs a [`DraftClient`]. Intents are validated by the
//! draft engine against the last observed session, written with optimistic
//! concurrency, and confirmed only by the store's echo.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matchforge::prelude::*;
//!
//! # async fn run() -> Result<(), MatchforgeError> {
//! let store = MemoryStore::new(StoreConfig::default());
//! let admins = SingleAdmin(SessionId::new("admin"));
//! let roster = StaticRoster::new(
//!     (0..10)
//!         .map(|i| Player::new(format!("p{i}"), format!("player{i}"), format!("s{i}")))
//!         .collect(),
//! );
//!
//! let admin = DraftClient::builder(store.clone())
//!     .connect(RoomId::new("K7QX2M"), SessionId::new("admin"), &admins)
//!     .await?;
//! admin.set_match_format(MatchFormat::Md3).await?;
//! admin.create_teams(&roster).await?;
//! admin.start_ban().await?;
//! # Ok(())
//! # }
//! ```

#![allow(async_fn_in_trait)]

mod client;
mod collab;
mod error;

pub use client::{ClientConfig, DraftClient, DraftClientBuilder};
pub use collab::{AdminDirectory, Roster, SingleAdmin, StaticRoster};
pub use error::MatchforgeError;

pub use matchforge_draft as draft;
pub use matchforge_protocol as protocol;
pub use matchforge_store as store;

/// Everything needed to run a room, in one import.
pub mod prelude {
    pub use crate::{
        AdminDirectory, ClientConfig, DraftClient, DraftClientBuilder, MatchforgeError,
        Roster, SingleAdmin, StaticRoster,
    };
    pub use matchforge_draft::{
        Actor, DraftConfig, DraftError, DraftEvent, DraftMachine, Intent, MapPool,
        VetoBoard, VetoMark,
    };
    pub use matchforge_protocol::{
        ActionKind, MapId, MapState, MapStatus, MatchFormat, MatchSession, Player,
        RoomId, SessionId, Step, Team, TeamFormat, TeamSide,
    };
    pub use matchforge_store::{
        MemoryStore, SharedStateStore, StoreConfig, StoreError, StoredSession, Subscription,
        Version,
    };
}
