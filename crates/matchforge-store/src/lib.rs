//! Versioned shared state store for Matchforge.
//!
//! Holds exactly one [`MatchSession`](matchforge_protocol::MatchSession)
//! per room and tells every subscriber about each accepted write.
//!
//! # Key types
//!
//! - [`SharedStateStore`]: the trait a backend implements
//! - [`MemoryStore`]: an actor-backed in-process implementation
//! - [`StoredSession`] / [`Version`]: a session and its revision
//! - [`Subscription`]: the change feed of one room

#![allow(async_fn_in_trait)]

mod config;
mod error;
mod memory;
mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{SharedStateStore, StoredSession, Subscription, Version};
