//! Shared record types for Matchforge.
//!
//! This crate defines the "language" every client of a match room speaks:
//!
//! - **Types** ([`MatchSession`], [`Team`], [`MapState`], etc.): the
//!   record that lives in the shared state store and every value inside it.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how that record is
//!   converted to/from bytes so it can cross any change-notification
//!   transport.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding,
//!   decoding, or parsing a format name.
//!
//! # Architecture
//!
//! The protocol layer sits below both the draft engine and the store.
//! It knows nothing about turns or permissions; it only describes the
//! shape of the data.
//!
//! ```text
//! Store (bytes) → Protocol (MatchSession) → Draft engine (transitions)
//! ```

mod codec;
mod error;
mod session;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

// Everything is flattened to the crate root, so callers write
// `matchforge_protocol::MatchSession` rather than reaching into a module.

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use session::{BanHistoryEntry, MapState, MatchSession, Player, Team};
pub use types::{
    ActionKind, MapId, MapStatus, MatchFormat, PlayerId, RoomId, SessionId,
    Step, TeamFormat, TeamSide,
};
