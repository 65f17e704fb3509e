//! Collaborators the client consumes but doesn't implement.
//!
//! Matchforge doesn't track presence or identity itself. The host provides
//! a [`Roster`] (who is in the room right now) and an [`AdminDirectory`]
//! (which session is the admin). Both are async so they can sit on top of
//! a presence channel or a remote lookup.
//!
//! For development and tests, [`StaticRoster`] and [`SingleAdmin`] answer
//! from fixed data.

use std::future::Future;

use matchforge_protocol::{Player, RoomId, SessionId};

use crate::MatchforgeError;

/// Lists the players present in a room.
///
/// The result is a snapshot and may lag behind presence; team formation
/// uses it exactly as returned.
pub trait Roster: Send + Sync + 'static {
    /// # Errors
    /// [`MatchforgeError::Roster`] if the presence source can't answer.
    fn list_players(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<Vec<Player>, MatchforgeError>> + Send;
}

/// Answers whether a session holds the admin role.
pub trait AdminDirectory: Send + Sync + 'static {
    fn is_admin(&self, session_id: &SessionId) -> impl Future<Output = bool> + Send;
}

/// A roster that returns the same players for every room.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    players: Vec<Player>,
}

impl StaticRoster {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }
}

impl Roster for StaticRoster {
    async fn list_players(&self, _room_id: &RoomId) -> Result<Vec<Player>, MatchforgeError> {
        Ok(self.players.clone())
    }
}

/// Exactly one session is the admin.
#[derive(Debug, Clone)]
pub struct SingleAdmin(pub SessionId);

impl AdminDirectory for SingleAdmin {
    async fn is_admin(&self, session_id: &SessionId) -> bool {
        &self.0 == session_id
    }
}
