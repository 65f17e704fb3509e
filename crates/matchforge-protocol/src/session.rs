//! The shared match-session record and the values nested inside it.
//!
//! [`MatchSession`] is the root value of the shared state store: one per
//! room, observed by every client, mutated only through the draft engine's
//! transition functions. It must stay a plain tree of data (no references,
//! no cycles) so it can be encoded with any [`Codec`](crate::Codec).

use serde::{Deserialize, Serialize};

use crate::{
    ActionKind, MapId, MapStatus, MatchFormat, PlayerId, RoomId, SessionId,
    Step, TeamFormat, TeamSide,
};

/// A lobby member as reported by the roster collaborator. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub session_id: SessionId,
}

impl Player {
    pub fn new(
        id: impl Into<String>,
        nickname: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            id: PlayerId::new(id),
            nickname: nickname.into(),
            session_id: SessionId::new(session_id),
        }
    }
}

/// One of the two teams of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,
    /// Session id of the captain. Always one of `players` once formed.
    pub captain_id: Option<SessionId>,
}

impl Team {
    /// An unformed team: a name and nobody in it.
    pub fn unformed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            players: Vec::new(),
            captain_id: None,
        }
    }

    /// Returns `true` if the given session plays on this team.
    pub fn has_member(&self, session_id: &SessionId) -> bool {
        self.players.iter().any(|p| &p.session_id == session_id)
    }

    /// Returns `true` if the given session captains this team.
    pub fn is_captain(&self, session_id: &SessionId) -> bool {
        self.captain_id.as_ref() == Some(session_id)
    }
}

/// Status of one map of the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapState {
    pub id: MapId,
    pub status: MapStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_by: Option<TeamSide>,
}

impl MapState {
    /// A map nobody has touched yet.
    pub fn active(id: impl Into<String>) -> Self {
        Self {
            id: MapId::new(id),
            status: MapStatus::Active,
            picked_by: None,
        }
    }
}

/// One accepted draft action, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanHistoryEntry {
    /// Display name of the acting team at the time of the action.
    pub team: String,
    pub map_name: String,
    pub map_id: MapId,
    pub action: ActionKind,
}

/// The shared state of one room's match setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSession {
    pub room_id: RoomId,
    pub team_format: TeamFormat,
    pub match_format: MatchFormat,
    pub current_step: Step,
    pub team_a: Team,
    pub team_b: Team,
    pub maps: Vec<MapState>,
    pub current_turn: TeamSide,
    pub ban_history: Vec<BanHistoryEntry>,
}

impl MatchSession {
    /// Builds a session in step `config` with unformed teams, every map
    /// active and team A holding the turn.
    pub fn empty<I, S>(
        room_id: RoomId,
        team_format: TeamFormat,
        match_format: MatchFormat,
        team_a_name: impl Into<String>,
        team_b_name: impl Into<String>,
        map_ids: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            room_id,
            team_format,
            match_format,
            current_step: Step::Config,
            team_a: Team::unformed(team_a_name),
            team_b: Team::unformed(team_b_name),
            maps: map_ids.into_iter().map(MapState::active).collect(),
            current_turn: TeamSide::TeamA,
            ban_history: Vec::new(),
        }
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::TeamA => &self.team_a,
            TeamSide::TeamB => &self.team_b,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::TeamA => &mut self.team_a,
            TeamSide::TeamB => &mut self.team_b,
        }
    }

    /// Looks up a map by id.
    pub fn map(&self, id: &MapId) -> Option<&MapState> {
        self.maps.iter().find(|m| &m.id == id)
    }

    /// Number of maps currently holding `status`.
    pub fn count_status(&self, status: MapStatus) -> usize {
        self.maps.iter().filter(|m| m.status == status).count()
    }

    /// The side whose captain is `session_id`, if any.
    pub fn captain_side(&self, session_id: &SessionId) -> Option<TeamSide> {
        [TeamSide::TeamA, TeamSide::TeamB]
            .into_iter()
            .find(|side| self.team(*side).is_captain(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> MatchSession {
        MatchSession::empty(
            RoomId::new("R1"),
            TeamFormat::TwoVTwo,
            MatchFormat::Md3,
            "Blue",
            "Orange",
            ["mirage", "nuke", "anubis"],
        )
    }

    #[test]
    fn test_empty_session_starts_in_config() {
        let s = session();
        assert_eq!(s.current_step, Step::Config);
        assert_eq!(s.current_turn, TeamSide::TeamA);
        assert_eq!(s.count_status(MapStatus::Active), 3);
        assert!(s.team_a.players.is_empty());
        assert!(s.team_b.captain_id.is_none());
        assert!(s.ban_history.is_empty());
    }

    #[test]
    fn test_captain_side_finds_team() {
        let mut s = session();
        s.team_b.players.push(Player::new("p1", "ana", "s1"));
        s.team_b.captain_id = Some(SessionId::new("s1"));

        assert_eq!(s.captain_side(&SessionId::new("s1")), Some(TeamSide::TeamB));
        assert_eq!(s.captain_side(&SessionId::new("s2")), None);
    }

    #[test]
    fn test_session_json_uses_camel_case_fields() {
        let json = serde_json::to_value(session()).unwrap();
        assert_eq!(json["currentStep"], "config");
        assert_eq!(json["currentTurn"], "teamA");
        assert_eq!(json["teamFormat"], "2v2");
        assert_eq!(json["teamA"]["captainId"], serde_json::Value::Null);
        assert_eq!(json["maps"][0]["status"], "active");
        // `pickedBy` is left out entirely while unset.
        assert!(json["maps"][0].get("pickedBy").is_none());
    }
}
