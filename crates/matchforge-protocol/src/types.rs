//! Identity newtypes and the small enums every session record is built from.
//!
//! Everything here travels inside a [`MatchSession`](crate::MatchSession),
//! so every enum serializes as a plain string. A browser client reading the
//! record sees `"ban"`, `"md3"` or `"teamA"`, never a tagged object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of a match room (the short code players share).
///
/// `#[serde(transparent)]` keeps it a bare string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps a room code.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the room code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room-{}", self.0)
    }
}

/// Identity of one browser tab / client session.
///
/// Captains are recorded by session id, and the admin check is done
/// against it, so this is the identity every permission decision uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a session identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roster row identifier, owned by the roster collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps a roster row identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a map in the pool (e.g. `"mirage"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(String);

impl MapId {
    /// Wraps a map identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// TeamSide
// ---------------------------------------------------------------------------

/// One of the two teams of a session. Also the type of `currentTurn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TeamSide {
    #[default]
    #[serde(rename = "teamA")]
    TeamA,
    #[serde(rename = "teamB")]
    TeamB,
}

impl TeamSide {
    /// The other team.
    pub fn opposite(self) -> Self {
        match self {
            Self::TeamA => Self::TeamB,
            Self::TeamB => Self::TeamA,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamA => write!(f, "teamA"),
            Self::TeamB => write!(f, "teamB"),
        }
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// The step a session is in.
///
/// ```text
/// config ──→ teams ──→ ban ──→ result
///   ↑          │ ↑      │        │
///   └──────────┘ └──────┘        │
///   ↑                            │
///   └────────── reset ───────────┘
/// ```
///
/// The graph itself is enforced by the draft engine; this type only names
/// the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Config,
    Teams,
    Ban,
    Result,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Teams => write!(f, "teams"),
            Self::Ban => write!(f, "ban"),
            Self::Result => write!(f, "result"),
        }
    }
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// Team size format. Both teams always have the same size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TeamFormat {
    #[serde(rename = "2v2")]
    TwoVTwo,
    #[serde(rename = "3v3")]
    ThreeVThree,
    #[serde(rename = "4v4")]
    FourVFour,
    #[default]
    #[serde(rename = "5v5")]
    FiveVFive,
}

impl TeamFormat {
    /// Every supported team format, smallest first.
    pub const ALL: [TeamFormat; 4] = [
        Self::TwoVTwo,
        Self::ThreeVThree,
        Self::FourVFour,
        Self::FiveVFive,
    ];

    /// Players per team.
    pub fn team_size(self) -> usize {
        match self {
            Self::TwoVTwo => 2,
            Self::ThreeVThree => 3,
            Self::FourVFour => 4,
            Self::FiveVFive => 5,
        }
    }

    /// Roster size needed to form both teams.
    pub fn required_players(self) -> usize {
        self.team_size() * 2
    }
}

impl fmt::Display for TeamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.team_size();
        write!(f, "{n}v{n}")
    }
}

impl FromStr for TeamFormat {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2v2" => Ok(Self::TwoVTwo),
            "3v3" => Ok(Self::ThreeVThree),
            "4v4" => Ok(Self::FourVFour),
            "5v5" => Ok(Self::FiveVFive),
            other => Err(ProtocolError::UnknownFormat(other.to_string())),
        }
    }
}

/// Match format: best of 1, 3 or 5 maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchFormat {
    #[default]
    Md1,
    Md3,
    Md5,
}

impl MatchFormat {
    /// Every supported match format.
    pub const ALL: [MatchFormat; 3] = [Self::Md1, Self::Md3, Self::Md5];
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md1 => write!(f, "md1"),
            Self::Md3 => write!(f, "md3"),
            Self::Md5 => write!(f, "md5"),
        }
    }
}

impl FromStr for MatchFormat {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md1" => Ok(Self::Md1),
            "md3" => Ok(Self::Md3),
            "md5" => Ok(Self::Md5),
            other => Err(ProtocolError::UnknownFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Map actions and statuses
// ---------------------------------------------------------------------------

/// What a single draft action does to a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Ban,
    Pick,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ban => write!(f, "ban"),
            Self::Pick => write!(f, "pick"),
        }
    }
}

/// Status of one map.
///
/// The captain draft uses `Active`/`Banned`/`Picked`/`Decider`; the
/// veto-only board uses `Active`/`Banned`/`PickA`/`PickB` and reads
/// `Decider` as a derived value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MapStatus {
    #[default]
    Active,
    Banned,
    Picked,
    PickA,
    PickB,
    Decider,
}

impl MapStatus {
    /// Returns `true` for any of the picked statuses.
    pub fn is_pick(self) -> bool {
        matches!(self, Self::Picked | Self::PickA | Self::PickB)
    }
}

impl fmt::Display for MapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Banned => write!(f, "banned"),
            Self::Picked => write!(f, "picked"),
            Self::PickA => write!(f, "pickA"),
            Self::PickB => write!(f, "pickB"),
            Self::Decider => write!(f, "decider"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status_is_pick() {
        assert!(MapStatus::Picked.is_pick());
        assert!(MapStatus::PickA.is_pick());
        assert!(MapStatus::PickB.is_pick());
        assert!(!MapStatus::Active.is_pick());
        assert!(!MapStatus::Banned.is_pick());
        assert!(!MapStatus::Decider.is_pick());
    }

    #[test]
    fn test_team_side_opposite() {
        assert_eq!(TeamSide::TeamA.opposite(), TeamSide::TeamB);
        assert_eq!(TeamSide::TeamB.opposite(), TeamSide::TeamA);
    }

    #[test]
    fn test_team_format_required_players() {
        assert_eq!(TeamFormat::TwoVTwo.required_players(), 4);
        assert_eq!(TeamFormat::ThreeVThree.required_players(), 6);
        assert_eq!(TeamFormat::FourVFour.required_players(), 8);
        assert_eq!(TeamFormat::FiveVFive.required_players(), 10);
    }

    #[test]
    fn test_team_format_parse_and_display_agree() {
        for format in TeamFormat::ALL {
            assert_eq!(format.to_string().parse::<TeamFormat>().unwrap(), format);
        }
        assert!("6v6".parse::<TeamFormat>().is_err());
    }

    #[test]
    fn test_match_format_parse_unknown_fails() {
        assert_eq!("md3".parse::<MatchFormat>().unwrap(), MatchFormat::Md3);
        let err = "md7".parse::<MatchFormat>().unwrap_err();
        assert!(err.to_string().contains("md7"));
    }

    #[test]
    fn test_enums_serialize_as_strings() {
        assert_eq!(serde_json::to_string(&Step::Result).unwrap(), r#""result""#);
        assert_eq!(serde_json::to_string(&TeamFormat::TwoVTwo).unwrap(), r#""2v2""#);
        assert_eq!(serde_json::to_string(&MatchFormat::Md5).unwrap(), r#""md5""#);
        assert_eq!(serde_json::to_string(&TeamSide::TeamB).unwrap(), r#""teamB""#);
        assert_eq!(serde_json::to_string(&MapStatus::PickA).unwrap(), r#""pickA""#);
        assert_eq!(serde_json::to_string(&ActionKind::Pick).unwrap(), r#""pick""#);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = SessionId::new("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc-123""#);
        assert_eq!(RoomId::new("XK4P2Q").to_string(), "room-XK4P2Q");
    }
}
