//! Draft configuration.

use matchforge_protocol::{MatchFormat, TeamFormat, TeamSide};
use serde::{Deserialize, Serialize};

/// Defaults used when a room's session is first created and when it is
/// reset.
///
/// Hosts can override these by passing their own config to
/// [`DraftMachine::new`](crate::DraftMachine::new); every field falls back
/// to its default when missing from a serialized config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Display name of team A. Also the fallback when a rename is blank.
    pub team_a_name: String,

    /// Display name of team B. Also the fallback when a rename is blank.
    pub team_b_name: String,

    /// Team format of a freshly created session.
    pub default_team_format: TeamFormat,

    /// Match format of a freshly created session.
    pub default_match_format: MatchFormat,
}

impl DraftConfig {
    /// The configured default name for one side.
    pub fn default_team_name(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::TeamA => &self.team_a_name,
            TeamSide::TeamB => &self.team_b_name,
        }
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            team_a_name: "Team A".to_string(),
            team_b_name: "Team B".to_string(),
            default_team_format: TeamFormat::FiveVFive,
            default_match_format: MatchFormat::Md1,
        }
    }
}
