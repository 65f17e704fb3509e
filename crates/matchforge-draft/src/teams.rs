//! Team formation: random split of the roster and captain election.

use std::collections::HashSet;

use matchforge_protocol::{Player, Team, TeamFormat};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::DraftError;

/// Splits `roster` into two teams of equal size and elects a captain for
/// each.
///
/// The roster is shuffled uniformly, the first half goes to team A and
/// the second half to team B, then each team's captain is drawn uniformly
/// from its own players. Every call is an independent draw.
///
/// # Errors
/// - [`DraftError::RosterSizeMismatch`] unless the roster has exactly
///   `format.required_players()` players.
/// - [`DraftError::IllegalAction`] if two roster rows share a session id
///   (the captain would be ambiguous).
pub fn form_teams<R>(
    roster: &[Player],
    format: TeamFormat,
    team_a_name: &str,
    team_b_name: &str,
    rng: &mut R,
) -> Result<(Team, Team), DraftError>
where
    R: Rng + ?Sized,
{
    let expected = format.required_players();
    if roster.len() != expected {
        return Err(DraftError::RosterSizeMismatch {
            expected,
            actual: roster.len(),
        });
    }

    let mut seen = HashSet::with_capacity(roster.len());
    if let Some(dup) = roster.iter().find(|p| !seen.insert(&p.session_id)) {
        return Err(DraftError::IllegalAction(format!(
            "session {} appears twice in the roster",
            dup.session_id
        )));
    }

    let mut shuffled = roster.to_vec();
    shuffled.shuffle(rng);
    let team_b_players = shuffled.split_off(format.team_size());
    let team_a_players = shuffled;

    let team_a = elect_captain(team_a_name, team_a_players, rng)?;
    let team_b = elect_captain(team_b_name, team_b_players, rng)?;
    Ok((team_a, team_b))
}

fn elect_captain<R>(
    name: &str,
    players: Vec<Player>,
    rng: &mut R,
) -> Result<Team, DraftError>
where
    R: Rng + ?Sized,
{
    let captain = players
        .choose(rng)
        .map(|p| p.session_id.clone())
        .ok_or_else(|| {
            DraftError::IllegalAction(format!("team {name} has no players"))
        })?;

    Ok(Team {
        name: name.to_string(),
        players,
        captain_id: Some(captain),
    })
}
