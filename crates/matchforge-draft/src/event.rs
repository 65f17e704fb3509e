//! Events derived from two consecutive observations of a session.

use matchforge_protocol::{ActionKind, MapId, MapState, MatchSession, Step, Team};
use serde::{Deserialize, Serialize};

use crate::{MapPool, final_maps};

/// Something that happened between two observed versions of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DraftEvent {
    StepChanged { from: Step, to: Step },
    TeamsFormed { team_a: Team, team_b: Team },
    MapBanned { team: String, map_id: MapId, map_name: String },
    MapPicked { team: String, map_id: MapId, map_name: String },
    DraftComplete { final_maps: Vec<MapState> },
}

/// Derives the events that lead from `previous` to `next`.
///
/// Map events come first, one per history entry appended, then
/// `StepChanged`, then `TeamsFormed` when new teams became visible and
/// `DraftComplete` when the step entered `result`. With no previous
/// observation there is nothing to compare against and no event is
/// produced.
pub fn derive_events(
    previous: Option<&MatchSession>,
    next: &MatchSession,
    pool: &MapPool,
) -> Vec<DraftEvent> {
    let Some(prev) = previous else {
        return Vec::new();
    };

    let mut events = Vec::new();

    let shared = prev
        .ban_history
        .iter()
        .zip(&next.ban_history)
        .take_while(|(a, b)| a == b)
        .count();
    for entry in &next.ban_history[shared..] {
        let team = entry.team.clone();
        let map_id = entry.map_id.clone();
        let map_name = entry.map_name.clone();
        events.push(match entry.action {
            ActionKind::Ban => DraftEvent::MapBanned { team, map_id, map_name },
            ActionKind::Pick => DraftEvent::MapPicked { team, map_id, map_name },
        });
    }

    if prev.current_step != next.current_step {
        events.push(DraftEvent::StepChanged {
            from: prev.current_step,
            to: next.current_step,
        });
    }

    if teams_formed(prev, next) {
        events.push(DraftEvent::TeamsFormed {
            team_a: next.team_a.clone(),
            team_b: next.team_b.clone(),
        });
    }

    if prev.current_step != next.current_step && next.current_step == Step::Result {
        events.push(DraftEvent::DraftComplete {
            final_maps: final_maps(next, pool),
        });
    }

    events
}

/// Teams count as formed when `next` has both captains and either left
/// `config` or carries a different split than `prev`. Holds across a
/// skipped observation (`config` straight to `ban`); renames don't count.
fn teams_formed(prev: &MatchSession, next: &MatchSession) -> bool {
    let captained = next.team_a.captain_id.is_some() && next.team_b.captain_id.is_some();
    let left_config = prev.current_step == Step::Config && next.current_step != Step::Config;
    let resplit = prev.team_a.players != next.team_a.players
        || prev.team_b.players != next.team_b.players
        || prev.team_a.captain_id != next.team_a.captain_id
        || prev.team_b.captain_id != next.team_b.captain_id;
    captained && (left_config || resplit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Actor, DraftMachine, Intent};
    use matchforge_protocol::{Player, RoomId, SessionId, TeamSide};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn admin() -> Actor {
        Actor::admin(SessionId::new("admin"))
    }

    fn roster() -> Vec<Player> {
        (0..10)
            .map(|i| Player::new(format!("p{i}"), format!("n{i}"), format!("s{i}")))
            .collect()
    }

    #[test]
    fn test_derive_events_first_observation_is_silent() {
        let m = DraftMachine::default();
        let s = m.new_session(RoomId::new("R"));
        assert!(derive_events(None, &s, m.pool()).is_empty());
    }

    #[test]
    fn test_derive_events_unchanged_session_is_silent() {
        let m = DraftMachine::default();
        let s = m.new_session(RoomId::new("R"));
        assert!(derive_events(Some(&s), &s, m.pool()).is_empty());
    }

    #[test]
    fn test_derive_events_teams_formed() {
        let m = DraftMachine::default();
        let mut rng = StdRng::seed_from_u64(1);
        let config = m.new_session(RoomId::new("R"));
        let teams = m
            .apply(&config, &admin(), Intent::CreateTeams { roster: roster() }, &mut rng)
            .unwrap();

        let events = derive_events(Some(&config), &teams, m.pool());
        assert_eq!(
            events,
            vec![
                DraftEvent::StepChanged { from: Step::Config, to: Step::Teams },
                DraftEvent::TeamsFormed {
                    team_a: teams.team_a.clone(),
                    team_b: teams.team_b.clone(),
                },
            ]
        );
    }

    #[test]
    fn test_derive_events_teams_formed_across_skipped_step() {
        let m = DraftMachine::default();
        let mut rng = StdRng::seed_from_u64(2);
        let config = m.new_session(RoomId::new("R"));
        let teams = m
            .apply(&config, &admin(), Intent::CreateTeams { roster: roster() }, &mut rng)
            .unwrap();
        let ban = m.apply(&teams, &admin(), Intent::StartBan, &mut rng).unwrap();

        let events = derive_events(Some(&config), &ban, m.pool());
        assert_eq!(
            events,
            vec![
                DraftEvent::StepChanged { from: Step::Config, to: Step::Ban },
                DraftEvent::TeamsFormed {
                    team_a: ban.team_a.clone(),
                    team_b: ban.team_b.clone(),
                },
            ]
        );
    }

    #[test]
    fn test_derive_events_rename_is_not_teams_formed() {
        let m = DraftMachine::default();
        let mut rng = StdRng::seed_from_u64(3);
        let config = m.new_session(RoomId::new("R"));
        let teams = m
            .apply(&config, &admin(), Intent::CreateTeams { roster: roster() }, &mut rng)
            .unwrap();
        let renamed = m
            .apply(
                &teams,
                &admin(),
                Intent::RenameTeam { side: TeamSide::TeamA, name: "Blue".into() },
                &mut rng,
            )
            .unwrap();

        assert!(derive_events(Some(&teams), &renamed, m.pool()).is_empty());
    }

    #[test]
    fn test_derive_events_map_banned() {
        let m = DraftMachine::default();
        let mut rng = StdRng::seed_from_u64(1);
        let s = m.new_session(RoomId::new("R"));
        let s = m
            .apply(&s, &admin(), Intent::CreateTeams { roster: roster() }, &mut rng)
            .unwrap();
        let before = m.apply(&s, &admin(), Intent::StartBan, &mut rng).unwrap();
        let after = m
            .apply(
                &before,
                &admin(),
                Intent::Act { map_id: MapId::new("inferno"), kind: ActionKind::Ban },
                &mut rng,
            )
            .unwrap();

        assert_eq!(
            derive_events(Some(&before), &after, m.pool()),
            vec![DraftEvent::MapBanned {
                team: "Team A".into(),
                map_id: MapId::new("inferno"),
                map_name: "Inferno".into(),
            }]
        );
    }

    #[test]
    fn test_derive_events_draft_complete_after_last_ban() {
        let m = DraftMachine::default();
        let mut rng = StdRng::seed_from_u64(1);
        let s = m.new_session(RoomId::new("R"));
        let s = m
            .apply(&s, &admin(), Intent::CreateTeams { roster: roster() }, &mut rng)
            .unwrap();
        let mut s = m.apply(&s, &admin(), Intent::StartBan, &mut rng).unwrap();
        for map in ["mirage", "inferno", "nuke", "overpass", "ancient"] {
            s = m
                .apply(
                    &s,
                    &admin(),
                    Intent::Act { map_id: MapId::new(map), kind: ActionKind::Ban },
                    &mut rng,
                )
                .unwrap();
        }
        let last = m
            .apply(
                &s,
                &admin(),
                Intent::Act { map_id: MapId::new("vertigo"), kind: ActionKind::Ban },
                &mut rng,
            )
            .unwrap();

        let events = derive_events(Some(&s), &last, m.pool());
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], DraftEvent::MapBanned { .. }));
        assert_eq!(
            events[1],
            DraftEvent::StepChanged { from: Step::Ban, to: Step::Result }
        );
        match &events[2] {
            DraftEvent::DraftComplete { final_maps } => {
                assert_eq!(final_maps.len(), 1);
                assert_eq!(final_maps[0].id, MapId::new("anubis"));
            }
            other => panic!("expected DraftComplete, got {other:?}"),
        }
    }

    #[test]
    fn test_derive_events_missed_versions_are_collapsed() {
        let m = DraftMachine::default();
        let mut rng = StdRng::seed_from_u64(1);
        let s = m.new_session(RoomId::new("R"));
        let s = m
            .apply(&s, &admin(), Intent::CreateTeams { roster: roster() }, &mut rng)
            .unwrap();
        let start = m.apply(&s, &admin(), Intent::StartBan, &mut rng).unwrap();
        let mut end = start.clone();
        for map in ["nuke", "mirage"] {
            end = m
                .apply(
                    &end,
                    &admin(),
                    Intent::Act { map_id: MapId::new(map), kind: ActionKind::Ban },
                    &mut rng,
                )
                .unwrap();
        }

        let events = derive_events(Some(&start), &end, m.pool());
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[1],
            DraftEvent::MapBanned { team, .. } if team == "Team B"
        ));
    }

    #[test]
    fn test_draft_event_json_shape() {
        let json = serde_json::to_value(DraftEvent::StepChanged {
            from: Step::Teams,
            to: Step::Ban,
        })
        .unwrap();
        assert_eq!(json["type"], "stepChanged");
        assert_eq!(json["from"], "teams");
        assert_eq!(json["to"], "ban");
    }
}
