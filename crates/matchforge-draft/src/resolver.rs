//! Applying a single ban/pick to a session, and reading the outcome.

use matchforge_protocol::{
    ActionKind, BanHistoryEntry, MapId, MapState, MapStatus, MatchSession,
    Step,
};

use crate::machine::authorize_turn;
use crate::{Actor, DraftError, MapPool, resolve_plan};

/// Number of planned actions already taken (banned + picked maps).
pub fn total_actions(session: &MatchSession) -> usize {
    session
        .maps
        .iter()
        .filter(|m| m.status == MapStatus::Banned || m.status.is_pick())
        .count()
}

/// The action due next, or `None` outside `ban` or once the plan is done.
pub fn current_action(session: &MatchSession) -> Option<ActionKind> {
    if session.current_step != Step::Ban {
        return None;
    }
    resolve_plan(session.match_format).action_at(total_actions(session))
}

/// Applies one ban or pick and returns the resulting session.
///
/// The acting team's turn is consumed and passed to the other team. When
/// this is the last action of the plan, every map still `active` becomes
/// `decider` (in pool order) and the session moves to `result`.
///
/// `session` is never modified; on error nothing has changed.
///
/// # Errors
/// - [`DraftError::Forbidden`] unless `actor` is the admin or the captain
///   of the team holding the turn.
/// - [`DraftError::IllegalAction`] outside step `ban`, for an unknown or
///   non-active map, or when `kind` isn't the action the plan requires.
pub fn apply_action(
    session: &MatchSession,
    pool: &MapPool,
    map_id: &MapId,
    kind: ActionKind,
    actor: &Actor,
) -> Result<MatchSession, DraftError> {
    authorize_turn(session, actor)?;

    if session.current_step != Step::Ban {
        return Err(DraftError::IllegalAction(format!(
            "maps can only be banned or picked in step ban, not {}",
            session.current_step
        )));
    }

    let plan = resolve_plan(session.match_format);
    let taken = total_actions(session);
    let expected = plan.action_at(taken).ok_or_else(|| {
        DraftError::IllegalAction("every planned action has been taken".into())
    })?;

    let map = session
        .map(map_id)
        .ok_or_else(|| DraftError::IllegalAction(format!("unknown map {map_id}")))?;
    if map.status != MapStatus::Active {
        return Err(DraftError::IllegalAction(format!(
            "map {map_id} is already {}",
            map.status
        )));
    }
    if kind != expected {
        return Err(DraftError::IllegalAction(format!(
            "a {expected} is due, not a {kind}"
        )));
    }

    let side = session.current_turn;
    let mut next = session.clone();
    if let Some(target) = next.maps.iter_mut().find(|m| &m.id == map_id) {
        match kind {
            ActionKind::Ban => {
                target.status = MapStatus::Banned;
                target.picked_by = None;
            }
            ActionKind::Pick => {
                target.status = MapStatus::Picked;
                target.picked_by = Some(side);
            }
        }
    }
    next.ban_history.push(BanHistoryEntry {
        team: session.team(side).name.clone(),
        map_name: pool.display_name(map_id),
        map_id: map_id.clone(),
        action: kind,
    });
    next.current_turn = side.opposite();

    if total_actions(&next) == plan.len() {
        conclude(&mut next, pool);
    }

    Ok(next)
}

/// Relabels every remaining `active` map as `decider` and ends the draft.
fn conclude(session: &mut MatchSession, pool: &MapPool) {
    for map in session.maps.iter_mut().filter(|m| m.status == MapStatus::Active) {
        map.status = MapStatus::Decider;
    }
    session.current_step = Step::Result;

    let finals: Vec<String> = final_maps(session, pool)
        .into_iter()
        .map(|m| m.id.to_string())
        .collect();
    tracing::info!(room_id = %session.room_id, ?finals, "draft complete");
}

/// The maps to be played, in match order.
///
/// Picked maps come first in the order they were picked, followed by the
/// decider (or, mid-draft, the maps still active) in pool order, up to the
/// plan's final map count. For `md1` this is the single surviving map.
pub fn final_maps(session: &MatchSession, pool: &MapPool) -> Vec<MapState> {
    let plan = resolve_plan(session.match_format);

    let mut maps: Vec<MapState> = session
        .ban_history
        .iter()
        .filter(|entry| entry.action == ActionKind::Pick)
        .filter_map(|entry| session.map(&entry.map_id))
        .filter(|m| m.status == MapStatus::Picked)
        .cloned()
        .collect();

    let mut remaining: Vec<&MapState> = session
        .maps
        .iter()
        .filter(|m| matches!(m.status, MapStatus::Decider | MapStatus::Active))
        .collect();
    remaining.sort_by_key(|m| pool.position(&m.id).unwrap_or(usize::MAX));

    let open_slots = plan.final_map_count.saturating_sub(maps.len());
    maps.extend(remaining.into_iter().take(open_slots).cloned());
    maps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DraftMachine;
    use matchforge_protocol::{
        MatchFormat, Player, RoomId, SessionId, TeamFormat, TeamSide,
    };

    fn admin() -> Actor {
        Actor::admin(SessionId::new("admin"))
    }

    /// A session already in step `ban` with captains `capA` and `capB`.
    fn ban_session(format: MatchFormat) -> MatchSession {
        let machine = DraftMachine::default();
        let mut s = machine.new_session(RoomId::new("R"));
        s.team_format = TeamFormat::TwoVTwo;
        s.match_format = format;
        s.team_a.players = vec![
            Player::new("1", "a1", "capA"),
            Player::new("2", "a2", "a2"),
        ];
        s.team_a.captain_id = Some(SessionId::new("capA"));
        s.team_b.players = vec![
            Player::new("3", "b1", "capB"),
            Player::new("4", "b2", "b2"),
        ];
        s.team_b.captain_id = Some(SessionId::new("capB"));
        s.current_step = Step::Ban;
        s
    }

    fn act(s: &MatchSession, map: &str, kind: ActionKind) -> MatchSession {
        apply_action(s, &MapPool::competitive(), &MapId::new(map), kind, &admin())
            .unwrap()
    }

    #[test]
    fn test_apply_action_ban_marks_map_and_flips_turn() {
        let s = ban_session(MatchFormat::Md1);
        let next = act(&s, "nuke", ActionKind::Ban);

        assert_eq!(next.map(&MapId::new("nuke")).unwrap().status, MapStatus::Banned);
        assert_eq!(next.current_turn, TeamSide::TeamB);
        assert_eq!(next.ban_history.len(), 1);
        assert_eq!(next.ban_history[0].team, "Team A");
        assert_eq!(next.ban_history[0].map_name, "Nuke");
        // The input is untouched.
        assert_eq!(s.current_turn, TeamSide::TeamA);
        assert!(s.ban_history.is_empty());
    }

    #[test]
    fn test_apply_action_pick_records_picked_by() {
        let mut s = ban_session(MatchFormat::Md5);
        s.current_turn = TeamSide::TeamA;
        let next = act(&s, "ancient", ActionKind::Pick);
        let map = next.map(&MapId::new("ancient")).unwrap();
        assert_eq!(map.status, MapStatus::Picked);
        assert_eq!(map.picked_by, Some(TeamSide::TeamA));
    }

    #[test]
    fn test_apply_action_wrong_kind_is_illegal() {
        let s = ban_session(MatchFormat::Md3);
        let result = apply_action(
            &s,
            &MapPool::competitive(),
            &MapId::new("nuke"),
            ActionKind::Pick,
            &admin(),
        );
        assert!(matches!(result, Err(DraftError::IllegalAction(_))));
    }

    #[test]
    fn test_apply_action_non_active_map_is_illegal() {
        let s = act(&ban_session(MatchFormat::Md1), "nuke", ActionKind::Ban);
        let result = apply_action(
            &s,
            &MapPool::competitive(),
            &MapId::new("nuke"),
            ActionKind::Ban,
            &admin(),
        );
        assert!(matches!(result, Err(DraftError::IllegalAction(_))));
    }

    #[test]
    fn test_apply_action_unknown_map_is_illegal() {
        let s = ban_session(MatchFormat::Md1);
        let result = apply_action(
            &s,
            &MapPool::competitive(),
            &MapId::new("dust2"),
            ActionKind::Ban,
            &admin(),
        );
        assert!(matches!(result, Err(DraftError::IllegalAction(_))));
    }

    #[test]
    fn test_apply_action_outside_ban_step_is_illegal() {
        let mut s = ban_session(MatchFormat::Md1);
        s.current_step = Step::Teams;
        let result = apply_action(
            &s,
            &MapPool::competitive(),
            &MapId::new("nuke"),
            ActionKind::Ban,
            &admin(),
        );
        assert!(matches!(result, Err(DraftError::IllegalAction(_))));
    }

    #[test]
    fn test_apply_action_other_captain_is_forbidden() {
        let s = ban_session(MatchFormat::Md1);
        let captain_b = Actor::player(SessionId::new("capB"));
        let result = apply_action(
            &s,
            &MapPool::competitive(),
            &MapId::new("nuke"),
            ActionKind::Ban,
            &captain_b,
        );
        assert!(matches!(result, Err(DraftError::Forbidden(_))));
    }

    #[test]
    fn test_apply_action_current_captain_allowed() {
        let s = ban_session(MatchFormat::Md1);
        let captain_a = Actor::player(SessionId::new("capA"));
        let next = apply_action(
            &s,
            &MapPool::competitive(),
            &MapId::new("nuke"),
            ActionKind::Ban,
            &captain_a,
        )
        .unwrap();
        assert_eq!(next.current_turn, TeamSide::TeamB);
    }

    #[test]
    fn test_last_action_relabels_decider_and_finishes() {
        let mut s = ban_session(MatchFormat::Md1);
        for map in ["mirage", "inferno", "nuke", "overpass", "ancient"] {
            s = act(&s, map, ActionKind::Ban);
            assert_eq!(s.current_step, Step::Ban);
        }
        s = act(&s, "anubis", ActionKind::Ban);

        assert_eq!(s.current_step, Step::Result);
        assert_eq!(s.count_status(MapStatus::Active), 0);
        assert_eq!(
            s.map(&MapId::new("vertigo")).unwrap().status,
            MapStatus::Decider
        );
        assert_eq!(current_action(&s), None);

        let finals = final_maps(&s, &MapPool::competitive());
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].id, MapId::new("vertigo"));
    }

    #[test]
    fn test_final_maps_orders_picks_by_history() {
        let mut s = ban_session(MatchFormat::Md5);
        // Team A picks vertigo (last in pool), then B picks mirage (first).
        s = act(&s, "vertigo", ActionKind::Pick);
        s = act(&s, "mirage", ActionKind::Pick);

        let finals = final_maps(&s, &MapPool::competitive());
        assert_eq!(finals[0].id, MapId::new("vertigo"));
        assert_eq!(finals[1].id, MapId::new("mirage"));
        // Mid-draft the remainder is padded with active maps.
        assert_eq!(finals.len(), 5);
    }

    #[test]
    fn test_current_action_follows_plan() {
        let mut s = ban_session(MatchFormat::Md3);
        assert_eq!(current_action(&s), Some(ActionKind::Ban));
        for map in ["mirage", "inferno", "nuke", "overpass"] {
            s = act(&s, map, ActionKind::Ban);
        }
        assert_eq!(current_action(&s), Some(ActionKind::Pick));
    }
}
