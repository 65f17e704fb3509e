//! The draft state machine: steps, intents, and who may do what.
//!
//! Every transition here is a pure function of the last observed session
//! and an intent. The result is a new session value that the caller hands
//! to the store; the input is never modified, so a rejected intent leaves
//! no trace.
//!
//! ```text
//! config ──create teams──→ teams ──start ban──→ ban ──last action──→ result
//!   ↑                        │ ↑                  │                     │
//!   └──────── go back ───────┘ └───── go back ────┘                     │
//!   ↑                                                                   │
//!   └─────────────────────────────── reset ─────────────────────────────┘
//! ```

use matchforge_protocol::{
    ActionKind, MapId, MatchFormat, MatchSession, Player, RoomId, SessionId,
    Step, TeamFormat, TeamSide,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{DraftConfig, DraftError, MapPool, apply_action, form_teams};

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Who is asking: a session id plus the admin flag from the identity
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub session_id: SessionId,
    pub is_admin: bool,
}

impl Actor {
    pub fn admin(session_id: SessionId) -> Self {
        Self { session_id, is_admin: true }
    }

    pub fn player(session_id: SessionId) -> Self {
        Self { session_id, is_admin: false }
    }
}

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// Something an actor wants to do to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    /// Admin, step `config` only.
    SetTeamFormat { format: TeamFormat },
    /// Admin, step `config` only.
    SetMatchFormat { format: MatchFormat },
    /// Admin, steps `config` and `teams`. A blank name restores the default.
    RenameTeam { side: TeamSide, name: String },
    /// Admin: `config → teams`, using this roster snapshot.
    CreateTeams { roster: Vec<Player> },
    /// Admin: `teams → ban`.
    StartBan,
    /// Admin or the captain holding the turn, step `ban` only.
    Act { map_id: MapId, kind: ActionKind },
    /// Admin: `teams → config` or `ban → teams`.
    GoBack,
    /// Admin: `result → config`.
    Reset,
}

impl Intent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTeamFormat { .. } => "set_team_format",
            Self::SetMatchFormat { .. } => "set_match_format",
            Self::RenameTeam { .. } => "rename_team",
            Self::CreateTeams { .. } => "create_teams",
            Self::StartBan => "start_ban",
            Self::Act { .. } => "act",
            Self::GoBack => "go_back",
            Self::Reset => "reset",
        }
    }
}

// ---------------------------------------------------------------------------
// Step graph
// ---------------------------------------------------------------------------

/// Returns `true` if the step graph has an edge `from → to`.
pub fn is_legal_transition(from: Step, to: Step) -> bool {
    matches!(
        (from, to),
        (Step::Config, Step::Teams)
            | (Step::Teams, Step::Ban)
            | (Step::Ban, Step::Result)
            | (Step::Teams, Step::Config)
            | (Step::Ban, Step::Teams)
            | (Step::Result, Step::Config)
    )
}

fn require_transition(from: Step, to: Step) -> Result<(), DraftError> {
    if is_legal_transition(from, to) {
        Ok(())
    } else {
        Err(DraftError::IllegalTransition { from, to })
    }
}

fn require_admin(actor: &Actor, what: &str) -> Result<(), DraftError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(DraftError::Forbidden(format!(
            "only the admin can {what} (session {})",
            actor.session_id
        )))
    }
}

/// Checks that `actor` may act for the team holding the turn.
pub(crate) fn authorize_turn(
    session: &MatchSession,
    actor: &Actor,
) -> Result<(), DraftError> {
    if actor.is_admin || session.team(session.current_turn).is_captain(&actor.session_id) {
        Ok(())
    } else {
        Err(DraftError::Forbidden(format!(
            "session {} is not the captain of {}",
            actor.session_id, session.current_turn
        )))
    }
}

/// Returns `true` if `actor` may ban or pick right now.
pub fn can_act(session: &MatchSession, actor: &Actor) -> bool {
    session.current_step == Step::Ban && authorize_turn(session, actor).is_ok()
}

// ---------------------------------------------------------------------------
// DraftMachine
// ---------------------------------------------------------------------------

/// Applies intents to sessions.
///
/// Holds only configuration; it has no state of its own and can be shared
/// freely between clients.
#[derive(Debug, Clone, Default)]
pub struct DraftMachine {
    config: DraftConfig,
    pool: MapPool,
}

impl DraftMachine {
    pub fn new(config: DraftConfig) -> Self {
        Self {
            config,
            pool: MapPool::competitive(),
        }
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn pool(&self) -> &MapPool {
        &self.pool
    }

    /// The session a room starts with (and returns to, apart from its
    /// formats, on reset).
    pub fn new_session(&self, room_id: RoomId) -> MatchSession {
        MatchSession::empty(
            room_id,
            self.config.default_team_format,
            self.config.default_match_format,
            self.config.team_a_name.clone(),
            self.config.team_b_name.clone(),
            self.pool.iter().map(|m| m.id),
        )
    }

    /// Applies `intent` on behalf of `actor` and returns the new session.
    ///
    /// `rng` is only drawn from by [`Intent::CreateTeams`].
    ///
    /// # Errors
    /// Any [`DraftError`]; `session` is left as it was.
    pub fn apply<R>(
        &self,
        session: &MatchSession,
        actor: &Actor,
        intent: Intent,
        rng: &mut R,
    ) -> Result<MatchSession, DraftError>
    where
        R: Rng + ?Sized,
    {
        let intent_name = intent.name();
        let result = match intent {
            Intent::SetTeamFormat { format } => self.set_team_format(session, actor, format),
            Intent::SetMatchFormat { format } => self.set_match_format(session, actor, format),
            Intent::RenameTeam { side, name } => self.rename_team(session, actor, side, &name),
            Intent::CreateTeams { roster } => self.create_teams(session, actor, &roster, rng),
            Intent::StartBan => self.start_ban(session, actor),
            Intent::Act { map_id, kind } => {
                apply_action(session, &self.pool, &map_id, kind, actor)
            }
            Intent::GoBack => self.go_back(session, actor),
            Intent::Reset => self.reset(session, actor),
        };

        match &result {
            Ok(next) => tracing::info!(
                room_id = %session.room_id,
                session_id = %actor.session_id,
                intent = intent_name,
                step = %next.current_step,
                "intent accepted"
            ),
            Err(e) => tracing::debug!(
                room_id = %session.room_id,
                session_id = %actor.session_id,
                intent = intent_name,
                error = %e,
                "intent rejected"
            ),
        }
        result
    }

    pub fn set_team_format(
        &self,
        session: &MatchSession,
        actor: &Actor,
        format: TeamFormat,
    ) -> Result<MatchSession, DraftError> {
        require_admin(actor, "change the team format")?;
        require_config_step(session, "the team format")?;
        Ok(MatchSession {
            team_format: format,
            ..session.clone()
        })
    }

    pub fn set_match_format(
        &self,
        session: &MatchSession,
        actor: &Actor,
        format: MatchFormat,
    ) -> Result<MatchSession, DraftError> {
        require_admin(actor, "change the match format")?;
        require_config_step(session, "the match format")?;
        Ok(MatchSession {
            match_format: format,
            ..session.clone()
        })
    }

    pub fn rename_team(
        &self,
        session: &MatchSession,
        actor: &Actor,
        side: TeamSide,
        name: &str,
    ) -> Result<MatchSession, DraftError> {
        require_admin(actor, "rename a team")?;
        if !matches!(session.current_step, Step::Config | Step::Teams) {
            return Err(DraftError::IllegalAction(format!(
                "teams can't be renamed in step {}",
                session.current_step
            )));
        }

        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            self.config.default_team_name(side)
        } else {
            trimmed
        };
        let mut next = session.clone();
        next.team_mut(side).name = name.to_string();
        Ok(next)
    }

    /// `config → teams`: shuffles `roster` into two teams with captains.
    pub fn create_teams<R>(
        &self,
        session: &MatchSession,
        actor: &Actor,
        roster: &[Player],
        rng: &mut R,
    ) -> Result<MatchSession, DraftError>
    where
        R: Rng + ?Sized,
    {
        require_admin(actor, "create teams")?;
        if session.current_step != Step::Config {
            return Err(DraftError::IllegalTransition {
                from: session.current_step,
                to: Step::Teams,
            });
        }

        let (team_a, team_b) = form_teams(
            roster,
            session.team_format,
            &session.team_a.name,
            &session.team_b.name,
            rng,
        )?;

        tracing::info!(
            room_id = %session.room_id,
            format = %session.team_format,
            "teams formed"
        );
        Ok(MatchSession {
            team_a,
            team_b,
            current_step: Step::Teams,
            ..session.clone()
        })
    }

    /// `teams → ban`: every map back to active, history cleared, team A
    /// to act first.
    pub fn start_ban(
        &self,
        session: &MatchSession,
        actor: &Actor,
    ) -> Result<MatchSession, DraftError> {
        require_admin(actor, "start the ban phase")?;
        require_transition(session.current_step, Step::Ban)?;

        Ok(MatchSession {
            current_step: Step::Ban,
            maps: self.pool.fresh_states(),
            ban_history: Vec::new(),
            current_turn: TeamSide::TeamA,
            ..session.clone()
        })
    }

    /// `teams → config` or `ban → teams`. Only the step moves.
    pub fn go_back(
        &self,
        session: &MatchSession,
        actor: &Actor,
    ) -> Result<MatchSession, DraftError> {
        require_admin(actor, "go back")?;
        let from = session.current_step;
        let to = match from {
            Step::Teams => Step::Config,
            Step::Ban => Step::Teams,
            Step::Result => Step::Ban,
            Step::Config => Step::Config,
        };
        require_transition(from, to)?;

        Ok(MatchSession {
            current_step: to,
            ..session.clone()
        })
    }

    /// `result → config`: a fresh session that keeps the room id and both
    /// formats.
    pub fn reset(
        &self,
        session: &MatchSession,
        actor: &Actor,
    ) -> Result<MatchSession, DraftError> {
        require_admin(actor, "reset the match")?;
        if session.current_step != Step::Result {
            return Err(DraftError::IllegalTransition {
                from: session.current_step,
                to: Step::Config,
            });
        }

        Ok(MatchSession {
            team_format: session.team_format,
            match_format: session.match_format,
            ..self.new_session(session.room_id.clone())
        })
    }
}

fn require_config_step(session: &MatchSession, what: &str) -> Result<(), DraftError> {
    if session.current_step == Step::Config {
        Ok(())
    } else {
        Err(DraftError::IllegalAction(format!(
            "{what} can only be changed in step config, not {}",
            session.current_step
        )))
    }
}
