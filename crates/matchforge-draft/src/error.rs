//! Error types for the draft engine.

use matchforge_protocol::Step;

/// Validation errors raised by the draft engine.
///
/// Every one of these is produced before a write is attempted: the engine
/// never hands an invalid session to the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// A match or team format name that has no plan.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The roster doesn't have exactly the players the team format needs.
    #[error("roster has {actual} players, {expected} required")]
    RosterSizeMismatch { expected: usize, actual: usize },

    /// The step graph has no edge between these two steps.
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition { from: Step, to: Step },

    /// The intent doesn't fit the current session (wrong step, map not
    /// active, ban where a pick is due, etc.).
    #[error("illegal action: {0}")]
    IllegalAction(String),

    /// The actor isn't allowed to do this.
    #[error("forbidden: {0}")]
    Forbidden(String),
}
