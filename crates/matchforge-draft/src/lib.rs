//! Team formation and ban/pick draft engine for Matchforge.
//!
//! Everything in this crate is synchronous and pure: an operation takes the
//! last observed [`MatchSession`](matchforge_protocol::MatchSession) and
//! returns a new one, or a [`DraftError`] with nothing changed. Sharing the
//! result between clients is the job of the store and the client.
//!
//! # Key types
//!
//! - [`DraftMachine`]: applies [`Intent`]s for an [`Actor`]
//! - [`DraftPlan`]: the ban/pick order of a match format
//! - [`MapPool`]: the maps a draft runs over
//! - [`DraftEvent`]: what changed between two observed sessions
//! - [`VetoBoard`]: local admin-only veto without teams or turns
//! - [`DraftConfig`]: default names and formats

mod config;
mod error;
mod event;
mod machine;
mod map_pool;
mod plan;
mod resolver;
mod teams;
mod veto;

pub use config::DraftConfig;
pub use error::DraftError;
pub use event::{DraftEvent, derive_events};
pub use machine::{Actor, DraftMachine, Intent, can_act, is_legal_transition};
pub use map_pool::{COMPETITIVE_MAPS, MapInfo, MapPool};
pub use plan::{DraftPlan, resolve_plan, resolve_plan_named};
pub use resolver::{apply_action, current_action, final_maps, total_actions};
pub use teams::form_teams;
pub use veto::{VetoBoard, VetoMark};
