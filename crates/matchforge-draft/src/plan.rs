//! Draft plans: which actions a match format needs, in which order.

use matchforge_protocol::{ActionKind, MatchFormat};

use crate::DraftError;

use ActionKind::{Ban, Pick};

const MD1_ORDER: [ActionKind; 6] = [Ban, Ban, Ban, Ban, Ban, Ban];
const MD3_ORDER: [ActionKind; 6] = [Ban, Ban, Ban, Ban, Pick, Pick];
const MD5_ORDER: [ActionKind; 6] = [Pick, Pick, Ban, Ban, Pick, Pick];

/// The ordered action sequence for one match format and the number of
/// maps it leaves to be played.
///
/// For every format, `action_order.len() + final_map_count` equals the
/// size of the competitive pool: once every planned action is taken,
/// exactly `final_map_count` maps remain undecided or picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftPlan {
    pub format: MatchFormat,
    pub action_order: &'static [ActionKind],
    pub final_map_count: usize,
}

impl DraftPlan {
    /// Number of actions in the plan.
    pub fn len(&self) -> usize {
        self.action_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.action_order.is_empty()
    }

    /// The action due once `taken` actions have been accepted, or `None`
    /// when the plan is exhausted.
    pub fn action_at(&self, taken: usize) -> Option<ActionKind> {
        self.action_order.get(taken).copied()
    }

    pub fn total_bans(&self) -> usize {
        self.action_order.iter().filter(|a| **a == Ban).count()
    }

    pub fn total_picks(&self) -> usize {
        self.action_order.iter().filter(|a| **a == Pick).count()
    }
}

/// Resolves the plan for a match format.
pub fn resolve_plan(format: MatchFormat) -> DraftPlan {
    match format {
        MatchFormat::Md1 => DraftPlan {
            format,
            action_order: &MD1_ORDER,
            final_map_count: 1,
        },
        MatchFormat::Md3 => DraftPlan {
            format,
            action_order: &MD3_ORDER,
            final_map_count: 3,
        },
        MatchFormat::Md5 => DraftPlan {
            format,
            action_order: &MD5_ORDER,
            final_map_count: 5,
        },
    }
}

/// Resolves the plan for a format given by name (`"md1"`, `"md3"`, `"md5"`).
///
/// # Errors
/// [`DraftError::InvalidFormat`] for any other name.
pub fn resolve_plan_named(name: &str) -> Result<DraftPlan, DraftError> {
    name.parse::<MatchFormat>()
        .map(resolve_plan)
        .map_err(|_| DraftError::InvalidFormat(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapPool;

    #[test]
    fn test_resolve_plan_covers_whole_pool() {
        let pool = MapPool::competitive();
        for format in MatchFormat::ALL {
            let plan = resolve_plan(format);
            assert_eq!(
                plan.len() + plan.final_map_count,
                pool.len(),
                "{format} plan does not consume the pool"
            );
        }
    }

    #[test]
    fn test_resolve_plan_md1() {
        let plan = resolve_plan(MatchFormat::Md1);
        assert_eq!(plan.action_order, &[Ban; 6]);
        assert_eq!(plan.final_map_count, 1);
        assert_eq!(plan.total_picks(), 0);
    }

    #[test]
    fn test_resolve_plan_md3() {
        let plan = resolve_plan(MatchFormat::Md3);
        assert_eq!(plan.action_order, &[Ban, Ban, Ban, Ban, Pick, Pick]);
        assert_eq!(plan.final_map_count, 3);
        assert_eq!(plan.total_bans(), 4);
        assert_eq!(plan.total_picks(), 2);
    }

    #[test]
    fn test_resolve_plan_md5() {
        let plan = resolve_plan(MatchFormat::Md5);
        assert_eq!(plan.action_order, &[Pick, Pick, Ban, Ban, Pick, Pick]);
        assert_eq!(plan.final_map_count, 5);
    }

    #[test]
    fn test_action_at_past_end_is_none() {
        let plan = resolve_plan(MatchFormat::Md3);
        assert_eq!(plan.action_at(0), Some(Ban));
        assert_eq!(plan.action_at(4), Some(Pick));
        assert_eq!(plan.action_at(6), None);
    }

    #[test]
    fn test_resolve_plan_named_unknown_is_invalid_format() {
        assert_eq!(resolve_plan_named("md5").unwrap().final_map_count, 5);
        assert_eq!(
            resolve_plan_named("bo7"),
            Err(DraftError::InvalidFormat("bo7".into()))
        );
    }
}
