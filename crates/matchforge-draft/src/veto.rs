//! A local veto board: the admin marks maps directly, with no teams,
//! captains or turns involved.
//!
//! Nothing here is shared through the store. The board keeps only the
//! explicit marks; `decider` is never stored and is recomputed on every
//! read from the counts of the other statuses.

use matchforge_protocol::{MapId, MapState, MapStatus, MatchFormat};

use crate::{Actor, DraftError, DraftPlan, MapPool, resolve_plan};

/// A mark the admin can put on an active map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VetoMark {
    Ban,
    PickA,
    PickB,
}

impl VetoMark {
    fn status(self) -> MapStatus {
        match self {
            Self::Ban => MapStatus::Banned,
            Self::PickA => MapStatus::PickA,
            Self::PickB => MapStatus::PickB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VetoBoard {
    format: MatchFormat,
    pool: MapPool,
    maps: Vec<MapState>,
}

impl VetoBoard {
    /// A board over the competitive pool with every map active.
    pub fn new(format: MatchFormat) -> Self {
        let pool = MapPool::competitive();
        Self {
            format,
            pool,
            maps: pool.fresh_states(),
        }
    }

    pub fn format(&self) -> MatchFormat {
        self.format
    }

    fn plan(&self) -> DraftPlan {
        resolve_plan(self.format)
    }

    /// Marks an active map.
    ///
    /// # Errors
    /// - [`DraftError::Forbidden`] for a non-admin actor.
    /// - [`DraftError::IllegalAction`] for an unknown map, a map that is no
    ///   longer active (the derived decider included), or a pick on a board
    ///   whose format has no picks.
    pub fn mark(
        &mut self,
        actor: &Actor,
        map_id: &MapId,
        mark: VetoMark,
    ) -> Result<(), DraftError> {
        if !actor.is_admin {
            return Err(DraftError::Forbidden(format!(
                "only the admin can mark maps (session {})",
                actor.session_id
            )));
        }
        if mark != VetoMark::Ban && self.plan().total_picks() == 0 {
            return Err(DraftError::IllegalAction(format!(
                "{} has no picks",
                self.format
            )));
        }
        if self.decider().is_some_and(|d| &d.id == map_id) {
            return Err(DraftError::IllegalAction(format!(
                "map {map_id} is the decider"
            )));
        }

        let map = self
            .maps
            .iter_mut()
            .find(|m| &m.id == map_id)
            .ok_or_else(|| DraftError::IllegalAction(format!("unknown map {map_id}")))?;
        if map.status != MapStatus::Active {
            return Err(DraftError::IllegalAction(format!(
                "map {map_id} is already {}",
                map.status
            )));
        }
        map.status = mark.status();
        Ok(())
    }

    fn count(&self, status: MapStatus) -> usize {
        self.maps.iter().filter(|m| m.status == status).count()
    }

    /// The lone active map, once enough maps are banned and picked.
    pub fn decider(&self) -> Option<MapState> {
        let plan = self.plan();
        let picks_each = plan.total_picks() / 2;

        let mut active = self.maps.iter().filter(|m| m.status == MapStatus::Active);
        let lone = active.next()?;
        if active.next().is_some() {
            return None;
        }

        let ready = self.count(MapStatus::PickA) >= picks_each
            && self.count(MapStatus::PickB) >= picks_each
            && self.count(MapStatus::Banned) >= plan.total_bans();
        ready.then(|| MapState {
            status: MapStatus::Decider,
            ..lone.clone()
        })
    }

    /// Every map with its status as shown, the decider included.
    pub fn statuses(&self) -> Vec<MapState> {
        let decider = self.decider();
        self.maps
            .iter()
            .map(|m| match &decider {
                Some(d) if d.id == m.id => d.clone(),
                _ => m.clone(),
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.decider().is_some()
    }

    /// Team A and team B picks interleaved (A1, B1, A2, B2, ...) in pool
    /// order, followed by the decider if there is one.
    pub fn final_maps(&self) -> Vec<MapState> {
        let picks_a: Vec<&MapState> =
            self.maps.iter().filter(|m| m.status == MapStatus::PickA).collect();
        let picks_b: Vec<&MapState> =
            self.maps.iter().filter(|m| m.status == MapStatus::PickB).collect();

        let mut maps = Vec::with_capacity(picks_a.len() + picks_b.len() + 1);
        for i in 0..picks_a.len().max(picks_b.len()) {
            maps.extend(picks_a.get(i).map(|m| (*m).clone()));
            maps.extend(picks_b.get(i).map(|m| (*m).clone()));
        }
        maps.extend(self.decider());
        maps
    }

    /// Returns every map to active, optionally switching format.
    ///
    /// Changing format always goes through here, so a board never mixes
    /// marks from two plans.
    pub fn reset(
        &mut self,
        actor: &Actor,
        format: Option<MatchFormat>,
    ) -> Result<(), DraftError> {
        if !actor.is_admin {
            return Err(DraftError::Forbidden(format!(
                "only the admin can reset the board (session {})",
                actor.session_id
            )));
        }
        if let Some(format) = format {
            self.format = format;
        }
        self.maps = self.pool.fresh_states();
        Ok(())
    }
}
