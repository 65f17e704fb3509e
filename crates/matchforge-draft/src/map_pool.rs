//! The fixed pool of candidate maps.

use matchforge_protocol::{MapId, MapState};

/// Static description of one map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapInfo {
    pub id: &'static str,
    pub display_name: &'static str,
}

/// The competitive map pool, in display order.
pub const COMPETITIVE_MAPS: [MapInfo; 7] = [
    MapInfo { id: "mirage", display_name: "Mirage" },
    MapInfo { id: "inferno", display_name: "Inferno" },
    MapInfo { id: "nuke", display_name: "Nuke" },
    MapInfo { id: "overpass", display_name: "Overpass" },
    MapInfo { id: "ancient", display_name: "Ancient" },
    MapInfo { id: "anubis", display_name: "Anubis" },
    MapInfo { id: "vertigo", display_name: "Vertigo" },
];

/// An ordered, read-only list of maps.
///
/// The pool never changes for the lifetime of a session; every plan in
/// [`resolve_plan`](crate::resolve_plan) is sized against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapPool {
    maps: &'static [MapInfo],
}

impl MapPool {
    /// The seven-map competitive pool.
    pub const fn competitive() -> Self {
        Self {
            maps: &COMPETITIVE_MAPS,
        }
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'static, MapInfo> {
        self.maps.iter()
    }

    /// Looks up a map by id.
    pub fn get(&self, id: &MapId) -> Option<&'static MapInfo> {
        self.maps.iter().find(|m| m.id == id.as_str())
    }

    pub fn contains(&self, id: &MapId) -> bool {
        self.get(id).is_some()
    }

    /// Pool position of a map, used to order auto-decided maps.
    pub fn position(&self, id: &MapId) -> Option<usize> {
        self.maps.iter().position(|m| m.id == id.as_str())
    }

    /// Display name for a map id, falling back to the id itself.
    pub fn display_name(&self, id: &MapId) -> String {
        self.get(id)
            .map(|m| m.display_name.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Every map of the pool in status `active`.
    pub fn fresh_states(&self) -> Vec<MapState> {
        self.maps.iter().map(|m| MapState::active(m.id)).collect()
    }
}

impl Default for MapPool {
    fn default() -> Self {
        Self::competitive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchforge_protocol::MapStatus;

    #[test]
    fn test_competitive_pool_has_seven_maps() {
        let pool = MapPool::competitive();
        assert_eq!(pool.len(), 7);
        assert!(!pool.is_empty());
        assert_eq!(pool.iter().next().map(|m| m.id), Some("mirage"));
    }

    #[test]
    fn test_get_and_position() {
        let pool = MapPool::competitive();
        let nuke = MapId::new("nuke");
        assert_eq!(pool.get(&nuke).map(|m| m.display_name), Some("Nuke"));
        assert_eq!(pool.position(&nuke), Some(2));
        assert!(!pool.contains(&MapId::new("dust2")));
        assert_eq!(pool.display_name(&MapId::new("dust2")), "dust2");
    }

    #[test]
    fn test_fresh_states_all_active_in_pool_order() {
        let states = MapPool::competitive().fresh_states();
        assert_eq!(states.len(), 7);
        assert!(states.iter().all(|m| m.status == MapStatus::Active));
        assert_eq!(states[6].id, MapId::new("vertigo"));
    }
}
