//! Turf ownership: which AI base claims which tile
//!
//! Claims never overlap. A tile already claimed by one base is skipped when
//! another base floods its radius over it.

use std::collections::hash_map::Entry;

use ahash::AHashMap;

use crate::core::types::BaseId;
use crate::grid::HexCoord;
use crate::world::map::HexMap;

#[derive(Debug, Clone, Default)]
pub struct TurfMap {
    owners: AHashMap<HexCoord, BaseId>,
}

impl TurfMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim every unclaimed map tile within `radius` of `center`.
    ///
    /// Returns the number of tiles newly claimed.
    pub fn claim(&mut self, base: BaseId, center: HexCoord, radius: u32, map: &dyn HexMap) -> usize {
        let mut claimed = 0;
        for coord in map.neighbors_within_radius(center, radius) {
            if let Entry::Vacant(slot) = self.owners.entry(coord) {
                slot.insert(base);
                claimed += 1;
            }
        }
        claimed
    }

    /// Drop every claim held by `base`
    pub fn release(&mut self, base: BaseId) -> usize {
        let before = self.owners.len();
        self.owners.retain(|_, owner| *owner != base);
        before - self.owners.len()
    }

    /// Re-flood a base's turf at a new radius (release first so no stale claim survives)
    pub fn reclaim(&mut self, base: BaseId, center: HexCoord, radius: u32, map: &dyn HexMap) -> usize {
        self.release(base);
        self.claim(base, center, radius, map)
    }

    pub fn owner(&self, coord: HexCoord) -> Option<BaseId> {
        self.owners.get(&coord).copied()
    }

    /// Tiles claimed by `base`, sorted
    pub fn tiles_of(&self, base: BaseId) -> Vec<HexCoord> {
        let mut tiles: Vec<HexCoord> = self
            .owners
            .iter()
            .filter(|(_, owner)| **owner == base)
            .map(|(coord, _)| *coord)
            .collect();
        tiles.sort();
        tiles
    }

    /// All claimed tiles, sorted
    pub fn claimed(&self) -> Vec<HexCoord> {
        let mut tiles: Vec<HexCoord> = self.owners.keys().copied().collect();
        tiles.sort();
        tiles
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::map::GridMap;

    #[test]
    fn test_claim_radius() {
        let map = GridMap::hexagon(4);
        let mut turf = TurfMap::new();
        assert_eq!(turf.claim(BaseId(1), HexCoord::ORIGIN, 1, &map), 7);
        assert_eq!(turf.owner(HexCoord::new(1, 0)), Some(BaseId(1)));
        assert_eq!(turf.owner(HexCoord::new(2, 0)), None);
    }

    #[test]
    fn test_claims_do_not_overlap() {
        let map = GridMap::hexagon(4);
        let mut turf = TurfMap::new();
        turf.claim(BaseId(1), HexCoord::ORIGIN, 1, &map);
        let claimed = turf.claim(BaseId(2), HexCoord::new(2, 0), 1, &map);
        // Base 2 only gets tiles base 1 did not already hold
        assert!(claimed < 7);
        assert_eq!(turf.owner(HexCoord::new(1, 0)), Some(BaseId(1)));
        assert_eq!(turf.owner(HexCoord::new(2, 0)), Some(BaseId(2)));
    }

    #[test]
    fn test_reclaim_replaces_old_radius() {
        let map = GridMap::hexagon(4);
        let mut turf = TurfMap::new();
        turf.claim(BaseId(1), HexCoord::ORIGIN, 1, &map);
        turf.reclaim(BaseId(1), HexCoord::ORIGIN, 2, &map);
        assert_eq!(turf.tiles_of(BaseId(1)).len(), 19);
        turf.reclaim(BaseId(1), HexCoord::ORIGIN, 1, &map);
        assert_eq!(turf.tiles_of(BaseId(1)).len(), 7);
    }

    #[test]
    fn test_release_only_own_tiles() {
        let map = GridMap::hexagon(4);
        let mut turf = TurfMap::new();
        turf.claim(BaseId(1), HexCoord::ORIGIN, 1, &map);
        turf.claim(BaseId(2), HexCoord::new(3, 0), 1, &map);
        turf.release(BaseId(1));
        assert!(turf.tiles_of(BaseId(1)).is_empty());
        assert!(!turf.tiles_of(BaseId(2)).is_empty());
    }

    #[test]
    fn test_claim_clipped_to_map() {
        let map = GridMap::hexagon(1);
        let mut turf = TurfMap::new();
        assert_eq!(turf.claim(BaseId(1), HexCoord::ORIGIN, 3, &map), 7);
    }
}
