//! What a turn runs against
//!
//! [`Collaborators`] bundles the host systems the core borrows for one turn.
//! [`TurnView`] is the read-only slice policies decide from; only the
//! executor ever sees anything mutable.

use crate::ai::state::AiState;
use crate::core::config::AiConfig;
use crate::core::types::BaseId;
use crate::grid::HexCoord;
use crate::units::Unit;
use crate::world::battlefield::Battlefield;
use crate::world::map::HexMap;
use crate::world::stats::{StatsLookup, UnitStats};
use crate::world::visibility::Visibility;

/// Host systems borrowed for the length of a turn
pub struct Collaborators<'a> {
    pub map: &'a mut dyn HexMap,
    pub stats: &'a dyn StatsLookup,
    pub visibility: &'a dyn Visibility,
    pub battlefield: &'a mut dyn Battlefield,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        map: &'a mut dyn HexMap,
        stats: &'a dyn StatsLookup,
        visibility: &'a dyn Visibility,
        battlefield: &'a mut dyn Battlefield,
    ) -> Self {
        Self {
            map,
            stats,
            visibility,
            battlefield,
        }
    }
}

/// Read-only view handed to policies
pub struct TurnView<'a> {
    pub state: &'a AiState,
    pub map: &'a dyn HexMap,
    pub stats: &'a dyn StatsLookup,
    pub visibility: &'a dyn Visibility,
    pub battlefield: &'a dyn Battlefield,
    pub config: &'a AiConfig,
}

impl<'a> TurnView<'a> {
    pub fn new(state: &'a AiState, world: &'a Collaborators<'_>, config: &'a AiConfig) -> Self {
        Self {
            state,
            map: &*world.map,
            stats: world.stats,
            visibility: world.visibility,
            battlefield: &*world.battlefield,
            config,
        }
    }

    pub fn stats_of(&self, unit: &Unit) -> Option<UnitStats> {
        let stats = self.stats.stats_for(unit.unit_type);
        if stats.is_none() {
            tracing::warn!("No stats for {:?}, unit {} cannot plan", unit.unit_type, unit.id);
        }
        stats
    }

    pub fn is_visible(&self, coord: HexCoord) -> bool {
        self.visibility.is_visible_to_opponent(coord)
    }

    /// Movement blocker for reachability queries
    pub fn blocked(&self, coord: HexCoord) -> bool {
        self.map.blocks_movement(coord)
    }

    /// Base whose turf covers `coord`
    pub fn turf_owner(&self, coord: HexCoord) -> Option<BaseId> {
        self.state.bases.turf_owner(coord)
    }

    /// Tile carries a resource inside AI turf
    pub fn is_developable(&self, coord: HexCoord) -> bool {
        self.map.tile_features(coord).resource.is_some() && self.turf_owner(coord).is_some()
    }

    /// Tile carries a grove inside AI turf
    pub fn is_buildable(&self, coord: HexCoord) -> bool {
        self.map.tile_features(coord).grove_level().is_some() && self.turf_owner(coord).is_some()
    }

    /// Closest coordinate by hex distance, ties to the first listed
    pub fn nearest(from: HexCoord, candidates: impl IntoIterator<Item = HexCoord>) -> Option<HexCoord> {
        candidates.into_iter().min_by_key(|c| from.distance(c))
    }
}
