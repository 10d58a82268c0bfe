//! Opponent visibility (fog of war seam)
//!
//! The host's fog-of-war system decides what the player can see; AI units
//! switch between dormant and aggressive based on it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::grid::HexCoord;

/// Answers whether the opposing side can currently see a hex
pub trait Visibility {
    fn is_visible_to_opponent(&self, coord: HexCoord) -> bool;
}

/// Set of hexes currently visible to the opponent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionSet {
    pub visible: HashSet<HexCoord>,
}

impl VisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything within `range` of each observer
    pub fn from_observers(observers: &[HexCoord], range: u32) -> Self {
        let visible = observers
            .iter()
            .flat_map(|o| o.hexes_in_range(range))
            .collect();
        Self { visible }
    }

    pub fn reveal(&mut self, coord: HexCoord) {
        self.visible.insert(coord);
    }

    pub fn hide(&mut self, coord: HexCoord) {
        self.visible.remove(&coord);
    }
}

impl Visibility for VisionSet {
    fn is_visible_to_opponent(&self, coord: HexCoord) -> bool {
        self.visible.contains(&coord)
    }
}
