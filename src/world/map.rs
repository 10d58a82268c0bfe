//! Map query seam and an in-memory hex map
//!
//! The host game owns tile identity. The AI core only asks questions about
//! tiles and flips the handful of flags it is responsible for (occupancy,
//! developed resources, grove/base structures).

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::grid::HexCoord;

/// Neutral or AI structure standing on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Structure {
    /// Neutral site a Builder can develop into a base.
    ///
    /// Destroyed bases revert to a grove that remembers their level.
    Grove { former_level: u32 },
    /// Tile hosts a live AI base
    Base,
}

/// Developable resource feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Fish,
    Debris,
}

/// Feature summary for one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileFeatures {
    pub structure: Option<Structure>,
    pub resource: Option<Resource>,
    pub walled: bool,
}

impl TileFeatures {
    pub fn grove_level(&self) -> Option<u32> {
        match self.structure {
            Some(Structure::Grove { former_level }) => Some(former_level),
            _ => None,
        }
    }
}

/// Map queries the AI needs from the host
pub trait HexMap {
    /// Is this coordinate part of the map at all?
    fn contains(&self, coord: HexCoord) -> bool;

    /// Can a unit ever stand here (ignoring other units)?
    fn is_walkable(&self, coord: HexCoord) -> bool;

    fn is_occupied(&self, coord: HexCoord) -> bool;

    fn set_occupied(&mut self, coord: HexCoord, occupied: bool);

    fn tile_features(&self, coord: HexCoord) -> TileFeatures;

    fn set_structure(&mut self, coord: HexCoord, structure: Option<Structure>);

    /// Remove the resource feature, returning what was there
    fn clear_resource(&mut self, coord: HexCoord) -> Option<Resource>;

    /// Every coordinate on the map
    fn coords(&self) -> Vec<HexCoord>;

    /// Map coordinates within `radius` of `coord`, center included
    fn neighbors_within_radius(&self, coord: HexCoord, radius: u32) -> Vec<HexCoord> {
        coord
            .hexes_in_range(radius)
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Walkable and free
    fn is_standable(&self, coord: HexCoord) -> bool {
        self.is_walkable(coord) && !self.is_occupied(coord)
    }

    /// Movement blocker used by reachability queries
    fn blocks_movement(&self, coord: HexCoord) -> bool {
        !self.is_standable(coord)
    }

    /// Coordinates of all groves, sorted
    fn groves(&self) -> Vec<HexCoord> {
        let mut groves: Vec<HexCoord> = self
            .coords()
            .into_iter()
            .filter(|c| self.tile_features(*c).grove_level().is_some())
            .collect();
        groves.sort();
        groves
    }
}

/// A single tile of a [`GridMap`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tile {
    pub walkable: bool,
    pub occupied: bool,
    pub features: TileFeatures,
}

impl Tile {
    pub fn land() -> Self {
        Self {
            walkable: true,
            ..Self::default()
        }
    }
}

/// In-memory hex map for headless play and tests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridMap {
    tiles: AHashMap<HexCoord, Tile>,
}

impl GridMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hexagonal island of walkable land with the given radius
    pub fn hexagon(radius: u32) -> Self {
        let tiles = HexCoord::ORIGIN
            .hexes_in_range(radius)
            .into_iter()
            .map(|c| (c, Tile::land()))
            .collect();
        Self { tiles }
    }

    pub fn insert(&mut self, coord: HexCoord, tile: Tile) {
        self.tiles.insert(coord, tile);
    }

    pub fn tile(&self, coord: HexCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn set_walkable(&mut self, coord: HexCoord, walkable: bool) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.walkable = walkable;
        }
    }

    pub fn set_wall(&mut self, coord: HexCoord, walled: bool) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.features.walled = walled;
        }
    }

    pub fn set_resource(&mut self, coord: HexCoord, resource: Option<Resource>) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.features.resource = resource;
        }
    }

    /// Number of occupied tiles
    pub fn occupied_count(&self) -> usize {
        self.tiles.values().filter(|t| t.occupied).count()
    }
}

impl HexMap for GridMap {
    fn contains(&self, coord: HexCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    fn is_walkable(&self, coord: HexCoord) -> bool {
        self.tiles
            .get(&coord)
            .is_some_and(|t| t.walkable && !t.features.walled)
    }

    fn is_occupied(&self, coord: HexCoord) -> bool {
        self.tiles.get(&coord).is_some_and(|t| t.occupied)
    }

    fn set_occupied(&mut self, coord: HexCoord, occupied: bool) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.occupied = occupied;
        }
    }

    fn tile_features(&self, coord: HexCoord) -> TileFeatures {
        self.tiles
            .get(&coord)
            .map(|t| t.features)
            .unwrap_or_default()
    }

    fn set_structure(&mut self, coord: HexCoord, structure: Option<Structure>) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.features.structure = structure;
        }
    }

    fn clear_resource(&mut self, coord: HexCoord) -> Option<Resource> {
        self.tiles
            .get_mut(&coord)
            .and_then(|t| t.features.resource.take())
    }

    fn coords(&self) -> Vec<HexCoord> {
        let mut coords: Vec<HexCoord> = self.tiles.keys().copied().collect();
        coords.sort();
        coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexagon_size() {
        assert_eq!(GridMap::hexagon(2).len(), 19);
    }

    #[test]
    fn test_off_map_is_not_walkable() {
        let map = GridMap::hexagon(1);
        assert!(!map.is_walkable(HexCoord::new(5, 5)));
        assert!(!map.is_standable(HexCoord::new(5, 5)));
    }

    #[test]
    fn test_wall_blocks_walking() {
        let mut map = GridMap::hexagon(2);
        let c = HexCoord::new(1, 0);
        map.set_wall(c, true);
        assert!(!map.is_walkable(c));
        assert!(map.tile_features(c).walled);
    }

    #[test]
    fn test_occupancy_flag() {
        let mut map = GridMap::hexagon(1);
        let c = HexCoord::new(0, 1);
        map.set_occupied(c, true);
        assert!(map.is_occupied(c));
        assert!(!map.is_standable(c));
        assert_eq!(map.occupied_count(), 1);
    }

    #[test]
    fn test_groves_listed() {
        let mut map = GridMap::hexagon(2);
        map.set_structure(HexCoord::new(2, 0), Some(Structure::Grove { former_level: 2 }));
        map.set_structure(HexCoord::new(0, 0), Some(Structure::Base));
        assert_eq!(map.groves(), vec![HexCoord::new(2, 0)]);
        assert_eq!(map.tile_features(HexCoord::new(2, 0)).grove_level(), Some(2));
    }

    #[test]
    fn test_clear_resource_once() {
        let mut map = GridMap::hexagon(1);
        let c = HexCoord::new(1, 0);
        map.set_resource(c, Some(Resource::Fish));
        assert_eq!(map.clear_resource(c), Some(Resource::Fish));
        assert_eq!(map.clear_resource(c), None);
    }

    #[test]
    fn test_radius_clipped_to_map() {
        let map = GridMap::hexagon(1);
        assert_eq!(map.neighbors_within_radius(HexCoord::new(1, 0), 1).len(), 4);
    }
}
