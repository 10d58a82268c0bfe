//! External collaborator seams
//!
//! The AI core consumes the host's map, stat table, fog of war and opposing
//! side through these traits. Each comes with a small in-memory
//! implementation used by the demo binary and the tests.

pub mod battlefield;
pub mod map;
pub mod stats;
pub mod turf;
pub mod visibility;

pub use battlefield::{Battlefield, Skirmish, StrikeResult, Target, TargetKind};
pub use map::{GridMap, HexMap, Resource, Structure, Tile, TileFeatures};
pub use stats::{StatsLookup, StatsTable, UnitStats};
pub use turf::TurfMap;
pub use visibility::{Visibility, VisionSet};
