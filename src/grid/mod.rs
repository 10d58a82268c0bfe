//! Hex grid geometry and search
//!
//! Pure functions over axial coordinates. Nothing here knows about tiles,
//! units or bases; callers describe the board through predicates.

pub mod hex;
pub mod pathfinding;
pub mod reach;

pub use hex::{HexCoord, AXIAL_DIRECTIONS};
pub use pathfinding::{
    find_path, find_path_with_budget, greedy_step_toward, random_reachable, DEFAULT_SEARCH_BUDGET,
};
pub use reach::{reachable, reachable_sorted};
