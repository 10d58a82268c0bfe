//! A* pathfinding over the hex grid
//!
//! Walkability and occupancy come from caller-supplied predicates so the
//! search knows nothing about tiles. Also hosts the cheap movement helpers
//! used by agents that do not need a full search every step.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::hex::HexCoord;
use crate::grid::reach::reachable_sorted;

/// Default cap on node expansions for [`find_path`]
pub const DEFAULT_SEARCH_BUDGET: usize = 4096;

/// Node in the A* open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathNode {
    coord: HexCoord,
    f_cost: u32,
    h_cost: u32,
    /// Insertion order, the last tie-break
    seq: u64,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path using A* with uniform step cost.
///
/// Occupied hexes block the path except the goal itself; whether arriving on
/// an occupied goal is legal is the caller's call. Returns an empty vec when
/// the goal cannot be reached.
pub fn find_path(
    start: HexCoord,
    goal: HexCoord,
    walkable: impl Fn(HexCoord) -> bool,
    occupied: impl Fn(HexCoord) -> bool,
) -> Vec<HexCoord> {
    find_path_with_budget(start, goal, walkable, occupied, DEFAULT_SEARCH_BUDGET)
}

/// [`find_path`] with an explicit expansion budget
pub fn find_path_with_budget(
    start: HexCoord,
    goal: HexCoord,
    walkable: impl Fn(HexCoord) -> bool,
    occupied: impl Fn(HexCoord) -> bool,
    budget: usize,
) -> Vec<HexCoord> {
    if start == goal {
        return vec![start];
    }
    if !walkable(goal) {
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut closed: HashSet<HexCoord> = HashSet::new();
    let mut came_from: HashMap<HexCoord, HexCoord> = HashMap::new();
    let mut g_scores: HashMap<HexCoord, u32> = HashMap::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    let h = start.distance(&goal);
    open_set.push(PathNode {
        coord: start,
        f_cost: h,
        h_cost: h,
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return reconstruct_path(&came_from, goal);
        }
        if !closed.insert(current.coord) {
            continue;
        }
        if closed.len() > budget {
            tracing::trace!("A* budget exhausted searching {:?} -> {:?}", start, goal);
            break;
        }

        let current_g = g_scores[&current.coord];

        for neighbor in current.coord.neighbors() {
            if closed.contains(&neighbor) || !walkable(neighbor) {
                continue;
            }
            if neighbor != goal && occupied(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                let h_cost = neighbor.distance(&goal);
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + h_cost,
                    h_cost,
                    seq,
                });
            }
        }
    }

    Vec::new()
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &HashMap<HexCoord, HexCoord>, mut current: HexCoord) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// One greedy move toward `target` without a full search.
///
/// Considers the hexes reachable within `move_range` that do not increase
/// the distance to `target` and returns the closest one. When nothing
/// qualifies the mover stays on `from` if `can_stay`, otherwise it takes the
/// first reachable hex. `None` only when it can neither stay nor move.
pub fn greedy_step_toward(
    from: HexCoord,
    target: HexCoord,
    move_range: u32,
    blocked: impl Fn(HexCoord) -> bool,
    can_stay: bool,
) -> Option<HexCoord> {
    let current = from.distance(&target);
    let candidates = reachable_sorted(from, move_range, blocked);

    let best = candidates
        .iter()
        .copied()
        .filter(|hex| hex.distance(&target) <= current)
        .min_by_key(|hex| (hex.distance(&target), from.distance(hex)));

    match best {
        Some(hex) if hex.distance(&target) < current || !can_stay => Some(hex),
        _ if can_stay => Some(from),
        _ => candidates.first().copied(),
    }
}

/// Uniform pick among the hexes reachable within `move_range`
pub fn random_reachable<R: Rng + ?Sized>(
    from: HexCoord,
    move_range: u32,
    blocked: impl Fn(HexCoord) -> bool,
    rng: &mut R,
) -> Option<HexCoord> {
    reachable_sorted(from, move_range, blocked).choose(rng).copied()
}
