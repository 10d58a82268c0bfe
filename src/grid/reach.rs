//! Range-limited reachability (flood fill)

use std::collections::{HashSet, VecDeque};

use crate::grid::hex::HexCoord;

/// Hexes a mover at `from` can reach within `range` steps.
///
/// Expansion never enters a hex for which `blocked` returns true. The
/// starting hex is not part of the result. When `forced_target` is given it
/// is included as soon as the fill touches it within range even if it is
/// blocked, but the fill never expands through it; this lets a caller treat
/// an occupied destination (an attack-adjacent target, say) specially.
pub fn reachable(
    from: HexCoord,
    range: u32,
    blocked: impl Fn(HexCoord) -> bool,
    forced_target: Option<HexCoord>,
) -> HashSet<HexCoord> {
    let mut result = HashSet::new();
    let mut seen = HashSet::new();
    let mut frontier = VecDeque::new();

    seen.insert(from);
    frontier.push_back((from, 0u32));

    while let Some((coord, steps)) = frontier.pop_front() {
        if steps >= range {
            continue;
        }
        for neighbor in coord.neighbors() {
            if !seen.insert(neighbor) {
                continue;
            }
            if Some(neighbor) == forced_target {
                result.insert(neighbor);
                continue;
            }
            if blocked(neighbor) {
                continue;
            }
            result.insert(neighbor);
            frontier.push_back((neighbor, steps + 1));
        }
    }

    result
}

/// Reachable hexes sorted by coordinate, for callers that pick by index
pub fn reachable_sorted(
    from: HexCoord,
    range: u32,
    blocked: impl Fn(HexCoord) -> bool,
) -> Vec<HexCoord> {
    let mut hexes: Vec<HexCoord> = reachable(from, range, blocked, None).into_iter().collect();
    hexes.sort();
    hexes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn open(_: HexCoord) -> bool {
        false
    }

    #[test]
    fn test_open_field_matches_ring_count() {
        let result = reachable(HexCoord::ORIGIN, 2, open, None);
        // 19 hexes within 2, minus the start
        assert_eq!(result.len(), 18);
        assert!(!result.contains(&HexCoord::ORIGIN));
    }

    #[test]
    fn test_zero_range_is_empty() {
        assert!(reachable(HexCoord::ORIGIN, 0, open, None).is_empty());
    }

    #[test]
    fn test_wall_blocks_expansion() {
        // Ring of walls at distance 1: nothing beyond is reachable
        let walls: HashSet<HexCoord> = HexCoord::ORIGIN.neighbors().into_iter().collect();
        let result = reachable(HexCoord::ORIGIN, 3, |c| walls.contains(&c), None);
        assert!(result.is_empty());
    }

    #[test]
    fn test_forced_target_included_but_not_expanded() {
        let target = HexCoord::new(1, 0);
        let result = reachable(HexCoord::ORIGIN, 3, |c| c == target, Some(target));
        assert!(result.contains(&target));
        // (2, 0) is still reachable by walking around the target
        assert!(result.contains(&HexCoord::new(2, 0)));
    }

    #[test]
    fn test_everything_blocked_yields_empty() {
        assert!(reachable(HexCoord::ORIGIN, 4, |_| true, None).is_empty());
    }

    #[test]
    fn test_sorted_is_stable() {
        let a = reachable_sorted(HexCoord::new(2, 2), 2, open);
        let b = reachable_sorted(HexCoord::new(2, 2), 2, open);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_reachable_within_range(q in -10i32..10, r in -10i32..10, range in 0u32..5, wall_q in -3i32..3) {
            let from = HexCoord::new(q, r);
            let result = reachable(from, range, |c| c.q == q + wall_q && wall_q != 0, None);
            for hex in result {
                prop_assert!(from.distance(&hex) <= range);
            }
        }
    }
}
