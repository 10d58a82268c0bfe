//! Dormant phase: unseen units drift around where they came from

use rand::prelude::*;

use crate::ai::context::TurnView;
use crate::ai::intent::{Actor, Intent};
use crate::ai::policies::PhasePolicy;
use crate::core::types::{AiRng, Phase};
use crate::grid::{reachable_sorted, HexCoord};
use crate::units::{Unit, UnitState};

#[derive(Debug, Default)]
pub struct DormantPolicy;

impl DormantPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Anchor a dormant unit wanders around: its housing base while that
    /// stands, otherwise where it entered the board
    pub fn origin_of(unit: &Unit, view: &TurnView) -> HexCoord {
        unit.housed_base
            .and_then(|id| view.state.bases.get(id))
            .map(|b| b.position)
            .unwrap_or(unit.origin)
    }
}

impl PhasePolicy for DormantPolicy {
    fn phase(&self) -> Phase {
        Phase::Dormant
    }

    fn actors(&mut self, view: &TurnView, _rng: &mut AiRng) -> Vec<Actor> {
        view.state
            .units
            .iter()
            .filter(|u| u.state == UnitState::Dormant)
            .map(|u| Actor::Unit(u.id))
            .collect()
    }

    fn decide(&mut self, actor: Actor, view: &TurnView, rng: &mut AiRng) -> Option<Intent> {
        let Actor::Unit(id) = actor else {
            return None;
        };
        let unit = view.state.units.get(id)?;
        // Units spotted earlier in the phase are left to the aggressive phase
        if unit.state != UnitState::Dormant || view.is_visible(unit.position) || !unit.is_ready() {
            return None;
        }

        let move_range = view.stats_of(unit)?.move_range;
        let origin = Self::origin_of(unit, view);
        let here = unit.position.distance(&origin);
        let approach = rng.gen_bool(view.config.dormant_approach_chance);

        let candidates = reachable_sorted(unit.position, move_range, |c| view.blocked(c));
        let preferred: Vec<HexCoord> = candidates
            .iter()
            .copied()
            .filter(|c| {
                let there = c.distance(&origin);
                if approach {
                    there < here
                } else {
                    there > here
                }
            })
            .collect();

        let pool = if preferred.is_empty() { &candidates } else { &preferred };
        let destination = *pool.choose(rng)?;
        Some(Intent::Move {
            unit: id,
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::policies::testing::Fixture;
    use crate::units::UnitType;

    fn decide_many(fx: &mut Fixture, id: crate::core::types::UnitId, runs: usize) -> Vec<HexCoord> {
        let mut policy = DormantPolicy::new();
        (0..runs)
            .filter_map(|_| {
                fx.with_view(|view, rng| match policy.decide(Actor::Unit(id), view, rng) {
                    Some(Intent::Move { destination, .. }) => Some(destination),
                    _ => None,
                })
            })
            .collect()
    }

    #[test]
    fn test_always_approach() {
        let mut fx = Fixture::new();
        fx.config.dormant_approach_chance = 1.0;
        let base = fx.base(HexCoord::ORIGIN);
        let id = fx
            .state
            .units
            .register(UnitType::Tanker, Some(base), HexCoord::new(3, 0), &fx.stats, &mut fx.map, &mut fx.state.bases)
            .unwrap();
        fx.state.units.clear_just_spawned();

        let moves = decide_many(&mut fx, id, 10);
        assert_eq!(moves.len(), 10);
        for destination in moves {
            assert!(destination.distance(&HexCoord::ORIGIN) < 3);
        }
    }

    #[test]
    fn test_always_retreat() {
        let mut fx = Fixture::new();
        fx.config.dormant_approach_chance = 0.0;
        let base = fx.base(HexCoord::ORIGIN);
        let id = fx
            .state
            .units
            .register(UnitType::Scout, Some(base), HexCoord::new(1, 0), &fx.stats, &mut fx.map, &mut fx.state.bases)
            .unwrap();
        fx.state.units.clear_just_spawned();

        let moves = decide_many(&mut fx, id, 10);
        assert_eq!(moves.len(), 10);
        for destination in moves {
            assert!(destination.distance(&HexCoord::ORIGIN) > 1);
        }
    }

    #[test]
    fn test_visible_unit_stays_put() {
        let mut fx = Fixture::new();
        let id = fx.unit(UnitType::Scout, HexCoord::ORIGIN);
        fx.vision.reveal(HexCoord::ORIGIN);
        assert!(decide_many(&mut fx, id, 3).is_empty());
    }

    #[test]
    fn test_falls_back_when_no_direction_fits() {
        // Sitting on its origin a unit cannot get any closer
        let mut fx = Fixture::new();
        fx.config.dormant_approach_chance = 1.0;
        let id = fx.unit(UnitType::Tanker, HexCoord::ORIGIN);
        let moves = decide_many(&mut fx, id, 5);
        assert_eq!(moves.len(), 5);
        assert!(moves.iter().all(|d| d.distance(&HexCoord::ORIGIN) == 1));
    }

    #[test]
    fn test_origin_falls_back_to_entry_point() {
        let mut fx = Fixture::new();
        let base = fx.base(HexCoord::ORIGIN);
        let id = fx
            .state
            .units
            .register(UnitType::Scout, Some(base), HexCoord::new(2, 0), &fx.stats, &mut fx.map, &mut fx.state.bases)
            .unwrap();

        let unit = fx.state.units.get(id).unwrap().clone();
        assert_eq!(fx.with_view(|view, _| DormantPolicy::origin_of(&unit, view)), HexCoord::ORIGIN);

        fx.state.bases.take_damage(base, 1000, &mut fx.map);
        assert_eq!(
            fx.with_view(|view, _| DormantPolicy::origin_of(&unit, view)),
            HexCoord::new(2, 0)
        );
    }
}
