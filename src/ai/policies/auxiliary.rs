//! Auxiliary phase: develop resource tiles and unlock techs.
//!
//! The AI gets one auxiliary roll per two live bases each turn. Units
//! already standing on a developable tile spend the budget first.

use rand::Rng;

use crate::ai::context::TurnView;
use crate::ai::intent::{Actor, Intent};
use crate::ai::policies::PhasePolicy;
use crate::core::types::{AiRng, Phase};
use crate::grid::{greedy_step_toward, HexCoord};
use crate::units::{Unit, UnitType};

#[derive(Debug, Default)]
pub struct AuxiliaryPolicy {
    remaining: usize,
}

impl AuxiliaryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions left in this phase
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn eligible(unit: &Unit) -> bool {
        unit.unit_type != UnitType::Builder && unit.is_ready()
    }

    /// Nearest resource tile in turf nobody stands on
    fn nearest_resource(unit: &Unit, view: &TurnView) -> Option<HexCoord> {
        let candidates = view
            .map
            .coords()
            .into_iter()
            .filter(|c| view.is_developable(*c) && !view.map.is_occupied(*c));
        TurnView::nearest(unit.position, candidates)
    }

    fn develop(unit: &Unit, view: &TurnView) -> Option<Intent> {
        if view.is_developable(unit.position) {
            return Some(Intent::DevelopTile {
                unit: unit.id,
                coord: unit.position,
            });
        }

        let target = Self::nearest_resource(unit, view)?;
        let move_range = view.stats_of(unit)?.move_range;
        let step = greedy_step_toward(unit.position, target, move_range, |c| view.blocked(c), true)?;
        (step != unit.position).then_some(Intent::Move {
            unit: unit.id,
            destination: step,
        })
    }
}

impl PhasePolicy for AuxiliaryPolicy {
    fn phase(&self) -> Phase {
        Phase::Auxiliary
    }

    /// Priority units (on a developable tile) first, then the rest, each in id order
    fn actors(&mut self, view: &TurnView, _rng: &mut AiRng) -> Vec<Actor> {
        self.remaining = view.state.bases.iter().filter(|b| b.is_alive()).count() / 2;
        if self.remaining == 0 {
            return Vec::new();
        }

        let (priority, normal): (Vec<&Unit>, Vec<&Unit>) = view
            .state
            .units
            .iter()
            .filter(|u| Self::eligible(u))
            .partition(|u| view.is_developable(u.position));

        tracing::debug!(
            "Auxiliary budget {} ({} priority, {} normal)",
            self.remaining,
            priority.len(),
            normal.len()
        );
        priority
            .into_iter()
            .chain(normal)
            .map(|u| Actor::Unit(u.id))
            .collect()
    }

    fn decide(&mut self, actor: Actor, view: &TurnView, rng: &mut AiRng) -> Option<Intent> {
        if self.remaining == 0 {
            return None;
        }
        let Actor::Unit(id) = actor else {
            return None;
        };
        let unit = view.state.units.get(id)?;
        if !Self::eligible(unit) {
            return None;
        }

        // The slot is spent once a unit is asked, even if it ends up idle
        self.remaining -= 1;

        if view.is_developable(unit.position) {
            return Self::develop(unit, view);
        }
        let tech_open = view.state.techs_unlocked < view.config.tech_cap;
        if rng.gen_bool(view.config.tech_unlock_chance) && tech_open {
            Some(Intent::UnlockTech { unit: id })
        } else {
            Self::develop(unit, view)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::policies::testing::Fixture;
    use crate::world::map::Resource;

    #[test]
    fn test_no_budget_below_two_bases() {
        let mut fx = Fixture::new();
        fx.base(HexCoord::ORIGIN);
        fx.unit(UnitType::Scout, HexCoord::new(2, 0));

        let mut policy = AuxiliaryPolicy::new();
        let actors = fx.with_view(|view, rng| policy.actors(view, rng));
        assert!(actors.is_empty());
        assert_eq!(policy.remaining(), 0);
    }

    #[test]
    fn test_priority_units_first_and_budget_spent() {
        let mut fx = Fixture::new();
        fx.base(HexCoord::new(-4, 0));
        fx.base(HexCoord::new(4, 0));
        let resource = HexCoord::new(4, -1);
        fx.map.set_resource(resource, Some(Resource::Fish));

        let roamer = fx.unit(UnitType::Scout, HexCoord::ORIGIN);
        let harvester = fx.unit(UnitType::Tanker, resource);
        fx.unit(UnitType::Builder, HexCoord::new(0, 2));

        let mut policy = AuxiliaryPolicy::new();
        let actors = fx.with_view(|view, rng| policy.actors(view, rng));
        assert_eq!(actors, vec![Actor::Unit(harvester), Actor::Unit(roamer)]);
        assert_eq!(policy.remaining(), 1);

        let first = fx.with_view(|view, rng| policy.decide(actors[0], view, rng));
        assert_eq!(
            first,
            Some(Intent::DevelopTile {
                unit: harvester,
                coord: resource
            })
        );
        let second = fx.with_view(|view, rng| policy.decide(actors[1], view, rng));
        assert_eq!(second, None);
    }

    #[test]
    fn test_capped_tech_falls_back_to_develop() {
        let mut fx = Fixture::new();
        fx.config.tech_unlock_chance = 1.0;
        fx.state.techs_unlocked = fx.config.tech_cap;
        fx.base(HexCoord::new(-4, 0));
        fx.base(HexCoord::new(4, 0));
        fx.map.set_resource(HexCoord::new(-4, 1), Some(Resource::Debris));
        let id = fx.unit(UnitType::Scout, HexCoord::new(-1, 0));

        let mut policy = AuxiliaryPolicy::new();
        fx.with_view(|view, rng| policy.actors(view, rng));
        let intent = fx.with_view(|view, rng| policy.decide(Actor::Unit(id), view, rng));

        let Some(Intent::Move { destination, .. }) = intent else {
            panic!("expected a move, got {:?}", intent);
        };
        assert!(destination.distance(&HexCoord::new(-4, 1)) < HexCoord::new(-1, 0).distance(&HexCoord::new(-4, 1)));
    }

    #[test]
    fn test_idle_develop_still_spends_the_slot() {
        let mut fx = Fixture::new();
        fx.config.tech_unlock_chance = 0.0;
        fx.base(HexCoord::new(-4, 0));
        fx.base(HexCoord::new(4, 0));
        let first = fx.unit(UnitType::Scout, HexCoord::ORIGIN);
        let second = fx.unit(UnitType::Scout, HexCoord::new(1, 0));

        let mut policy = AuxiliaryPolicy::new();
        fx.with_view(|view, rng| policy.actors(view, rng));
        let intent = fx.with_view(|view, rng| policy.decide(Actor::Unit(first), view, rng));
        assert_eq!(intent, None);
        assert_eq!(policy.remaining(), 0);

        let intent = fx.with_view(|view, rng| policy.decide(Actor::Unit(second), view, rng));
        assert_eq!(intent, None);
    }

    #[test]
    fn test_tech_rate_follows_unlock_chance() {
        let mut fx = Fixture::new();
        fx.base(HexCoord::new(-4, 0));
        fx.base(HexCoord::new(4, 0));
        for q in -2..=2 {
            fx.unit(UnitType::Scout, HexCoord::new(q, 2));
        }

        let mut policy = AuxiliaryPolicy::new();
        let phases = 2000;
        let mut techs = 0;
        for _ in 0..phases {
            let actors = fx.with_view(|view, rng| policy.actors(view, rng));
            for actor in actors {
                let intent = fx.with_view(|view, rng| policy.decide(actor, view, rng));
                if matches!(intent, Some(Intent::UnlockTech { .. })) {
                    techs += 1;
                }
            }
        }

        // Budget of one with nothing to develop: one 30% roll per phase
        let rate = techs as f64 / phases as f64;
        assert!((0.25..0.35).contains(&rate), "tech rate {}", rate);
    }

    #[test]
    fn test_certain_tech_roll() {
        let mut fx = Fixture::new();
        fx.config.tech_unlock_chance = 1.0;
        fx.base(HexCoord::new(-4, 0));
        fx.base(HexCoord::new(4, 0));
        let id = fx.unit(UnitType::Shooter, HexCoord::ORIGIN);

        let mut policy = AuxiliaryPolicy::new();
        fx.with_view(|view, rng| policy.actors(view, rng));
        let intent = fx.with_view(|view, rng| policy.decide(Actor::Unit(id), view, rng));
        assert_eq!(intent, Some(Intent::UnlockTech { unit: id }));
    }
}
