//! Base phase: bases roll to produce a unit

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::ai::context::TurnView;
use crate::ai::intent::{Actor, Intent};
use crate::ai::policies::PhasePolicy;
use crate::core::config::AiConfig;
use crate::core::types::{AiRng, Phase};
use crate::units::{UnitDirectory, UnitType};

/// Unit types drawn by the weighted roll, matching `AiConfig::spawn_weights`
const WEIGHTED_TYPES: [UnitType; 3] = [UnitType::Scout, UnitType::Tanker, UnitType::Shooter];

/// Pick the unit type a base should produce.
///
/// Priority ladder: keep a minimum number of Builders, field one Bomber
/// once the army is large, otherwise draw Scout/Tanker/Shooter by weight.
pub fn select_unit_to_spawn<R: Rng + ?Sized>(
    units: &UnitDirectory,
    config: &AiConfig,
    rng: &mut R,
) -> UnitType {
    if units.count_of(UnitType::Builder) < config.min_builders {
        return UnitType::Builder;
    }
    if units.len() > config.bomber_unit_threshold && units.count_of(UnitType::Bomber) == 0 {
        return UnitType::Bomber;
    }

    match WeightedIndex::new(config.spawn_weights) {
        Ok(weights) => WEIGHTED_TYPES[weights.sample(rng)],
        Err(e) => {
            tracing::warn!("Unusable spawn weights {:?}: {}", config.spawn_weights, e);
            UnitType::Scout
        }
    }
}

#[derive(Debug, Default)]
pub struct BasePolicy;

impl BasePolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PhasePolicy for BasePolicy {
    fn phase(&self) -> Phase {
        Phase::Base
    }

    /// Every live base, shuffled
    fn actors(&mut self, view: &TurnView, rng: &mut AiRng) -> Vec<Actor> {
        let mut bases = view.state.bases.ids();
        bases.shuffle(rng);
        bases.into_iter().map(Actor::Base).collect()
    }

    fn decide(&mut self, actor: Actor, view: &TurnView, rng: &mut AiRng) -> Option<Intent> {
        let Actor::Base(id) = actor else {
            return None;
        };
        let base = view.state.bases.get(id)?;

        if !base.is_alive()
            || !view.map.is_standable(base.position)
            || !view.state.bases.can_house_more_units(id)
        {
            return None;
        }
        if !rng.gen_bool(view.config.spawn_probability) {
            return None;
        }

        let unit_type = select_unit_to_spawn(&view.state.units, view.config, rng);
        Some(Intent::Spawn { base: id, unit_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::policies::testing::Fixture;
    use crate::grid::HexCoord;

    #[test]
    fn test_ladder_prefers_builders() {
        let mut fx = Fixture::new();
        fx.unit(UnitType::Builder, HexCoord::new(2, 0));
        for seed in 0..20 {
            let mut rng = AiRng::seed_from_u64(seed);
            assert_eq!(
                select_unit_to_spawn(&fx.state.units, &fx.config, &mut rng),
                UnitType::Builder
            );
        }
    }

    #[test]
    fn test_ladder_adds_bomber_to_large_army() {
        let mut fx = Fixture::new();
        let coords: Vec<HexCoord> = HexCoord::ORIGIN.hexes_in_range(2).into_iter().take(12).collect();
        for (i, coord) in coords.into_iter().enumerate() {
            let unit_type = if i < 2 { UnitType::Builder } else { UnitType::Scout };
            fx.unit(unit_type, coord);
        }
        assert_eq!(
            select_unit_to_spawn(&fx.state.units, &fx.config, &mut fx.rng),
            UnitType::Bomber
        );

        fx.unit(UnitType::Bomber, HexCoord::new(5, 0));
        let next = select_unit_to_spawn(&fx.state.units, &fx.config, &mut fx.rng);
        assert!(WEIGHTED_TYPES.contains(&next));
    }

    #[test]
    fn test_weighted_roll_covers_all_types() {
        let mut fx = Fixture::new();
        fx.unit(UnitType::Builder, HexCoord::new(2, 0));
        fx.unit(UnitType::Builder, HexCoord::new(3, 0));

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(select_unit_to_spawn(&fx.state.units, &fx.config, &mut fx.rng));
        }
        assert_eq!(seen.len(), 3);
        assert!(!seen.contains(&UnitType::Bomber));
    }

    #[test]
    fn test_occupied_base_does_not_spawn() {
        let mut fx = Fixture::new();
        fx.config.spawn_probability = 1.0;
        let base = fx.base(HexCoord::ORIGIN);
        fx.unit(UnitType::Scout, HexCoord::ORIGIN);

        let mut policy = BasePolicy::new();
        let intent = fx.with_view(|view, rng| policy.decide(Actor::Base(base), view, rng));
        assert_eq!(intent, None);
    }

    #[test]
    fn test_certain_spawn_emits_intent() {
        let mut fx = Fixture::new();
        fx.config.spawn_probability = 1.0;
        let base = fx.base(HexCoord::ORIGIN);

        let mut policy = BasePolicy::new();
        let actors = fx.with_view(|view, rng| policy.actors(view, rng));
        assert_eq!(actors, vec![Actor::Base(base)]);

        let intent = fx.with_view(|view, rng| policy.decide(Actor::Base(base), view, rng));
        assert_eq!(
            intent,
            Some(Intent::Spawn {
                base,
                unit_type: UnitType::Builder
            })
        );
    }
}
