//! Registry of AI bases
//!
//! Owns base records and the turf map. Base destruction hands the tile back
//! to the map as a grove that remembers the base's level.

use std::collections::BTreeMap;

use rand::Rng;

use crate::bases::base::{Base, BaseDamage, LevelUp, UpgradeReward};
use crate::core::config::AiConfig;
use crate::core::types::BaseId;
use crate::grid::HexCoord;
use crate::world::map::{HexMap, Structure};
use crate::world::turf::TurfMap;

#[derive(Debug, Clone)]
pub struct BaseDirectory {
    rules: AiConfig,
    bases: BTreeMap<BaseId, Base>,
    turf: TurfMap,
    next_id: u32,
}

impl BaseDirectory {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            rules: config.clone(),
            bases: BTreeMap::new(),
            turf: TurfMap::new(),
            next_id: 1,
        }
    }

    /// Found a base at `position` and claim its turf.
    ///
    /// Hp is rolled once from the configured range.
    pub fn register<R: Rng + ?Sized>(
        &mut self,
        position: HexCoord,
        level: u32,
        map: &mut dyn HexMap,
        rng: &mut R,
    ) -> BaseId {
        let id = BaseId(self.next_id);
        self.next_id += 1;

        let (min_hp, max_hp) = self.rules.base_hp_range;
        let hp = rng.gen_range(min_hp..max_hp);

        let base = Base {
            id,
            position,
            hp,
            level: level.max(1),
            population: 0,
            housed_units: 0,
            turf_radius: self.rules.initial_turf_radius,
        };

        let claimed = self.turf.claim(id, position, base.turf_radius, &*map);
        map.set_structure(position, Some(Structure::Base));
        tracing::debug!(
            "Registered {} at {:?} (hp {}, level {}, {} turf tiles)",
            id,
            position,
            hp,
            base.level,
            claimed
        );

        self.bases.insert(id, base);
        id
    }

    /// Subtract hp; at zero the base is removed, its turf released and the
    /// tile reverted to a grove carrying the former level.
    pub fn take_damage(&mut self, id: BaseId, amount: u32, map: &mut dyn HexMap) -> Option<BaseDamage> {
        let base = self.bases.get_mut(&id)?;
        base.hp = base.hp.saturating_sub(amount);
        let result = BaseDamage {
            remaining_hp: base.hp,
            destroyed: base.hp == 0,
            level: base.level,
        };

        if result.destroyed {
            self.destroy(id, map);
        }
        Some(result)
    }

    fn destroy(&mut self, id: BaseId, map: &mut dyn HexMap) {
        if let Some(base) = self.bases.remove(&id) {
            self.turf.release(id);
            map.set_structure(
                base.position,
                Some(Structure::Grove {
                    former_level: base.level,
                }),
            );
            tracing::info!("{} destroyed at {:?}, reverted to grove", id, base.position);
        }
    }

    /// Grant population and immediately level up as many times as it pays for
    pub fn add_population(&mut self, id: BaseId, amount: u32) -> Vec<LevelUp> {
        let mut level_ups = Vec::new();
        let Some(base) = self.bases.get_mut(&id) else {
            return level_ups;
        };

        base.population += amount;
        loop {
            let threshold = self.rules.population_for_level(base.level);
            if base.population < threshold {
                break;
            }
            base.population -= threshold;
            base.level += 1;
            base.hp += self.rules.upgrade_hp_bonus;
            level_ups.push(LevelUp {
                base: id,
                new_level: base.level,
                new_hp: base.hp,
            });
        }

        level_ups
    }

    /// Apply a level-up reward. Returns the score it grants.
    pub fn apply_reward(&mut self, id: BaseId, reward: UpgradeReward, map: &dyn HexMap) -> u32 {
        let Some(base) = self.bases.get_mut(&id) else {
            return 0;
        };

        match reward {
            UpgradeReward::ScoreBonus => self.rules.upgrade_score_bonus,
            UpgradeReward::TurfExpansion => {
                base.turf_radius += self.rules.turf_growth;
                let (position, radius) = (base.position, base.turf_radius);
                self.turf.reclaim(id, position, radius, map);
                0
            }
        }
    }

    pub fn can_house_more_units(&self, id: BaseId) -> bool {
        self.bases
            .get(&id)
            .is_some_and(|b| b.housed_units < self.rules.max_housed_units)
    }

    pub fn on_unit_housed(&mut self, id: BaseId) {
        if let Some(base) = self.bases.get_mut(&id) {
            base.housed_units += 1;
        }
    }

    pub fn on_unit_lost(&mut self, id: BaseId) {
        if let Some(base) = self.bases.get_mut(&id) {
            base.housed_units = base.housed_units.saturating_sub(1);
        }
    }

    pub fn get(&self, id: BaseId) -> Option<&Base> {
        self.bases.get(&id)
    }

    pub fn contains(&self, id: BaseId) -> bool {
        self.bases.contains_key(&id)
    }

    /// Live bases in id order
    pub fn iter(&self) -> impl Iterator<Item = &Base> {
        self.bases.values()
    }

    pub fn ids(&self) -> Vec<BaseId> {
        self.bases.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn turf(&self) -> &TurfMap {
        &self.turf
    }

    /// Owning base of a tile, if any live base claims it
    pub fn turf_owner(&self, coord: HexCoord) -> Option<BaseId> {
        self.turf.owner(coord)
    }
}
