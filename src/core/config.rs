//! Enemy AI configuration with documented constants
//!
//! All magic numbers used by the turn policies are collected here with
//! explanations of their purpose and how they interact with each other.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{HexfallError, Result};

/// Configuration for the enemy turn
///
/// Defaults reproduce the shipped game balance. Any field can be
/// overridden from TOML; missing fields keep their default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    // === SPAWNING ===
    /// Chance that an eligible base spawns a unit during the base phase
    pub spawn_probability: f64,

    /// Builders are always spawned while fewer than this many exist
    pub min_builders: usize,

    /// Once the AI fields more units than this and has no Bomber, spawn one
    pub bomber_unit_threshold: usize,

    /// Relative weights for the Scout / Tanker / Shooter roll
    ///
    /// Only the ratio matters. 40/40/20 means Shooters are half as common
    /// as either of the other two.
    pub spawn_weights: [u32; 3],

    // === BASES ===
    /// Units a single base can keep alive at once
    pub max_housed_units: u32,

    /// Initial base hp is rolled uniformly from `[min, max)`
    pub base_hp_range: (u32, u32),

    /// Population needed for each level-up, indexed by current level - 1.
    ///
    /// Levels past the end of the list reuse the last entry, so
    /// `[2, 3, 4]` means 2 for 1→2, 3 for 2→3 and 4 thereafter.
    pub upgrade_thresholds: Vec<u32>,

    /// Hp added to a base on every level-up
    pub upgrade_hp_bonus: u32,

    /// Score granted when a level-up reward is taken as points
    pub upgrade_score_bonus: u32,

    /// Turf radius of a freshly founded base
    pub initial_turf_radius: u32,

    /// Radius added when a level-up reward is taken as territory
    pub turf_growth: u32,

    // === AUXILIARY ACTIONS ===
    /// Chance a normal auxiliary unit researches instead of developing
    pub tech_unlock_chance: f64,

    /// Techs the AI can unlock over a whole game
    pub tech_cap: u32,

    /// Population granted to the owning base by developing a fish tile
    pub fish_population: u32,

    /// Population granted to the owning base by clearing debris
    pub debris_population: u32,

    /// Flat score granted for any tile development
    pub develop_score_bonus: u32,

    // === MOVEMENT ===
    /// Chance a dormant unit wanders toward its origin rather than away
    pub dormant_approach_chance: f64,

    /// Maximum A* node expansions before a search gives up
    ///
    /// Keeps a search on an open-ended walkable predicate finite.
    pub path_search_budget: usize,

    // === PACING ===
    /// Delay between unit actions and between path steps, in milliseconds
    ///
    /// Zero means headless: the turn still yields to the scheduler between
    /// steps but never sleeps.
    pub step_delay_ms: u64,

    /// A phase that has not completed after this long is a stall
    pub phase_timeout_ms: u64,

    /// Seed for the session RNG
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 0.45,
            min_builders: 2,
            bomber_unit_threshold: 10,
            spawn_weights: [40, 40, 20],

            max_housed_units: 3,
            base_hp_range: (20, 36),
            upgrade_thresholds: vec![2, 3, 4],
            upgrade_hp_bonus: 5,
            upgrade_score_bonus: 10,
            initial_turf_radius: 1,
            turf_growth: 1,

            tech_unlock_chance: 0.3,
            tech_cap: 13,
            fish_population: 1,
            debris_population: 2,
            develop_score_bonus: 5,

            dormant_approach_chance: 0.5,
            path_search_budget: 4096,

            step_delay_ms: 0,
            phase_timeout_ms: 30_000,
            seed: 42,
        }
    }
}

impl AiConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AiConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Population required to advance from `level` to `level + 1`
    pub fn population_for_level(&self, level: u32) -> u32 {
        let index = (level.max(1) - 1) as usize;
        self.upgrade_thresholds
            .get(index)
            .or_else(|| self.upgrade_thresholds.last())
            .copied()
            .unwrap_or(u32::MAX)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let chances = [
            ("spawn_probability", self.spawn_probability),
            ("tech_unlock_chance", self.tech_unlock_chance),
            ("dormant_approach_chance", self.dormant_approach_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(HexfallError::InvalidConfig(format!(
                    "{} ({}) must be within [0, 1]",
                    name, value
                )));
            }
        }

        if self.spawn_weights.iter().all(|w| *w == 0) {
            return Err(HexfallError::InvalidConfig(
                "spawn_weights must not all be zero".into(),
            ));
        }

        let (min_hp, max_hp) = self.base_hp_range;
        if min_hp == 0 || min_hp >= max_hp {
            return Err(HexfallError::InvalidConfig(format!(
                "base_hp_range ({}, {}) must be a non-empty range above zero",
                min_hp, max_hp
            )));
        }

        // A zero threshold would level a base forever
        if self.upgrade_thresholds.is_empty() || self.upgrade_thresholds.contains(&0) {
            return Err(HexfallError::InvalidConfig(
                "upgrade_thresholds must be non-empty and positive".into(),
            ));
        }

        if self.initial_turf_radius == 0 {
            return Err(HexfallError::InvalidConfig(
                "initial_turf_radius must be at least 1".into(),
            ));
        }

        if self.phase_timeout_ms == 0 {
            return Err(HexfallError::InvalidConfig(
                "phase_timeout_ms must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_population_thresholds() {
        let config = AiConfig::default();
        assert_eq!(config.population_for_level(1), 2);
        assert_eq!(config.population_for_level(2), 3);
        assert_eq!(config.population_for_level(3), 4);
        assert_eq!(config.population_for_level(9), 4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AiConfig::from_toml_str("spawn_probability = 1.0\nseed = 7\n").unwrap();
        assert_eq!(config.spawn_probability, 1.0);
        assert_eq!(config.seed, 7);
        assert_eq!(config.tech_cap, 13);
    }

    #[test]
    fn test_rejects_out_of_range_chance() {
        let result = AiConfig::from_toml_str("tech_unlock_chance = 1.5");
        assert!(matches!(result, Err(HexfallError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_hp_range() {
        let config = AiConfig {
            base_hp_range: (20, 20),
            ..AiConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
