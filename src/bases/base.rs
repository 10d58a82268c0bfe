//! AI base record

use serde::{Deserialize, Serialize};

use crate::core::types::BaseId;
use crate::grid::HexCoord;

/// An AI base: produces units, owns turf, levels up from population
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    pub id: BaseId,
    pub position: HexCoord,
    pub hp: u32,
    pub level: u32,
    /// Population accumulated toward the next level
    pub population: u32,
    /// Live units counted against this base
    pub housed_units: u32,
    pub turf_radius: u32,
}

impl Base {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Reward picked when a base levels up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeReward {
    ScoreBonus,
    TurfExpansion,
}

/// One level gained by a base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub base: BaseId,
    pub new_level: u32,
    pub new_hp: u32,
}

/// Result of damage dealt to a base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseDamage {
    pub remaining_hp: u32,
    pub destroyed: bool,
    pub level: u32,
}
