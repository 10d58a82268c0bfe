//! AI bases: registry, level progression and turf

pub mod base;
pub mod directory;

pub use base::{Base, BaseDamage, LevelUp, UpgradeReward};
pub use directory::BaseDirectory;
