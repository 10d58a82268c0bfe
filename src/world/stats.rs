//! Unit stat lookup
//!
//! Stats are data owned by the host; the built-in table mirrors the shipped
//! balance sheet and can be replaced from TOML.

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{HexfallError, Result};
use crate::units::UnitType;

/// Combat and movement numbers for one unit type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub hp: u32,
    pub attack: u32,
    pub move_range: u32,
    pub attack_range: u32,
}

/// Source of per-type unit stats
pub trait StatsLookup {
    fn stats_for(&self, unit_type: UnitType) -> Option<UnitStats>;

    /// Stats or a contract error when the table has no entry
    fn require(&self, unit_type: UnitType) -> Result<UnitStats> {
        self.stats_for(unit_type)
            .ok_or(HexfallError::MissingStats(unit_type))
    }
}

/// Table-backed stats, keyed by unit type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsTable {
    entries: AHashMap<UnitType, UnitStats>,
}

impl StatsTable {
    pub fn empty() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    pub fn with(mut self, unit_type: UnitType, stats: UnitStats) -> Self {
        self.entries.insert(unit_type, stats);
        self
    }

    pub fn set(&mut self, unit_type: UnitType, stats: UnitStats) {
        self.entries.insert(unit_type, stats);
    }

    /// Parse a table such as
    ///
    /// ```toml
    /// [Scout]
    /// hp = 8
    /// attack = 2
    /// move_range = 3
    /// attack_range = 1
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl Default for StatsTable {
    fn default() -> Self {
        let stat = |hp, attack, move_range, attack_range| UnitStats {
            hp,
            attack,
            move_range,
            attack_range,
        };
        Self::empty()
            .with(UnitType::Builder, stat(6, 0, 2, 1))
            .with(UnitType::Scout, stat(8, 2, 3, 1))
            .with(UnitType::Tanker, stat(16, 3, 1, 1))
            .with(UnitType::Shooter, stat(8, 4, 2, 2))
            .with(UnitType::Bomber, stat(12, 6, 1, 3))
    }
}

impl StatsLookup for StatsTable {
    fn stats_for(&self, unit_type: UnitType) -> Option<UnitStats> {
        self.entries.get(&unit_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_every_type() {
        let table = StatsTable::default();
        for unit_type in UnitType::ALL {
            assert!(table.stats_for(unit_type).is_some(), "{:?}", unit_type);
        }
    }

    #[test]
    fn test_missing_entry_is_contract_error() {
        let table = StatsTable::empty();
        assert!(matches!(
            table.require(UnitType::Scout),
            Err(HexfallError::MissingStats(UnitType::Scout))
        ));
    }

    #[test]
    fn test_parse_toml_table() {
        let table = StatsTable::from_toml_str(
            r#"
            [Tanker]
            hp = 20
            attack = 1
            move_range = 1
            attack_range = 1
            "#,
        )
        .unwrap();
        assert_eq!(table.stats_for(UnitType::Tanker).map(|s| s.hp), Some(20));
        assert!(table.stats_for(UnitType::Scout).is_none());
    }
}
