//! AI unit record and its enumerations

use serde::{Deserialize, Serialize};

use crate::core::types::{BaseId, UnitId};
use crate::grid::HexCoord;

/// Unit types the AI can field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    Builder,
    Scout,
    Tanker,
    Shooter,
    Bomber,
}

impl UnitType {
    pub const ALL: [UnitType; 5] = [
        UnitType::Builder,
        UnitType::Scout,
        UnitType::Tanker,
        UnitType::Shooter,
        UnitType::Bomber,
    ];

    /// Builders found bases; everything else fights
    pub fn is_combatant(&self) -> bool {
        !matches!(self, UnitType::Builder)
    }
}

/// Visibility-driven behavior mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitState {
    /// Unseen by the opponent: wanders
    #[default]
    Dormant,
    /// Seen by the opponent: seeks combat
    Aggressive,
}

impl UnitState {
    /// State a unit should be in given whether the opponent sees it
    pub fn for_visibility(visible: bool) -> Self {
        if visible {
            UnitState::Aggressive
        } else {
            UnitState::Dormant
        }
    }
}

/// An AI-controlled unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub position: HexCoord,
    /// Where the unit entered the board
    pub origin: HexCoord,
    pub hp: u32,
    pub state: UnitState,
    /// Base this unit counts against; a back-reference, not ownership
    pub housed_base: Option<BaseId>,
    pub has_acted: bool,
    pub just_spawned: bool,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Fresh units sit out the turn they were spawned in
    pub fn can_move(&self) -> bool {
        !self.just_spawned
    }

    pub fn can_attack(&self) -> bool {
        self.can_move()
    }

    /// Can still take an action this turn
    pub fn is_ready(&self) -> bool {
        self.can_move() && !self.has_acted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_builder_is_non_combatant() {
        let combatants = UnitType::ALL.iter().filter(|t| t.is_combatant()).count();
        assert_eq!(combatants, 4);
        assert!(!UnitType::Builder.is_combatant());
    }

    #[test]
    fn test_state_from_visibility() {
        assert_eq!(UnitState::for_visibility(true), UnitState::Aggressive);
        assert_eq!(UnitState::for_visibility(false), UnitState::Dormant);
        assert_eq!(UnitState::default(), UnitState::Dormant);
    }
}
