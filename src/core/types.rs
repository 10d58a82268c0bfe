//! Core type definitions used throughout the codebase

use std::fmt;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Identifier of an AI-controlled unit.
///
/// Allocated monotonically by the unit directory and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Identifier of an AI base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BaseId(pub u32);

impl fmt::Display for BaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "base#{}", self.0)
    }
}

/// Enemy turn counter
pub type TurnNumber = u32;

/// The random source every AI decision draws from
pub type AiRng = ChaCha8Rng;

/// One stage of the enemy turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Base,
    Builder,
    Auxiliary,
    Dormant,
    Aggressive,
}

impl Phase {
    /// Phases in the order a turn runs them
    pub const ORDER: [Phase; 5] = [
        Phase::Base,
        Phase::Builder,
        Phase::Auxiliary,
        Phase::Dormant,
        Phase::Aggressive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Base => "base",
            Phase::Builder => "builder",
            Phase::Auxiliary => "auxiliary",
            Phase::Dormant => "dormant",
            Phase::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_is_fixed() {
        assert_eq!(Phase::ORDER[0], Phase::Base);
        assert_eq!(Phase::ORDER[4], Phase::Aggressive);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(UnitId(7).to_string(), "unit#7");
        assert_eq!(BaseId(2).to_string(), "base#2");
    }
}
