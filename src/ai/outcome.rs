//! Outcome notifications for the host
//!
//! Renderers, audio and UI react to these instead of querying the core
//! while a turn is running. The host drains the log whenever it likes.

use serde::{Deserialize, Serialize};

use crate::ai::intent::{Intent, RejectReason};
use crate::bases::UpgradeReward;
use crate::core::types::{BaseId, Phase, TurnNumber, UnitId};
use crate::grid::HexCoord;
use crate::units::{UnitState, UnitType};
use crate::world::battlefield::TargetKind;
use crate::world::map::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    TurnStarted {
        turn: TurnNumber,
    },
    PhaseStarted {
        turn: TurnNumber,
        phase: Phase,
    },
    PhaseCompleted {
        turn: TurnNumber,
        phase: Phase,
        applied: usize,
    },
    TurnEnded {
        turn: TurnNumber,
    },
    UnitSpawned {
        unit: UnitId,
        unit_type: UnitType,
        /// Housing base; `None` for units placed by the host
        base: Option<BaseId>,
        position: HexCoord,
    },
    /// One hex of a move, for step-by-step animation
    UnitStepped {
        unit: UnitId,
        from: HexCoord,
        to: HexCoord,
    },
    UnitMoved {
        unit: UnitId,
        from: HexCoord,
        to: HexCoord,
    },
    UnitAttacked {
        unit: UnitId,
        kind: TargetKind,
        target: u32,
        damage: u32,
        remaining_hp: u32,
        destroyed: bool,
        counter_damage: u32,
    },
    UnitKilled {
        unit: UnitId,
        position: HexCoord,
    },
    UnitStateChanged {
        unit: UnitId,
        state: UnitState,
    },
    BaseBuilt {
        base: BaseId,
        position: HexCoord,
        level: u32,
        builder: UnitId,
    },
    BaseUpgraded {
        base: BaseId,
        level: u32,
        hp: u32,
        reward: UpgradeReward,
    },
    BaseDestroyed {
        base: BaseId,
        position: HexCoord,
        level: u32,
    },
    TileDeveloped {
        unit: UnitId,
        position: HexCoord,
        resource: Resource,
        base: BaseId,
        population: u32,
    },
    TechUnlocked {
        unit: UnitId,
        total: u32,
    },
    ActionRejected {
        intent: Intent,
        reason: RejectReason,
    },
}

impl Outcome {
    /// Short stable name of the variant, for tallies and log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::TurnStarted { .. } => "turn_started",
            Outcome::PhaseStarted { .. } => "phase_started",
            Outcome::PhaseCompleted { .. } => "phase_completed",
            Outcome::TurnEnded { .. } => "turn_ended",
            Outcome::UnitSpawned { .. } => "unit_spawned",
            Outcome::UnitStepped { .. } => "unit_stepped",
            Outcome::UnitMoved { .. } => "unit_moved",
            Outcome::UnitAttacked { .. } => "unit_attacked",
            Outcome::UnitKilled { .. } => "unit_killed",
            Outcome::UnitStateChanged { .. } => "unit_state_changed",
            Outcome::BaseBuilt { .. } => "base_built",
            Outcome::BaseUpgraded { .. } => "base_upgraded",
            Outcome::BaseDestroyed { .. } => "base_destroyed",
            Outcome::TileDeveloped { .. } => "tile_developed",
            Outcome::TechUnlocked { .. } => "tech_unlocked",
            Outcome::ActionRejected { .. } => "action_rejected",
        }
    }
}

/// Queue of outcomes awaiting the host
#[derive(Debug, Clone, Default)]
pub struct OutcomeLog {
    pub events: Vec<Outcome>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: Outcome) {
        self.events.push(outcome);
    }

    /// Take every queued outcome, oldest first
    pub fn drain(&mut self) -> Vec<Outcome> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_log() {
        let mut log = OutcomeLog::new();
        log.push(Outcome::TurnStarted { turn: 1 });
        log.push(Outcome::TurnEnded { turn: 1 });
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_outcome_serializes_for_host() {
        let json = serde_json::to_string(&Outcome::UnitMoved {
            unit: UnitId(1),
            from: HexCoord::new(0, 0),
            to: HexCoord::new(1, 0),
        })
        .unwrap();
        assert!(json.contains("UnitMoved"));
        assert_eq!(
            Outcome::TechUnlocked {
                unit: UnitId(1),
                total: 1
            }
            .kind(),
            "tech_unlocked"
        );
    }
}
