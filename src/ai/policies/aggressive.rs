//! Aggressive phase: spotted units attack what they can reach and
//! otherwise march on an opponent base.

use ahash::AHashMap;
use rand::prelude::*;

use crate::ai::context::TurnView;
use crate::ai::intent::{Actor, Intent};
use crate::ai::policies::PhasePolicy;
use crate::core::types::{AiRng, Phase, UnitId};
use crate::grid::greedy_step_toward;
use crate::units::{Unit, UnitState};
use crate::world::battlefield::{Target, TargetKind};

#[derive(Debug, Default)]
pub struct AggressivePolicy {
    /// Opponent base each unit is marching on, kept across turns
    locked_targets: AHashMap<UnitId, u32>,
}

impl AggressivePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locked_target(&self, unit: UnitId) -> Option<u32> {
        self.locked_targets.get(&unit).copied()
    }

    /// Uniform pick within the highest-priority class of targets in range
    fn pick_target(unit: &Unit, attack_range: u32, view: &TurnView, rng: &mut AiRng) -> Option<Target> {
        let in_range = view.battlefield.targets_within(unit.position, attack_range);
        let best_kind = in_range.iter().map(|t| t.kind).min()?;
        let class: Vec<Target> = in_range.into_iter().filter(|t| t.kind == best_kind).collect();
        class.choose(rng).copied()
    }

    /// Keep the previous march target while it stands, else lock the nearest
    fn march_target(&mut self, unit: &Unit, view: &TurnView) -> Option<Target> {
        let bases = view.battlefield.opponent_bases();

        if let Some(locked) = self.locked_targets.get(&unit.id) {
            if let Some(target) = bases.iter().find(|b| b.id == *locked) {
                return Some(*target);
            }
        }

        let nearest = bases
            .into_iter()
            .min_by_key(|b| (b.position.distance(&unit.position), b.id))?;
        self.locked_targets.insert(unit.id, nearest.id);
        tracing::debug!("{} locked onto opponent base #{}", unit.id, nearest.id);
        Some(nearest)
    }
}

impl PhasePolicy for AggressivePolicy {
    fn phase(&self) -> Phase {
        Phase::Aggressive
    }

    fn actors(&mut self, view: &TurnView, _rng: &mut AiRng) -> Vec<Actor> {
        // Forget units that no longer exist
        self.locked_targets.retain(|id, _| view.state.units.contains(*id));

        view.state
            .units
            .iter()
            .filter(|u| u.unit_type.is_combatant())
            .map(|u| Actor::Unit(u.id))
            .collect()
    }

    fn decide(&mut self, actor: Actor, view: &TurnView, rng: &mut AiRng) -> Option<Intent> {
        let Actor::Unit(id) = actor else {
            return None;
        };
        let unit = view.state.units.get(id)?;
        if unit.state != UnitState::Aggressive || !unit.unit_type.is_combatant() || !unit.is_ready() {
            return None;
        }
        let stats = view.stats_of(unit)?;

        if let Some(target) = Self::pick_target(unit, stats.attack_range, view, rng) {
            return Some(Intent::Attack {
                unit: id,
                kind: target.kind,
                target: target.id,
            });
        }

        let goal = self.march_target(unit, view)?;
        let step = greedy_step_toward(
            unit.position,
            goal.position,
            stats.move_range,
            |c| view.blocked(c),
            true,
        )?;
        (step != unit.position).then_some(Intent::Move {
            unit: id,
            destination: step,
        })
    }
}
