//! Builder phase: Builders walk to groves and found bases on them

use crate::ai::context::TurnView;
use crate::ai::intent::{Actor, Intent};
use crate::ai::policies::PhasePolicy;
use crate::core::types::{AiRng, Phase};
use crate::grid::{greedy_step_toward, random_reachable, HexCoord};
use crate::units::{Unit, UnitType};

#[derive(Debug, Default)]
pub struct BuilderPolicy;

impl BuilderPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Nearest grove by hex distance, turf or not.
    ///
    /// The Builder's own tile never counts, it is either buildable already
    /// or a dead end.
    fn target_grove(unit: &Unit, view: &TurnView) -> Option<HexCoord> {
        let groves = view
            .map
            .groves()
            .into_iter()
            .filter(|g| *g != unit.position);
        TurnView::nearest(unit.position, groves)
    }
}

impl PhasePolicy for BuilderPolicy {
    fn phase(&self) -> Phase {
        Phase::Builder
    }

    fn actors(&mut self, view: &TurnView, _rng: &mut AiRng) -> Vec<Actor> {
        view.state
            .units
            .iter()
            .filter(|u| u.unit_type == UnitType::Builder)
            .map(|u| Actor::Unit(u.id))
            .collect()
    }

    fn decide(&mut self, actor: Actor, view: &TurnView, rng: &mut AiRng) -> Option<Intent> {
        let Actor::Unit(id) = actor else {
            return None;
        };
        let unit = view.state.units.get(id)?;
        if unit.has_acted {
            return None;
        }

        if view.is_buildable(unit.position) {
            return Some(Intent::BuildBase {
                unit: id,
                coord: unit.position,
            });
        }
        if !unit.can_move() {
            return None;
        }

        let move_range = view.stats_of(unit)?.move_range;
        let blocked = |c: HexCoord| view.blocked(c);
        let destination = match Self::target_grove(unit, view) {
            Some(grove) => greedy_step_toward(unit.position, grove, move_range, blocked, true)?,
            None => random_reachable(unit.position, move_range, blocked, rng)?,
        };

        if destination == unit.position {
            return None;
        }
        Some(Intent::Move {
            unit: id,
            destination,
        })
    }
}
