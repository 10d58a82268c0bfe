//! State the AI owns between turns

use crate::ai::outcome::{Outcome, OutcomeLog};
use crate::bases::BaseDirectory;
use crate::core::config::AiConfig;
use crate::core::types::UnitId;
use crate::units::{StateRequest, UnitDirectory, UnitState};
use crate::world::visibility::Visibility;

#[derive(Debug, Clone)]
pub struct AiState {
    pub units: UnitDirectory,
    pub bases: BaseDirectory,
    pub score: u32,
    pub techs_unlocked: u32,
    pub outcomes: OutcomeLog,
}

impl AiState {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            units: UnitDirectory::new(),
            bases: BaseDirectory::new(config),
            score: 0,
            techs_unlocked: 0,
            outcomes: OutcomeLog::new(),
        }
    }

    /// Request the visibility-appropriate state for every unit.
    ///
    /// Locked units only buffer the request.
    pub fn sync_visibility(&mut self, visibility: &dyn Visibility) {
        let requests: Vec<(UnitId, UnitState)> = self
            .units
            .iter()
            .map(|u| {
                let visible = visibility.is_visible_to_opponent(u.position);
                (u.id, UnitState::for_visibility(visible))
            })
            .collect();

        for (id, state) in requests {
            if self.units.try_set_state(id, state) == StateRequest::Applied {
                tracing::debug!("{} is now {:?}", id, state);
                self.outcomes
                    .push(Outcome::UnitStateChanged { unit: id, state });
            }
        }
    }

    /// Unlock a unit, reporting a flushed state change
    pub fn unlock_unit(&mut self, id: UnitId) {
        if let Some(state) = self.units.unlock_state(id) {
            tracing::debug!("{} is now {:?} (deferred)", id, state);
            self.outcomes
                .push(Outcome::UnitStateChanged { unit: id, state });
        }
    }
}
