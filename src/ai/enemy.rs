//! Host-facing entry point for the enemy AI

use crate::ai::context::Collaborators;
use crate::ai::orchestrator::{TurnOrchestrator, TurnReport};
use crate::ai::outcome::Outcome;
use crate::ai::policies::PhasePolicy;
use crate::ai::state::AiState;
use crate::bases::{BaseDamage, BaseDirectory};
use crate::core::config::AiConfig;
use crate::core::error::{HexfallError, Result};
use crate::core::types::{BaseId, TurnNumber, UnitId};
use crate::grid::HexCoord;
use crate::units::{UnitDamage, UnitDirectory, UnitType};
use crate::world::map::HexMap;
use crate::world::stats::StatsLookup;

/// The computer opponent.
///
/// Owns every AI unit and base between turns. The host registers the
/// starting bases, reports hits on AI assets, runs enemy turns and drains
/// the outcome queue to drive its renderer.
pub struct EnemyAi {
    config: AiConfig,
    state: AiState,
    orchestrator: TurnOrchestrator,
}

impl EnemyAi {
    pub fn new(config: AiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: AiState::new(&config),
            orchestrator: TurnOrchestrator::new(config.clone()),
            config,
        })
    }

    pub fn with_policies(mut self, policies: Vec<Box<dyn PhasePolicy>>) -> Self {
        self.orchestrator = self.orchestrator.with_policies(policies);
        self
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Place a starting base, typically while loading the map
    pub fn register_base(&mut self, position: HexCoord, level: u32, map: &mut dyn HexMap) -> BaseId {
        self.state
            .bases
            .register(position, level, map, self.orchestrator.rng_mut())
    }

    /// Place a unit outside the turn flow, housed by `base` when given
    pub fn spawn_unit(
        &mut self,
        unit_type: UnitType,
        base: Option<BaseId>,
        position: HexCoord,
        stats: &dyn StatsLookup,
        map: &mut dyn HexMap,
    ) -> Result<UnitId> {
        if let Some(base) = base {
            if !self.state.bases.contains(base) {
                return Err(HexfallError::BaseNotFound(base));
            }
        }
        if !map.is_standable(position) {
            return Err(HexfallError::InvalidPlacement(position));
        }
        let id = self
            .state
            .units
            .register(unit_type, base, position, stats, map, &mut self.state.bases)?;
        self.state.outcomes.push(Outcome::UnitSpawned {
            unit: id,
            unit_type,
            base,
            position,
        });
        Ok(id)
    }

    /// Run the enemy turn numbered `turn` to completion
    pub async fn run_enemy_turn(
        &mut self,
        turn: TurnNumber,
        world: &mut Collaborators<'_>,
    ) -> Result<TurnReport> {
        self.orchestrator
            .run_enemy_turn(turn, &mut self.state, world)
            .await
    }

    /// The opponent hit an AI unit
    pub fn damage_unit(&mut self, id: UnitId, amount: u32, map: &mut dyn HexMap) -> Result<UnitDamage> {
        let position = self
            .state
            .units
            .get(id)
            .map(|u| u.position)
            .ok_or(HexfallError::UnitNotFound(id))?;

        let damage = self
            .state
            .units
            .apply_damage(id, amount, map, &mut self.state.bases)
            .ok_or(HexfallError::UnitNotFound(id))?;
        if damage.killed {
            self.state.outcomes.push(Outcome::UnitKilled { unit: id, position });
        }
        Ok(damage)
    }

    /// The opponent hit an AI base. A destroyed base leaves a grove behind.
    pub fn damage_base(&mut self, id: BaseId, amount: u32, map: &mut dyn HexMap) -> Result<BaseDamage> {
        let position = self
            .state
            .bases
            .get(id)
            .map(|b| b.position)
            .ok_or(HexfallError::BaseNotFound(id))?;

        let damage = self
            .state
            .bases
            .take_damage(id, amount, map)
            .ok_or(HexfallError::BaseNotFound(id))?;
        if damage.destroyed {
            self.state.outcomes.push(Outcome::BaseDestroyed {
                base: id,
                position,
                level: damage.level,
            });
        }
        Ok(damage)
    }

    pub fn units(&self) -> &UnitDirectory {
        &self.state.units
    }

    pub fn bases(&self) -> &BaseDirectory {
        &self.state.bases
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn techs_unlocked(&self) -> u32 {
        self.state.techs_unlocked
    }

    pub fn state(&self) -> &AiState {
        &self.state
    }

    /// Take every outcome recorded since the last drain
    pub fn drain_outcomes(&mut self) -> Vec<Outcome> {
        self.state.outcomes.drain()
    }
}
