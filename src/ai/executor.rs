//! Action executor - the single writer of AI state and tile occupancy
//!
//! Every intent is validated against the current state before anything is
//! touched, so an intent is either applied whole or rejected as a no-op.

use rand::Rng;

use crate::ai::context::Collaborators;
use crate::ai::intent::{Intent, RejectReason};
use crate::ai::outcome::Outcome;
use crate::ai::state::AiState;
use crate::bases::UpgradeReward;
use crate::core::config::AiConfig;
use crate::core::error::Result;
use crate::core::types::{AiRng, BaseId, UnitId};
use crate::grid::{find_path_with_budget, HexCoord};
use crate::units::{Unit, UnitType};
use crate::world::battlefield::TargetKind;
use crate::world::map::{HexMap, Resource};

/// What applying an intent did
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Spawned {
        unit: UnitId,
    },
    /// `path` starts at the origin and ends at the new position
    Moved {
        unit: UnitId,
        path: Vec<HexCoord>,
    },
    Attacked {
        unit: UnitId,
        damage: u32,
        destroyed: bool,
        attacker_killed: bool,
    },
    Developed {
        unit: UnitId,
        base: BaseId,
        resource: Resource,
    },
    BaseBuilt {
        base: BaseId,
    },
    TechUnlocked {
        total: u32,
    },
    Rejected {
        reason: RejectReason,
    },
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, ActionOutcome::Rejected { .. })
    }

    /// Number of hexes walked, one pacing step each
    pub fn steps(&self) -> usize {
        match self {
            ActionOutcome::Moved { path, .. } => path.len().saturating_sub(1),
            _ => 0,
        }
    }
}

/// Applies intents produced by the phase policies
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    config: AiConfig,
}

type Validated<T> = std::result::Result<T, RejectReason>;

impl ActionExecutor {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    /// Validate and apply one intent.
    ///
    /// Rule violations come back as [`ActionOutcome::Rejected`]; only
    /// contract violations (such as a missing stat entry) are errors.
    pub fn apply(
        &self,
        intent: Intent,
        state: &mut AiState,
        world: &mut Collaborators<'_>,
        rng: &mut AiRng,
    ) -> Result<ActionOutcome> {
        let result = match intent {
            Intent::Spawn { base, unit_type } => self.execute_spawn(base, unit_type, state, world)?,
            Intent::Move { unit, destination } => self.execute_move(unit, destination, state, world)?,
            Intent::Attack { unit, kind, target } => {
                self.execute_attack(unit, kind, target, state, world)?
            }
            Intent::DevelopTile { unit, coord } => {
                self.execute_develop_tile(unit, coord, state, world, rng)
            }
            Intent::BuildBase { unit, coord } => self.execute_build_base(unit, coord, state, world, rng),
            Intent::UnlockTech { unit } => self.execute_unlock_tech(unit, state),
        };

        Ok(match result {
            Ok(outcome) => {
                tracing::debug!("Applied {:?}", intent);
                outcome
            }
            Err(reason) => {
                match reason {
                    RejectReason::UnknownUnit | RejectReason::UnknownBase => {
                        tracing::warn!("Dropped {:?}: {:?}", intent, reason)
                    }
                    _ => tracing::debug!("Rejected {:?}: {:?}", intent, reason),
                }
                state
                    .outcomes
                    .push(Outcome::ActionRejected { intent, reason });
                ActionOutcome::Rejected { reason }
            }
        })
    }

    fn ready_unit(state: &AiState, id: UnitId) -> Validated<&Unit> {
        let unit = state.units.get(id).ok_or(RejectReason::UnknownUnit)?;
        if !unit.is_ready() {
            return Err(RejectReason::NotReady);
        }
        Ok(unit)
    }

    pub fn execute_spawn(
        &self,
        base_id: BaseId,
        unit_type: UnitType,
        state: &mut AiState,
        world: &mut Collaborators<'_>,
    ) -> Result<Validated<ActionOutcome>> {
        let Some(base) = state.bases.get(base_id) else {
            return Ok(Err(RejectReason::UnknownBase));
        };
        let position = base.position;
        if !state.bases.can_house_more_units(base_id) {
            return Ok(Err(RejectReason::BaseFull));
        }
        if !world.map.is_standable(position) {
            return Ok(Err(RejectReason::SpawnTileOccupied));
        }

        let unit = state.units.register(
            unit_type,
            Some(base_id),
            position,
            world.stats,
            &mut *world.map,
            &mut state.bases,
        )?;

        tracing::info!("{} spawned {} ({:?})", base_id, unit, unit_type);
        state.outcomes.push(Outcome::UnitSpawned {
            unit,
            unit_type,
            base: Some(base_id),
            position,
        });
        Ok(Ok(ActionOutcome::Spawned { unit }))
    }

    /// Walk a unit toward `destination`, at most its move range.
    ///
    /// The arrival tile is reserved before the origin is released so no
    /// observer ever sees both tiles free or the unit on neither.
    pub fn execute_move(
        &self,
        id: UnitId,
        destination: HexCoord,
        state: &mut AiState,
        world: &mut Collaborators<'_>,
    ) -> Result<Validated<ActionOutcome>> {
        let unit = match Self::ready_unit(state, id) {
            Ok(unit) => unit,
            Err(reason) => return Ok(Err(reason)),
        };
        let origin = unit.position;
        let move_range = world.stats.require(unit.unit_type)?.move_range as usize;

        if destination == origin {
            return Ok(Err(RejectReason::AlreadyThere));
        }
        if !world.map.is_standable(destination) {
            return Ok(Err(RejectReason::DestinationBlocked));
        }

        let map = &*world.map;
        let mut path = find_path_with_budget(
            origin,
            destination,
            |c| map.is_walkable(c),
            |c| map.is_occupied(c),
            self.config.path_search_budget,
        );
        if path.len() < 2 || move_range == 0 {
            return Ok(Err(RejectReason::NoPath));
        }
        path.truncate(move_range + 1);

        let arrival = *path.last().unwrap_or(&origin);
        if !world.map.is_standable(arrival) {
            return Ok(Err(RejectReason::DestinationBlocked));
        }

        // Reserve, then release
        world.map.set_occupied(arrival, true);
        world.map.set_occupied(origin, false);
        state.units.relocate(id, arrival);
        state.units.mark_acted(id);

        for step in path.windows(2) {
            state.outcomes.push(Outcome::UnitStepped {
                unit: id,
                from: step[0],
                to: step[1],
            });
        }
        state.outcomes.push(Outcome::UnitMoved {
            unit: id,
            from: origin,
            to: arrival,
        });

        Ok(Ok(ActionOutcome::Moved { unit: id, path }))
    }

    pub fn execute_attack(
        &self,
        id: UnitId,
        kind: TargetKind,
        target_id: u32,
        state: &mut AiState,
        world: &mut Collaborators<'_>,
    ) -> Result<Validated<ActionOutcome>> {
        let unit = match Self::ready_unit(state, id) {
            Ok(unit) => unit,
            Err(reason) => return Ok(Err(reason)),
        };
        if !unit.unit_type.is_combatant() {
            return Ok(Err(RejectReason::NotACombatant));
        }
        let position = unit.position;
        let stats = world.stats.require(unit.unit_type)?;

        let Some(target) = world.battlefield.target(kind, target_id) else {
            return Ok(Err(RejectReason::TargetGone));
        };
        if target.position.distance(&position) > stats.attack_range {
            return Ok(Err(RejectReason::OutOfRange));
        }
        let Some(strike) = world.battlefield.strike(kind, target_id, stats.attack) else {
            return Ok(Err(RejectReason::TargetGone));
        };

        state.units.mark_acted(id);
        state.outcomes.push(Outcome::UnitAttacked {
            unit: id,
            kind,
            target: target_id,
            damage: stats.attack,
            remaining_hp: strike.remaining_hp,
            destroyed: strike.destroyed,
            counter_damage: strike.counter_damage,
        });
        tracing::info!(
            "{} hit {:?} #{} for {} ({} left)",
            id,
            kind,
            target_id,
            stats.attack,
            strike.remaining_hp
        );

        let mut attacker_killed = false;
        if strike.counter_damage > 0 {
            let damage = state.units.apply_damage(
                id,
                strike.counter_damage,
                &mut *world.map,
                &mut state.bases,
            );
            if damage.is_some_and(|d| d.killed) {
                attacker_killed = true;
                state.outcomes.push(Outcome::UnitKilled { unit: id, position });
            }
        }

        Ok(Ok(ActionOutcome::Attacked {
            unit: id,
            damage: stats.attack,
            destroyed: strike.destroyed,
            attacker_killed,
        }))
    }

    /// Clear a resource under a unit, feeding its population to the owning base
    pub fn execute_develop_tile(
        &self,
        id: UnitId,
        coord: HexCoord,
        state: &mut AiState,
        world: &mut Collaborators<'_>,
        rng: &mut AiRng,
    ) -> Validated<ActionOutcome> {
        let unit = Self::ready_unit(state, id)?;
        if unit.position != coord {
            return Err(RejectReason::WrongTile);
        }
        if world.map.tile_features(coord).resource.is_none() {
            return Err(RejectReason::NoResource);
        }
        let base = state.bases.turf_owner(coord).ok_or(RejectReason::NotInTurf)?;
        let resource = world.map.clear_resource(coord).ok_or(RejectReason::NoResource)?;

        let population = match resource {
            Resource::Fish => self.config.fish_population,
            Resource::Debris => self.config.debris_population,
        };
        state.score += self.config.develop_score_bonus;
        state.units.mark_acted(id);
        state.outcomes.push(Outcome::TileDeveloped {
            unit: id,
            position: coord,
            resource,
            base,
            population,
        });
        tracing::info!("{} developed {:?} at {:?} for {}", id, resource, coord, base);

        self.grant_population(base, population, state, &*world.map, rng);

        Ok(ActionOutcome::Developed { unit: id, base, resource })
    }

    fn grant_population(
        &self,
        base: BaseId,
        population: u32,
        state: &mut AiState,
        map: &dyn HexMap,
        rng: &mut AiRng,
    ) {
        for level_up in state.bases.add_population(base, population) {
            let reward = if rng.gen_bool(0.5) {
                UpgradeReward::ScoreBonus
            } else {
                UpgradeReward::TurfExpansion
            };
            state.score += state.bases.apply_reward(base, reward, map);
            tracing::info!("{} reached level {} ({:?})", base, level_up.new_level, reward);
            state.outcomes.push(Outcome::BaseUpgraded {
                base,
                level: level_up.new_level,
                hp: level_up.new_hp,
                reward,
            });
        }
    }

    /// Turn the grove under a Builder into a base; the Builder is consumed
    pub fn execute_build_base(
        &self,
        id: UnitId,
        coord: HexCoord,
        state: &mut AiState,
        world: &mut Collaborators<'_>,
        rng: &mut AiRng,
    ) -> Validated<ActionOutcome> {
        let unit = state.units.get(id).ok_or(RejectReason::UnknownUnit)?;
        if unit.unit_type != UnitType::Builder {
            return Err(RejectReason::NotABuilder);
        }
        if unit.has_acted {
            return Err(RejectReason::NotReady);
        }
        if unit.position != coord {
            return Err(RejectReason::WrongTile);
        }
        let level = world
            .map
            .tile_features(coord)
            .grove_level()
            .ok_or(RejectReason::NoGrove)?;
        if state.bases.turf_owner(coord).is_none() {
            return Err(RejectReason::NotInTurf);
        }

        state.units.kill(id, &mut *world.map, &mut state.bases);
        world.map.set_structure(coord, None);
        let base = state.bases.register(coord, level, &mut *world.map, rng);

        tracing::info!("{} founded {} at {:?} (level {})", id, base, coord, level);
        state.outcomes.push(Outcome::BaseBuilt {
            base,
            position: coord,
            level,
            builder: id,
        });
        Ok(ActionOutcome::BaseBuilt { base })
    }

    pub fn execute_unlock_tech(&self, id: UnitId, state: &mut AiState) -> Validated<ActionOutcome> {
        Self::ready_unit(state, id)?;
        if state.techs_unlocked >= self.config.tech_cap {
            return Err(RejectReason::TechCapReached);
        }

        state.techs_unlocked += 1;
        state.units.mark_acted(id);
        let total = state.techs_unlocked;
        tracing::info!("{} unlocked tech {}/{}", id, total, self.config.tech_cap);
        state.outcomes.push(Outcome::TechUnlocked { unit: id, total });
        Ok(ActionOutcome::TechUnlocked { total })
    }
}
