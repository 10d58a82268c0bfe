//! Enemy turn state machine
//!
//! Runs the phase policies strictly one after another:
//! Base -> Builder -> Auxiliary -> Dormant -> Aggressive -> turn end.
//!
//! Each phase is a future the orchestrator awaits under a timeout, so a
//! phase that never completes surfaces as [`HexfallError::PhaseStalled`]
//! instead of hanging the host. Inside a phase the [`Pacer`] yields between
//! actions and once per walked hex, giving a renderer room to animate.

use std::time::Duration;

use rand::SeedableRng;
use serde::Serialize;
use tracing::Instrument;

use crate::ai::context::{Collaborators, TurnView};
use crate::ai::executor::ActionExecutor;
use crate::ai::intent::Actor;
use crate::ai::outcome::Outcome;
use crate::ai::policies::{default_policies, PhasePolicy};
use crate::ai::state::AiState;
use crate::core::config::AiConfig;
use crate::core::error::{HexfallError, Result};
use crate::core::types::{AiRng, Phase, TurnNumber};

/// Suspension points between discrete steps of a phase
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Zero delay: just hand control back to the scheduler
    pub fn headless() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn step(&self) {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// What one phase did
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub phase: Phase,
    pub actors: usize,
    pub applied: usize,
    pub rejected: usize,
    /// Contract violations hit while applying intents; the phase carried on
    pub errors: Vec<String>,
}

impl PhaseReport {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            actors: 0,
            applied: 0,
            rejected: 0,
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub turn: TurnNumber,
    pub phases: Vec<PhaseReport>,
}

impl TurnReport {
    pub fn applied(&self) -> usize {
        self.phases.iter().map(|p| p.applied).sum()
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

pub struct TurnOrchestrator {
    config: AiConfig,
    rng: AiRng,
    executor: ActionExecutor,
    pacer: Pacer,
    policies: Vec<Box<dyn PhasePolicy>>,
}

impl TurnOrchestrator {
    /// Standard policies, RNG seeded from the config
    pub fn new(config: AiConfig) -> Self {
        Self {
            rng: AiRng::seed_from_u64(config.seed),
            executor: ActionExecutor::new(config.clone()),
            pacer: Pacer::new(Duration::from_millis(config.step_delay_ms)),
            policies: default_policies(),
            config,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = AiRng::seed_from_u64(seed);
        self
    }

    /// Replace the policy line-up; they run in the order given
    pub fn with_policies(mut self, policies: Vec<Box<dyn PhasePolicy>>) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Shared random source, for host-triggered AI actions between turns
    pub fn rng_mut(&mut self) -> &mut AiRng {
        &mut self.rng
    }

    /// Run one full enemy turn.
    ///
    /// Gameplay rejections and per-intent contract errors are recorded in
    /// the report; only a stalled phase aborts the turn.
    pub async fn run_enemy_turn(
        &mut self,
        turn: TurnNumber,
        state: &mut AiState,
        world: &mut Collaborators<'_>,
    ) -> Result<TurnReport> {
        let span = tracing::info_span!("enemy_turn", turn);
        self.run_turn_inner(turn, state, world).instrument(span).await
    }

    async fn run_turn_inner(
        &mut self,
        turn: TurnNumber,
        state: &mut AiState,
        world: &mut Collaborators<'_>,
    ) -> Result<TurnReport> {
        let Self {
            config,
            rng,
            executor,
            pacer,
            policies,
        } = self;
        let limit = Duration::from_millis(config.phase_timeout_ms);

        tracing::info!(
            "Enemy turn {} starting ({} units, {} bases)",
            turn,
            state.units.len(),
            state.bases.len()
        );
        state.units.clear_acted();
        state.outcomes.push(Outcome::TurnStarted { turn });

        let mut report = TurnReport {
            turn,
            phases: Vec::with_capacity(policies.len()),
        };

        for policy in policies.iter_mut() {
            let phase = policy.phase();
            state.outcomes.push(Outcome::PhaseStarted { turn, phase });

            let run = run_phase(policy.as_mut(), state, world, config, executor, rng, *pacer);
            let finished = tokio::time::timeout(limit, run).await;
            let phase_report = match finished {
                Ok(phase_report) => phase_report,
                Err(_) => {
                    tracing::error!("Phase {} stalled after {:?}", phase, limit);
                    // Nothing is half-applied, but the acting unit may still hold its lock
                    for id in state.units.ids() {
                        state.unlock_unit(id);
                    }
                    return Err(HexfallError::PhaseStalled {
                        phase,
                        waited_ms: config.phase_timeout_ms,
                    });
                }
            };

            tracing::info!(
                "Phase {} complete: {} applied, {} rejected",
                phase,
                phase_report.applied,
                phase_report.rejected
            );
            state.outcomes.push(Outcome::PhaseCompleted {
                turn,
                phase,
                applied: phase_report.applied,
            });
            report.phases.push(phase_report);
        }

        // Units spawned this turn may act from the next one
        state.units.clear_just_spawned();
        state.outcomes.push(Outcome::TurnEnded { turn });
        tracing::info!("Enemy turn {} complete, score {}", turn, state.score);

        Ok(report)
    }
}

/// Drive one policy through its actors
async fn run_phase(
    policy: &mut dyn PhasePolicy,
    state: &mut AiState,
    world: &mut Collaborators<'_>,
    config: &AiConfig,
    executor: &ActionExecutor,
    rng: &mut AiRng,
    pacer: Pacer,
) -> PhaseReport {
    let mut report = PhaseReport::new(policy.phase());

    state.sync_visibility(world.visibility);
    let actors = {
        let view = TurnView::new(state, world, config);
        policy.actors(&view, rng)
    };
    report.actors = actors.len();

    for actor in actors {
        let unit = match actor {
            Actor::Unit(id) => {
                let Some(unit_type) = state.units.get(id).map(|u| u.unit_type) else {
                    continue;
                };
                // A unit without stats cannot be planned for
                if let Err(e) = world.stats.require(unit_type) {
                    tracing::warn!("Unit {} sits out {}: {}", id, report.phase, e);
                    report.errors.push(e.to_string());
                    continue;
                }
                Some(id)
            }
            Actor::Base(_) => None,
        };
        if let Some(id) = unit {
            state.units.lock_state(id);
        }

        let intent = {
            let view = TurnView::new(state, world, config);
            policy.decide(actor, &view, rng)
        };

        if let Some(intent) = intent {
            match executor.apply(intent, state, world, rng) {
                Ok(outcome) if outcome.is_applied() => {
                    report.applied += 1;
                    for _ in 0..outcome.steps() {
                        pacer.step().await;
                    }
                }
                Ok(_) => report.rejected += 1,
                Err(e) => {
                    tracing::error!("Applying {:?} failed: {}", intent, e);
                    report.errors.push(e.to_string());
                }
            }
            state.sync_visibility(world.visibility);
            pacer.step().await;
        }

        if let Some(id) = unit {
            state.unlock_unit(id);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::intent::Intent;
    use crate::core::types::UnitId;
    use crate::grid::HexCoord;
    use crate::units::{UnitState, UnitType};
    use crate::world::battlefield::Skirmish;
    use crate::world::map::GridMap;
    use crate::world::stats::StatsTable;
    use crate::world::visibility::VisionSet;

    /// Keeps one unit busy with tech requests forever
    struct Stubborn {
        unit: UnitId,
    }

    impl PhasePolicy for Stubborn {
        fn phase(&self) -> Phase {
            Phase::Auxiliary
        }

        fn actors(&mut self, _view: &TurnView, _rng: &mut AiRng) -> Vec<Actor> {
            vec![Actor::Unit(self.unit); 10_000]
        }

        fn decide(&mut self, _actor: Actor, _view: &TurnView, _rng: &mut AiRng) -> Option<Intent> {
            Some(Intent::UnlockTech { unit: self.unit })
        }
    }

    struct Board {
        state: AiState,
        map: GridMap,
        stats: StatsTable,
        vision: VisionSet,
        skirmish: Skirmish,
    }

    impl Board {
        fn new(config: &AiConfig) -> Self {
            Self {
                state: AiState::new(config),
                map: GridMap::hexagon(5),
                stats: StatsTable::default(),
                vision: VisionSet::new(),
                skirmish: Skirmish::new(),
            }
        }

        async fn turn(&mut self, orchestrator: &mut TurnOrchestrator, turn: TurnNumber) -> Result<TurnReport> {
            let mut world = Collaborators::new(
                &mut self.map,
                &self.stats,
                &self.vision,
                &mut self.skirmish,
            );
            orchestrator.run_enemy_turn(turn, &mut self.state, &mut world).await
        }
    }

    #[tokio::test]
    async fn test_empty_turn_runs_every_phase_once() {
        let config = AiConfig::default();
        let mut orchestrator = TurnOrchestrator::new(config.clone());
        let mut board = Board::new(&config);

        let report = board.turn(&mut orchestrator, 1).await.unwrap();

        let phases: Vec<Phase> = report.phases.iter().map(|p| p.phase).collect();
        assert_eq!(phases, Phase::ORDER.to_vec());
        assert_eq!(report.applied(), 0);
        assert!(matches!(
            board.state.outcomes.events.last(),
            Some(Outcome::TurnEnded { turn: 1 })
        ));
    }

    #[tokio::test]
    async fn test_stalled_phase_is_an_error() {
        let mut config = AiConfig::default();
        config.step_delay_ms = 20;
        config.phase_timeout_ms = 50;
        let mut board = Board::new(&config);
        let unit = board
            .state
            .units
            .register(
                UnitType::Scout,
                None,
                HexCoord::ORIGIN,
                &board.stats,
                &mut board.map,
                &mut board.state.bases,
            )
            .unwrap();
        let mut orchestrator =
            TurnOrchestrator::new(config).with_policies(vec![Box::new(Stubborn { unit })]);

        let err = board.turn(&mut orchestrator, 1).await.unwrap_err();

        assert!(matches!(
            err,
            HexfallError::PhaseStalled {
                phase: Phase::Auxiliary,
                waited_ms: 50
            }
        ));
        assert!(!board.state.units.is_locked(unit));
    }

    #[tokio::test]
    async fn test_fresh_units_wait_a_turn() {
        let config = AiConfig {
            spawn_probability: 1.0,
            ..AiConfig::default()
        };
        let mut orchestrator = TurnOrchestrator::new(config.clone());
        let mut board = Board::new(&config);
        let base = board
            .state
            .bases
            .register(HexCoord::ORIGIN, 1, &mut board.map, orchestrator.rng_mut());

        board.turn(&mut orchestrator, 1).await.unwrap();

        let spawned: Vec<UnitId> = board.state.units.ids();
        assert_eq!(spawned.len(), 1);
        let unit = board.state.units.get(spawned[0]).unwrap();
        assert_eq!(unit.position, HexCoord::ORIGIN);
        assert_eq!(unit.housed_base, Some(base));
        // Cleared at turn end, ready for turn 2
        assert!(!unit.just_spawned);
        assert_eq!(unit.state, UnitState::Dormant);
    }

    #[tokio::test]
    async fn test_unit_without_stats_is_reported() {
        let config = AiConfig::default();
        let mut orchestrator = TurnOrchestrator::new(config.clone());
        let mut board = Board::new(&config);
        let id = board
            .state
            .units
            .register(
                UnitType::Tanker,
                None,
                HexCoord::new(1, 0),
                &board.stats,
                &mut board.map,
                &mut board.state.bases,
            )
            .unwrap();
        board.state.units.clear_just_spawned();
        board.stats = StatsTable::empty();

        let report = board.turn(&mut orchestrator, 1).await.unwrap();

        let dormant = report.phase(Phase::Dormant).unwrap();
        assert_eq!(dormant.errors.len(), 1);
        assert!(dormant.errors[0].contains("Tanker"));
        assert_eq!(dormant.applied, 0);
        assert_eq!(board.state.units.get(id).unwrap().position, HexCoord::new(1, 0));
        assert!(!board.state.units.is_locked(id));
    }

    /// Three turns from one base, returning everything that happened
    async fn replay(config_seed: u64, seed: u64) -> Vec<Outcome> {
        let config = AiConfig {
            seed: config_seed,
            spawn_probability: 1.0,
            step_delay_ms: 50,
            ..AiConfig::default()
        };
        let mut orchestrator = TurnOrchestrator::new(config.clone())
            .with_seed(seed)
            .with_pacer(Pacer::headless());
        let mut board = Board::new(&config);
        board
            .state
            .bases
            .register(HexCoord::ORIGIN, 1, &mut board.map, orchestrator.rng_mut());
        for turn in 1..=3 {
            board.turn(&mut orchestrator, turn).await.unwrap();
        }
        board.state.outcomes.drain()
    }

    #[tokio::test]
    async fn test_explicit_seed_overrides_config_seed() {
        let first = replay(1, 5).await;
        let second = replay(2, 5).await;
        assert_eq!(first, second);
        assert!(first.iter().any(|o| matches!(o, Outcome::UnitSpawned { .. })));
    }

    #[tokio::test]
    async fn test_spotted_unit_turns_aggressive() {
        let config = AiConfig::default();
        let mut orchestrator = TurnOrchestrator::new(config.clone());
        let mut board = Board::new(&config);
        let id = board
            .state
            .units
            .register(
                UnitType::Tanker,
                None,
                HexCoord::new(2, 0),
                &board.stats,
                &mut board.map,
                &mut board.state.bases,
            )
            .unwrap();
        board.state.units.clear_just_spawned();
        board.vision.reveal(HexCoord::new(2, 0));

        board.turn(&mut orchestrator, 1).await.unwrap();

        assert_eq!(board.state.units.get(id).unwrap().state, UnitState::Aggressive);
        assert!(board.state.outcomes.iter().any(|o| matches!(
            o,
            Outcome::UnitStateChanged {
                state: UnitState::Aggressive,
                ..
            }
        )));
    }
}
