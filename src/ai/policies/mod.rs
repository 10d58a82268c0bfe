//! Per-phase decision policies
//!
//! Architecture: Trait + Data hybrid
//! - PhasePolicy trait defines one swappable decision maker per phase
//! - AiConfig holds the TOML-loaded odds and thresholds they read
//! - TurnView is the read-only slice of state a decision sees
//!
//! Policies never mutate anything. They enumerate actors at phase start and
//! turn each actor into at most one [`Intent`] that the executor applies.

pub mod aggressive;
pub mod auxiliary;
pub mod base;
pub mod builder;
pub mod dormant;

pub use aggressive::AggressivePolicy;
pub use auxiliary::AuxiliaryPolicy;
pub use base::{select_unit_to_spawn, BasePolicy};
pub use builder::BuilderPolicy;
pub use dormant::DormantPolicy;

use crate::ai::context::TurnView;
use crate::ai::intent::{Actor, Intent};
use crate::core::types::{AiRng, Phase};

/// Decision maker for one phase of the enemy turn
pub trait PhasePolicy: Send {
    fn phase(&self) -> Phase;

    /// Everything that may act this phase, in processing order
    fn actors(&mut self, view: &TurnView, rng: &mut AiRng) -> Vec<Actor>;

    /// Decide what `actor` does now. `None` skips it for this phase.
    fn decide(&mut self, actor: Actor, view: &TurnView, rng: &mut AiRng) -> Option<Intent>;
}

/// The standard policy line-up, in turn order
pub fn default_policies() -> Vec<Box<dyn PhasePolicy>> {
    vec![
        Box::new(BasePolicy::new()),
        Box::new(BuilderPolicy::new()),
        Box::new(AuxiliaryPolicy::new()),
        Box::new(DormantPolicy::new()),
        Box::new(AggressivePolicy::new()),
    ]
}
