//! Enemy AI turn engine
//!
//! Policies decide, the executor applies, the orchestrator sequences the
//! phases and [`EnemyAi`] ties them to the state the AI owns.

pub mod context;
pub mod enemy;
pub mod executor;
pub mod intent;
pub mod orchestrator;
pub mod outcome;
pub mod policies;
pub mod state;

pub use context::{Collaborators, TurnView};
pub use enemy::EnemyAi;
pub use executor::{ActionExecutor, ActionOutcome};
pub use intent::{Actor, Intent, RejectReason};
pub use orchestrator::{Pacer, PhaseReport, TurnOrchestrator, TurnReport};
pub use outcome::{Outcome, OutcomeLog};
pub use policies::PhasePolicy;
pub use state::AiState;
