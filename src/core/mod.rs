pub mod config;
pub mod error;
pub mod types;

pub use config::AiConfig;
pub use error::{HexfallError, Result};
pub use types::{AiRng, BaseId, Phase, TurnNumber, UnitId};
