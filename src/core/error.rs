use thiserror::Error;

use crate::core::types::{BaseId, Phase, UnitId};
use crate::grid::HexCoord;
use crate::units::UnitType;

#[derive(Error, Debug)]
pub enum HexfallError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Base not found: {0}")]
    BaseNotFound(BaseId),

    #[error("Cannot place a unit at {0:?}")]
    InvalidPlacement(HexCoord),

    #[error("No stats registered for unit type {0:?}")]
    MissingStats(UnitType),

    #[error("Phase {phase} did not complete within {waited_ms} ms")]
    PhaseStalled { phase: Phase, waited_ms: u64 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HexfallError>;
