//! Action intents produced by phase policies
//!
//! An intent is a one-shot request. The executor validates it against the
//! current state and either applies it whole or rejects it.

use serde::{Deserialize, Serialize};

use crate::core::types::{BaseId, UnitId};
use crate::grid::HexCoord;
use crate::units::UnitType;
use crate::world::battlefield::TargetKind;

/// Something that takes a turn within a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Unit(UnitId),
    Base(BaseId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Spawn { base: BaseId, unit_type: UnitType },
    Move { unit: UnitId, destination: HexCoord },
    Attack { unit: UnitId, kind: TargetKind, target: u32 },
    DevelopTile { unit: UnitId, coord: HexCoord },
    BuildBase { unit: UnitId, coord: HexCoord },
    UnlockTech { unit: UnitId },
}

impl Intent {
    pub fn actor(&self) -> Actor {
        match *self {
            Intent::Spawn { base, .. } => Actor::Base(base),
            Intent::Move { unit, .. }
            | Intent::Attack { unit, .. }
            | Intent::DevelopTile { unit, .. }
            | Intent::BuildBase { unit, .. }
            | Intent::UnlockTech { unit } => Actor::Unit(unit),
        }
    }
}

/// Why the executor refused an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    UnknownUnit,
    UnknownBase,
    /// Just spawned or already acted this turn
    NotReady,
    BaseFull,
    SpawnTileOccupied,
    DestinationBlocked,
    AlreadyThere,
    NoPath,
    NotACombatant,
    NotABuilder,
    TargetGone,
    OutOfRange,
    /// Unit is not standing on the tile it wants to work
    WrongTile,
    NoResource,
    NoGrove,
    NotInTurf,
    TechCapReached,
}
