//! AI units: records, types and the unit directory

pub mod directory;
pub mod unit;

pub use directory::{StateRequest, UnitDamage, UnitDirectory};
pub use unit::{Unit, UnitState, UnitType};
