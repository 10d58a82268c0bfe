//! Hexfall - Enemy AI turn engine for hex-grid strategy games
//!
//! The host owns the board. This crate owns the computer opponent's units
//! and bases and plays its turn through a fixed sequence of phases.

pub mod ai;
pub mod bases;
pub mod core;
pub mod grid;
pub mod units;
pub mod world;

pub use crate::ai::{Collaborators, EnemyAi, Outcome, TurnReport};
pub use crate::core::{AiConfig, HexfallError, Result};
