//! Registry of AI-controlled units
//!
//! Single source of truth for unit bookkeeping: ids, positions, hp,
//! dormant/aggressive state and per-turn flags. State flips requested while
//! a unit is locked are buffered and applied on unlock, so a unit cannot
//! change mode halfway through its own decision.

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};

use crate::bases::BaseDirectory;
use crate::core::error::Result;
use crate::core::types::{BaseId, UnitId};
use crate::grid::HexCoord;
use crate::units::unit::{Unit, UnitState, UnitType};
use crate::world::map::HexMap;
use crate::world::stats::StatsLookup;

/// What happened to a state request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRequest {
    /// State changed immediately
    Applied,
    /// Unit is locked; the change waits for unlock
    Deferred,
    /// Unit was already in that state
    Unchanged,
    /// No such unit
    Unknown,
}

/// Result of damage dealt to a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDamage {
    pub remaining_hp: u32,
    pub killed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UnitDirectory {
    next_id: u32,
    units: BTreeMap<UnitId, Unit>,
    positions: AHashMap<HexCoord, UnitId>,
    locked: AHashSet<UnitId>,
    pending: AHashMap<UnitId, UnitState>,
}

impl UnitDirectory {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Add a unit at `position`, housed by `base` when given.
    ///
    /// Hp comes from the stat table; the tile is marked occupied and the
    /// unit starts dormant and just spawned.
    pub fn register(
        &mut self,
        unit_type: UnitType,
        base: Option<BaseId>,
        position: HexCoord,
        stats: &dyn StatsLookup,
        map: &mut dyn HexMap,
        bases: &mut BaseDirectory,
    ) -> Result<UnitId> {
        let hp = stats.require(unit_type)?.hp;

        // Ids start at 1 even for a Default-constructed directory
        self.next_id = self.next_id.max(1);
        let id = UnitId(self.next_id);
        self.next_id += 1;

        let unit = Unit {
            id,
            unit_type,
            position,
            origin: position,
            hp,
            state: UnitState::Dormant,
            housed_base: base,
            has_acted: false,
            just_spawned: true,
        };

        map.set_occupied(position, true);
        if let Some(base) = base {
            bases.on_unit_housed(base);
        }
        self.positions.insert(position, id);
        self.units.insert(id, unit);

        tracing::debug!("Registered {} {:?} at {:?}", id, unit_type, position);
        Ok(id)
    }

    /// Remove a unit from every bookkeeping structure at once.
    ///
    /// Releases its tile and notifies its housing base. Killing an absent id
    /// is a no-op.
    pub fn kill(&mut self, id: UnitId, map: &mut dyn HexMap, bases: &mut BaseDirectory) -> Option<Unit> {
        let unit = self.units.remove(&id)?;

        if self.positions.get(&unit.position) == Some(&id) {
            self.positions.remove(&unit.position);
            map.set_occupied(unit.position, false);
        }
        self.locked.remove(&id);
        self.pending.remove(&id);

        if let Some(base) = unit.housed_base {
            bases.on_unit_lost(base);
        }

        tracing::debug!("Killed {} {:?} at {:?}", id, unit.unit_type, unit.position);
        Some(unit)
    }

    /// Subtract hp, killing the unit at zero. `None` for an unknown id.
    pub fn apply_damage(
        &mut self,
        id: UnitId,
        amount: u32,
        map: &mut dyn HexMap,
        bases: &mut BaseDirectory,
    ) -> Option<UnitDamage> {
        let Some(unit) = self.units.get_mut(&id) else {
            tracing::warn!("Damage for unknown {} dropped", id);
            return None;
        };

        unit.hp = unit.hp.saturating_sub(amount);
        let remaining_hp = unit.hp;
        if remaining_hp == 0 {
            self.kill(id, map, bases);
        }

        Some(UnitDamage {
            remaining_hp,
            killed: remaining_hp == 0,
        })
    }

    /// Update the recorded position. Tile occupancy is the caller's job.
    pub fn relocate(&mut self, id: UnitId, to: HexCoord) -> Option<HexCoord> {
        let unit = self.units.get_mut(&id)?;
        let from = unit.position;
        unit.position = to;

        if self.positions.get(&from) == Some(&id) {
            self.positions.remove(&from);
        }
        self.positions.insert(to, id);
        Some(from)
    }

    // === STATE MACHINE ===

    /// Buffer state requests for `id` until [`unlock_state`](Self::unlock_state)
    pub fn lock_state(&mut self, id: UnitId) {
        if self.units.contains_key(&id) {
            self.locked.insert(id);
        }
    }

    pub fn is_locked(&self, id: UnitId) -> bool {
        self.locked.contains(&id)
    }

    /// Request a state change; deferred while the unit is locked
    pub fn try_set_state(&mut self, id: UnitId, state: UnitState) -> StateRequest {
        let Some(unit) = self.units.get_mut(&id) else {
            return StateRequest::Unknown;
        };

        if self.locked.contains(&id) {
            // Latest request wins, even if it matches the current state
            self.pending.insert(id, state);
            return StateRequest::Deferred;
        }

        if unit.state == state {
            StateRequest::Unchanged
        } else {
            unit.state = state;
            StateRequest::Applied
        }
    }

    /// Release the lock and apply any buffered state.
    ///
    /// Returns the new state when the flush changed it.
    pub fn unlock_state(&mut self, id: UnitId) -> Option<UnitState> {
        self.locked.remove(&id);
        let state = self.pending.remove(&id)?;
        let unit = self.units.get_mut(&id)?;
        if unit.state == state {
            None
        } else {
            unit.state = state;
            Some(state)
        }
    }

    // === TURN FLAGS ===

    pub fn mark_acted(&mut self, id: UnitId) {
        if let Some(unit) = self.units.get_mut(&id) {
            unit.has_acted = true;
        }
    }

    pub fn clear_acted(&mut self) {
        for unit in self.units.values_mut() {
            unit.has_acted = false;
        }
    }

    pub fn clear_just_spawned(&mut self) {
        for unit in self.units.values_mut() {
            unit.just_spawned = false;
        }
    }

    pub fn can_move(&self, id: UnitId) -> bool {
        self.units.get(&id).is_some_and(|u| u.can_move())
    }

    pub fn can_attack(&self, id: UnitId) -> bool {
        self.units.get(&id).is_some_and(|u| u.can_attack())
    }

    // === QUERIES ===

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    /// Units in id order
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    pub fn unit_at(&self, position: HexCoord) -> Option<&Unit> {
        self.positions.get(&position).and_then(|id| self.units.get(id))
    }

    pub fn count_of(&self, unit_type: UnitType) -> usize {
        self.units.values().filter(|u| u.unit_type == unit_type).count()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn has_any_trace_of(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
            || self.positions.values().any(|v| *v == id)
            || self.locked.contains(&id)
            || self.pending.contains_key(&id)
    }
}
