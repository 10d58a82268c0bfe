//! Hostile targets the AI can attack
//!
//! Player bases, player units and neutral sea monsters belong to the host.
//! The AI sees them as [`Target`]s and asks the host to resolve strikes.

use serde::{Deserialize, Serialize};

use crate::grid::HexCoord;

/// Kind of hostile target, in attack priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetKind {
    Base,
    SeaMonster,
    Unit,
}

/// A hostile thing on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    /// Host-side identifier, unique per kind
    pub id: u32,
    pub position: HexCoord,
    pub hp: u32,
}

/// Result of one strike against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeResult {
    pub remaining_hp: u32,
    pub destroyed: bool,
    /// Return damage dealt to the attacker (counter-attacking targets)
    pub counter_damage: u32,
}

/// Host-side resolution of AI attacks
pub trait Battlefield {
    /// Every live hostile target
    fn targets(&self) -> Vec<Target>;

    /// Apply `damage` to the target; `None` when it no longer exists
    fn strike(&mut self, kind: TargetKind, id: u32, damage: u32) -> Option<StrikeResult>;

    fn target(&self, kind: TargetKind, id: u32) -> Option<Target> {
        self.targets()
            .into_iter()
            .find(|t| t.kind == kind && t.id == id)
    }

    fn targets_within(&self, coord: HexCoord, range: u32) -> Vec<Target> {
        self.targets()
            .into_iter()
            .filter(|t| t.position.distance(&coord) <= range)
            .collect()
    }

    fn opponent_bases(&self) -> Vec<Target> {
        self.targets()
            .into_iter()
            .filter(|t| t.kind == TargetKind::Base)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Combatant {
    target: Target,
    counter_attack: u32,
}

/// In-memory opposing side for headless play and tests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skirmish {
    combatants: Vec<Combatant>,
}

impl Skirmish {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, kind: TargetKind, id: u32, position: HexCoord, hp: u32, counter_attack: u32) {
        self.combatants.push(Combatant {
            target: Target {
                kind,
                id,
                position,
                hp,
            },
            counter_attack,
        });
    }

    pub fn add_base(&mut self, id: u32, position: HexCoord, hp: u32) {
        self.add(TargetKind::Base, id, position, hp, 0);
    }

    pub fn add_unit(&mut self, id: u32, position: HexCoord, hp: u32, counter_attack: u32) {
        self.add(TargetKind::Unit, id, position, hp, counter_attack);
    }

    pub fn add_sea_monster(&mut self, id: u32, position: HexCoord, hp: u32, counter_attack: u32) {
        self.add(TargetKind::SeaMonster, id, position, hp, counter_attack);
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

impl Battlefield for Skirmish {
    fn targets(&self) -> Vec<Target> {
        self.combatants.iter().map(|c| c.target).collect()
    }

    fn strike(&mut self, kind: TargetKind, id: u32, damage: u32) -> Option<StrikeResult> {
        let index = self
            .combatants
            .iter()
            .position(|c| c.target.kind == kind && c.target.id == id)?;

        let combatant = &mut self.combatants[index];
        combatant.target.hp = combatant.target.hp.saturating_sub(damage);
        let remaining_hp = combatant.target.hp;
        let destroyed = remaining_hp == 0;
        // Only survivors hit back
        let counter_damage = if destroyed { 0 } else { combatant.counter_attack };

        if destroyed {
            self.combatants.remove(index);
        }

        Some(StrikeResult {
            remaining_hp,
            destroyed,
            counter_damage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(TargetKind::Base < TargetKind::SeaMonster);
        assert!(TargetKind::SeaMonster < TargetKind::Unit);
    }

    #[test]
    fn test_strike_and_destroy() {
        let mut skirmish = Skirmish::new();
        skirmish.add_unit(1, HexCoord::new(1, 0), 5, 2);

        let hit = skirmish.strike(TargetKind::Unit, 1, 3).unwrap();
        assert_eq!(hit.remaining_hp, 2);
        assert!(!hit.destroyed);
        assert_eq!(hit.counter_damage, 2);

        let kill = skirmish.strike(TargetKind::Unit, 1, 3).unwrap();
        assert!(kill.destroyed);
        assert_eq!(kill.counter_damage, 0);
        assert!(skirmish.is_empty());
        assert!(skirmish.strike(TargetKind::Unit, 1, 3).is_none());
    }

    #[test]
    fn test_targets_within_range() {
        let mut skirmish = Skirmish::new();
        skirmish.add_base(1, HexCoord::new(2, 0), 30);
        skirmish.add_sea_monster(2, HexCoord::new(5, 0), 10, 1);
        let near = skirmish.targets_within(HexCoord::ORIGIN, 2);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].kind, TargetKind::Base);
        assert_eq!(skirmish.opponent_bases().len(), 1);
    }
}
