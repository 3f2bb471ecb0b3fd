//! Unit records and where they live

use serde::{Deserialize, Serialize};

use crate::core::types::{Player, Position, UnitId};
use crate::game::unit_type::{UnitCategory, UnitStats, UnitType};

/// A unit on the board or embarked in a carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub category: UnitCategory,
    pub player: Player,
    /// Embarked units track their carrier's tile
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub has_moved: bool,
    pub has_attacked: bool,
    pub remaining_mov: u32,
    /// Radians, cosmetic only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<f32>,
    pub is_hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cargo: Vec<Unit>,
    /// Destroyed after its first attack
    #[serde(default)]
    pub is_kamikaze: bool,
}

impl Unit {
    /// Create a unit with full health and a fresh turn budget
    pub fn new(id: UnitId, unit_type: UnitType, player: Player, position: Position) -> Self {
        let stats = unit_type.stats();
        Self {
            id,
            unit_type,
            category: stats.category,
            player,
            position,
            hp: stats.hp,
            max_hp: stats.hp,
            has_moved: false,
            has_attacked: false,
            remaining_mov: stats.mov,
            facing: None,
            is_hidden: unit_type.starts_hidden(),
            cargo: Vec::new(),
            is_kamikaze: false,
        }
    }

    pub fn stats(&self) -> UnitStats {
        self.unit_type.stats()
    }

    /// Destroyed units stay in the list with hp <= 0
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Spend the whole turn: no movement or attack left
    pub fn exhaust(&mut self) {
        self.has_moved = true;
        self.has_attacked = true;
        self.remaining_mov = 0;
    }

    /// Spare cargo slots for a unit of `category`, zero if it can't carry it
    pub fn free_cargo_slots(&self, category: UnitCategory) -> usize {
        if self.unit_type.carries() == Some(category) {
            self.stats().cargo_capacity.saturating_sub(self.cargo.len())
        } else {
            0
        }
    }

    /// Can this unit take `other` aboard right now?
    pub fn can_load(&self, other: &Unit) -> bool {
        self.player == other.player
            && self.is_alive()
            && self.id != other.id
            && self.free_cargo_slots(other.category) > 0
    }

    /// Apply damage, flooring at zero
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    /// Raise max HP and heal to full
    pub fn reinforce(&mut self, bonus: i32) {
        self.max_hp += bonus;
        self.hp = self.max_hp;
    }

    /// Visit this unit and everything embarked in it, depth-first
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Unit)) {
        f(self);
        for cargo in &mut self.cargo {
            cargo.for_each_mut(f);
        }
    }
}

/// Where a unit sits in the state's unit list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitLocation {
    /// Top-level unit at this index of `GameState::units`
    OnMap { index: usize },
    /// Embarked: `units[carrier_index].cargo[slot]`
    Embarked { carrier_index: usize, slot: usize },
}

impl UnitLocation {
    pub fn is_embarked(&self) -> bool {
        matches!(self, UnitLocation::Embarked { .. })
    }
}
