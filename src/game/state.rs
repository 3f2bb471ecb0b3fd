//! Aggregate game state
//!
//! `GameState` is a value: mutators clone it and hand back the new snapshot.
//! Visibility is derived and skipped by serde; see `game::wire` for the
//! transport form.

use serde::{Deserialize, Serialize};

use crate::core::types::{PerPlayer, Player, Position, Timestamp, UnitId};
use crate::game::board::{Board, MapId};
use crate::game::events::Effect;
use crate::game::nation::{NationId, NationTraits};
use crate::game::units::{Unit, UnitLocation};
use crate::game::visibility::Visibility;

/// AI strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = crate::core::error::GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::core::error::GameError::UnknownName {
                kind: "difficulty",
                name: s.to_string(),
            })
    }
}

/// Who is driving each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "PvP")]
    PvP,
    #[default]
    #[serde(rename = "PvE")]
    PvE,
    #[serde(rename = "ONLINE")]
    Online,
}

/// Temporary per-player effects, cleared when that player's turn ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Buff {
    /// +2 attack, and every unit may attack after moving
    Blitzkrieg,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    /// Top-level units only; embarked units live in their carrier's cargo.
    /// Destroyed units are never removed.
    pub units: Vec<Unit>,
    pub current_player: Player,
    pub money: PerPlayer<u32>,
    pub base_hp: PerPlayer<i32>,
    pub turn: u32,
    /// Always a pure function of the rest of the state
    #[serde(skip)]
    pub visibility: Visibility,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub map_id: MapId,
    pub nations: PerPlayer<NationId>,
    pub skill_used: PerPlayer<bool>,
    pub buffs: PerPlayer<Vec<Buff>>,
    /// Most recent combat effect, overwritten by the next one
    #[serde(default)]
    pub latest_effect: Option<Effect>,
    /// Advisory only; nothing in the engine enforces it
    #[serde(default)]
    pub turn_deadline: Option<Timestamp>,
    pub next_unit_id: u32,
}

impl GameState {
    /// Living top-level unit on `pos`
    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.unit_index_at(pos).map(|i| &self.units[i])
    }

    pub fn unit_index_at(&self, pos: Position) -> Option<usize> {
        self.units
            .iter()
            .position(|u| u.is_alive() && u.position == pos)
    }

    /// Find a unit wherever it is: on the map or embarked
    pub fn locate(&self, id: UnitId) -> Option<UnitLocation> {
        for (index, unit) in self.units.iter().enumerate() {
            if unit.id == id {
                return Some(UnitLocation::OnMap { index });
            }
            if let Some(slot) = unit.cargo.iter().position(|c| c.id == id) {
                return Some(UnitLocation::Embarked {
                    carrier_index: index,
                    slot,
                });
            }
        }
        None
    }

    pub fn find_unit(&self, id: UnitId) -> Option<(&Unit, UnitLocation)> {
        let location = self.locate(id)?;
        Some((self.unit(location), location))
    }

    pub fn unit(&self, location: UnitLocation) -> &Unit {
        match location {
            UnitLocation::OnMap { index } => &self.units[index],
            UnitLocation::Embarked {
                carrier_index,
                slot,
            } => &self.units[carrier_index].cargo[slot],
        }
    }

    pub fn unit_mut(&mut self, location: UnitLocation) -> &mut Unit {
        match location {
            UnitLocation::OnMap { index } => &mut self.units[index],
            UnitLocation::Embarked {
                carrier_index,
                slot,
            } => &mut self.units[carrier_index].cargo[slot],
        }
    }

    /// Every unit, top-level first then its cargo
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .iter()
            .flat_map(|u| std::iter::once(u).chain(u.cargo.iter()))
    }

    /// Living top-level units of `player`
    pub fn living_units(&self, player: Player) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .iter()
            .filter(move |u| u.player == player && u.is_alive())
    }

    pub fn traits(&self, player: Player) -> NationTraits {
        self.nations[player].traits()
    }

    pub fn has_buff(&self, player: Player, buff: Buff) -> bool {
        self.buffs[player].contains(&buff)
    }

    /// The side whose opponent's base has fallen, if any
    pub fn winner(&self) -> Option<Player> {
        Player::ALL
            .into_iter()
            .find(|&p| self.base_hp[p] <= 0)
            .map(Player::opponent)
    }

    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Hand out the next unit id
    pub fn allocate_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }
}
