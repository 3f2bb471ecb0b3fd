//! Transport form of the game state
//!
//! In memory, visibility is a dense grid. On the wire it is a list of
//! `"x,y"` keys per player, which is the shape remote peers persist and
//! exchange. The board may be left out of a snapshot and re-attached on
//! arrival, since both ends can build it from the map id.

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{PerPlayer, Player, Position, Timestamp};
use crate::game::board::{Board, MapId};
use crate::game::events::Effect;
use crate::game::nation::NationId;
use crate::game::state::{Buff, Difficulty, GameMode, GameState};
use crate::game::units::Unit;
use crate::game::visibility::Visibility;

/// `{ "PLAYER1": ["x,y", ...], "PLAYER2": [...] }`
pub type VisibilityWire = PerPlayer<Vec<String>>;

impl Visibility {
    /// Encode as tile keys, row-major
    pub fn to_wire(&self) -> VisibilityWire {
        PerPlayer::new(
            self.visible_tiles(Player::Player1).map(|p| p.key()).collect(),
            self.visible_tiles(Player::Player2).map(|p| p.key()).collect(),
        )
    }

    /// Decode tile keys for a `width` x `height` board
    pub fn from_wire(wire: &VisibilityWire, width: u32, height: u32) -> Result<Self> {
        let mut visibility = Visibility::new(width, height);
        for player in Player::ALL {
            for key in &wire[player] {
                let pos = Position::parse_key(key)
                    .ok_or_else(|| GameError::InvalidTileKey(key.clone()))?;
                let in_bounds =
                    pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < width && (pos.y as u32) < height;
                if !in_bounds {
                    return Err(GameError::TileOutOfBounds {
                        x: pos.x,
                        y: pos.y,
                        width,
                        height,
                    });
                }
                visibility.reveal(player, pos);
            }
        }
        Ok(visibility)
    }
}

/// Serializable snapshot of a `GameState`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    pub units: Vec<Unit>,
    pub current_player: Player,
    pub money: PerPlayer<u32>,
    pub base_hp: PerPlayer<i32>,
    pub turn: u32,
    pub visible_tiles: VisibilityWire,
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    pub map_id: MapId,
    pub nations: PerPlayer<NationId>,
    pub has_used_skill: PerPlayer<bool>,
    pub active_buffs: PerPlayer<Vec<Buff>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_effect: Option<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_deadline: Option<Timestamp>,
    pub next_unit_id: u32,
}

impl GameSnapshot {
    pub fn from_state(state: &GameState, include_board: bool) -> Self {
        Self {
            board: include_board.then(|| state.board.clone()),
            units: state.units.clone(),
            current_player: state.current_player,
            money: state.money,
            base_hp: state.base_hp,
            turn: state.turn,
            visible_tiles: state.visibility.to_wire(),
            game_mode: state.mode,
            difficulty: state.difficulty,
            map_id: state.map_id,
            nations: state.nations,
            has_used_skill: state.skill_used,
            active_buffs: state.buffs.clone(),
            latest_effect: state.latest_effect,
            turn_deadline: state.turn_deadline,
            next_unit_id: state.next_unit_id,
        }
    }

    /// Rebuild the state from a snapshot that carries its own board
    pub fn into_state(self) -> Result<GameState> {
        self.into_state_with(None)
    }

    /// Rebuild the state, using `known_board` when the snapshot has none
    pub fn into_state_with(self, known_board: Option<Board>) -> Result<GameState> {
        let board = self.board.or(known_board).ok_or(GameError::MissingBoard)?;
        let visibility = Visibility::from_wire(&self.visible_tiles, board.width(), board.height())?;

        Ok(GameState {
            board,
            units: self.units,
            current_player: self.current_player,
            money: self.money,
            base_hp: self.base_hp,
            turn: self.turn,
            visibility,
            mode: self.game_mode,
            difficulty: self.difficulty,
            map_id: self.map_id,
            nations: self.nations,
            skill_used: self.has_used_skill,
            buffs: self.active_buffs,
            latest_effect: self.latest_effect,
            turn_deadline: self.turn_deadline,
            next_unit_id: self.next_unit_id,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
