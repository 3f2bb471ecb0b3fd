//! Core type definitions used throughout the codebase

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;

/// Milliseconds since the Unix epoch, supplied by the caller
pub type Timestamp = u64;

/// One of the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "PLAYER1")]
    Player1,
    #[serde(rename = "PLAYER2")]
    Player2,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Player1, Player::Player2];

    pub fn opponent(self) -> Self {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::Player1 => "PLAYER1",
            Player::Player2 => "PLAYER2",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Player {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PLAYER1" | "P1" => Ok(Player::Player1),
            "PLAYER2" | "P2" => Ok(Player::Player2),
            _ => Err(GameError::UnknownName {
                kind: "player",
                name: s.to_string(),
            }),
        }
    }
}

/// A value held once per player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    #[serde(rename = "PLAYER1")]
    pub player1: T,
    #[serde(rename = "PLAYER2")]
    pub player2: T,
}

impl<T> PerPlayer<T> {
    pub fn new(player1: T, player2: T) -> Self {
        Self { player1, player2 }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerPlayer<U> {
        PerPlayer {
            player1: f(&self.player1),
            player2: f(&self.player2),
        }
    }
}

impl<T: Clone> PerPlayer<T> {
    pub fn splat(value: T) -> Self {
        Self {
            player1: value.clone(),
            player2: value,
        }
    }
}

impl<T> Index<Player> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: Player) -> &T {
        match player {
            Player::Player1 => &self.player1,
            Player::Player2 => &self.player2,
        }
    }
}

impl<T> IndexMut<Player> for PerPlayer<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::Player1 => &mut self.player1,
            Player::Player2 => &mut self.player2,
        }
    }
}

/// Grid coordinate (x = column, y = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance (movement and weapon range)
    pub fn distance(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Chebyshev distance (8-neighbourhood checks)
    pub fn chebyshev(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// The four orthogonal neighbours
    pub fn neighbors(&self) -> [Position; 4] {
        [
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y),
            Position::new(self.x, self.y + 1),
            Position::new(self.x, self.y - 1),
        ]
    }

    /// The eight surrounding tiles, excluding self
    pub fn surrounding(&self) -> impl Iterator<Item = Position> + '_ {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| Position::new(self.x + dx, self.y + dy))
    }

    /// Facing angle for a move from `self` to `to`, if it moves at all
    pub fn facing_towards(&self, to: &Self) -> Option<f32> {
        let dx = to.x - self.x;
        let dy = to.y - self.y;
        if dx == 0 && dy == 0 {
            None
        } else {
            Some((dx as f32).atan2(dy as f32))
        }
    }

    /// `"x,y"` key used by the transport form
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    pub fn parse_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        Some(Self::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unique identifier for units, allocated from the game state's counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}
