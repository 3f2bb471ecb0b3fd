//! Tile board and built-in map layouts
//!
//! Tiles are stored densely in row-major order; a position's index doubles
//! as its packed key for visibility and reachability grids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;
use crate::core::types::{Player, Position};
use crate::game::constants::{
    ARCHIPELAGO_STARTING_MONEY, DEFAULT_STARTING_MONEY, GOLDEN_VALLEY_STARTING_MONEY,
};
use crate::game::terrain::{TerrainType, Tile};

/// The full game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Board {
    /// Create an unowned board of plain land
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
        }
    }

    /// Build a board from layout rows and split territory by rows:
    /// the top half belongs to PLAYER1, the rest to PLAYER2.
    ///
    /// Layout glyphs: `.` land, `~` sea, `H` helipad, `B` base.
    pub fn from_layout(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as u32;
        let mut board = Self::new(width, height);

        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let terrain = match glyph {
                    '~' => TerrainType::Sea,
                    'H' => TerrainType::Helipad,
                    'B' => TerrainType::Base,
                    _ => TerrainType::Land,
                };
                let owner = if (y as u32) * 2 < height {
                    Player::Player1
                } else {
                    Player::Player2
                };
                let pos = Position::new(x as i32, y as i32);
                if let Some(tile) = board.tile_mut(pos) {
                    *tile = Tile::new(terrain, Some(owner));
                }
            }
        }

        board
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles
    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    /// Check if coordinate is within board bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Packed row-major index of an in-bounds position
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn position_of(&self, index: usize) -> Position {
        let width = self.width.max(1) as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index_of(pos).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index_of(pos).map(move |i| &mut self.tiles[i])
    }

    pub fn terrain(&self, pos: Position) -> Option<TerrainType> {
        self.tile(pos).map(|t| t.terrain)
    }

    pub fn set_terrain(&mut self, pos: Position, terrain: TerrainType) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.terrain = terrain;
        }
    }

    pub fn set_owner(&mut self, pos: Position, owner: Option<Player>) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.owner = owner;
        }
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.tiles.len()).map(move |i| self.position_of(i))
    }

    /// All tiles with their positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (self.position_of(i), tile))
    }

    /// Positions of every tile `player` owns
    pub fn territory_of(&self, player: Player) -> Vec<Position> {
        self.iter()
            .filter(|(_, tile)| tile.is_owned_by(player))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// The player's headquarters tile (first owned BASE, row-major)
    pub fn base_of(&self, player: Player) -> Option<Position> {
        self.iter()
            .find(|(_, tile)| tile.terrain == TerrainType::Base && tile.is_owned_by(player))
            .map(|(pos, _)| pos)
    }
}

/// Rectangle that pays a per-unit bonus at turn start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusZone {
    pub min: Position,
    pub max: Position,
}

impl BonusZone {
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Built-in map layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapId {
    #[default]
    Default,
    Archipelago,
    GoldenValley,
}

const DEFAULT_LAYOUT: [&str; 8] = [
    "B~~~~~~~",
    "H.~....~",
    "..~~...~",
    "...~~~~~",
    "~~~~~...",
    "~...~~..",
    "~....~.H",
    "~~~~~~~B",
];

const ARCHIPELAGO_HALF: [&str; 8] = [
    "B..~~~~~~~~~~~~~",
    ".H.~~..~~~~~~~~~",
    "...~....~~~~~~~~",
    "~~~~~~~~~..~~~~~",
    "~~~~~~~~..H.~~~~",
    "~~~..~~~~..~~~~~",
    "~~....~~~~~~~~..",
    "~~~~~~~~~~~~~...",
];

// Side lanes are water so land armies funnel through the valley floor
const GOLDEN_VALLEY_HALF: [&str; 12] = [
    "B....~~~~~~~~~~~~~.....H",
    ".....~~~~~~~~~~~~~......",
    ".H..~~~~........~~~~....",
    "~~~~~~~..........~~~~~~~",
    "~~~~~~............~~~~~~",
    "~~~~~...~~~..~~~...~~~~~",
    "~~~~...~~~~..~~~~...~~~~",
    "~~~...~~~~~..~~~~~...~~~",
    "~~...~~~~~....~~~~~...~~",
    "~...~~~~~......~~~~~...~",
    "...~~~~~........~~~~~...",
    "..~~~~~..........~~~~~..",
];

/// Complete a half layout by point symmetry (rotate 180 degrees), so the
/// second player's base sits in the opposite corner.
fn point_symmetric(top_half: &[&str]) -> Vec<String> {
    let mut rows: Vec<String> = top_half.iter().map(|r| r.to_string()).collect();
    rows.extend(
        top_half
            .iter()
            .rev()
            .map(|r| r.chars().rev().collect::<String>()),
    );
    rows
}

impl MapId {
    pub const ALL: [MapId; 3] = [MapId::Default, MapId::Archipelago, MapId::GoldenValley];

    /// Generate the initial board with terrain and territory
    pub fn build_board(&self) -> Board {
        match self {
            MapId::Default => Board::from_layout(&DEFAULT_LAYOUT),
            MapId::Archipelago => {
                let rows = point_symmetric(&ARCHIPELAGO_HALF);
                Board::from_layout(&rows.iter().map(String::as_str).collect::<Vec<_>>())
            }
            MapId::GoldenValley => {
                let rows = point_symmetric(&GOLDEN_VALLEY_HALF);
                Board::from_layout(&rows.iter().map(String::as_str).collect::<Vec<_>>())
            }
        }
    }

    pub fn starting_money(&self) -> u32 {
        match self {
            MapId::Default => DEFAULT_STARTING_MONEY,
            MapId::Archipelago => ARCHIPELAGO_STARTING_MONEY,
            MapId::GoldenValley => GOLDEN_VALLEY_STARTING_MONEY,
        }
    }

    /// Contested centre paying income per unit, if the map has one
    pub fn bonus_zone(&self) -> Option<BonusZone> {
        match self {
            MapId::GoldenValley => Some(BonusZone {
                min: Position::new(11, 11),
                max: Position::new(12, 12),
            }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MapId::Default => "DEFAULT",
            MapId::Archipelago => "ARCHIPELAGO",
            MapId::GoldenValley => "GOLDEN_VALLEY",
        }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        MapId::ALL
            .into_iter()
            .find(|map| map.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| GameError::UnknownName {
                kind: "map",
                name: s.to_string(),
            })
    }
}
