//! Fog of war
//!
//! Visible tiles are rebuilt from scratch after every mutation: territory
//! first, then a Manhattan disk around every living top-level unit. There
//! is no incremental update path.

use crate::core::types::{PerPlayer, Player, Position};
use crate::game::state::GameState;
use crate::game::units::Unit;

/// Per-player dense visibility grid, row-major like the board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Visibility {
    width: u32,
    height: u32,
    grids: PerPlayer<Vec<bool>>,
}

impl Visibility {
    /// Nothing visible to anyone
    pub fn new(width: u32, height: u32) -> Self {
        let area = (width * height) as usize;
        Self {
            width,
            height,
            grids: PerPlayer::splat(vec![false; area]),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
        {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn is_visible(&self, player: Player, pos: Position) -> bool {
        self.index(pos)
            .map(|i| self.grids[player][i])
            .unwrap_or(false)
    }

    /// Mark a tile visible; out-of-bounds positions are ignored
    pub fn reveal(&mut self, player: Player, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.grids[player][i] = true;
        }
    }

    /// Visible tiles of `player` in row-major order
    pub fn visible_tiles(&self, player: Player) -> impl Iterator<Item = Position> + '_ {
        let width = self.width.max(1) as usize;
        self.grids[player]
            .iter()
            .enumerate()
            .filter(|(_, &seen)| seen)
            .map(move |(i, _)| Position::new((i % width) as i32, (i / width) as i32))
    }

    pub fn count(&self, player: Player) -> usize {
        self.grids[player].iter().filter(|&&seen| seen).count()
    }
}

/// Reveal every tile within Manhattan `radius` of `center`
fn reveal_disk(visibility: &mut Visibility, player: Player, center: Position, radius: u32) {
    let r = radius as i32;
    for dy in -r..=r {
        let span = r - dy.abs();
        for dx in -span..=span {
            visibility.reveal(player, Position::new(center.x + dx, center.y + dy));
        }
    }
}

/// Derive both players' visible tiles from the board and units
pub fn compute_visibility(state: &GameState) -> Visibility {
    let board = &state.board;
    let mut visibility = Visibility::new(board.width(), board.height());

    for (pos, tile) in board.iter() {
        if let Some(owner) = tile.owner {
            visibility.reveal(owner, pos);
        }
    }

    for unit in state.units.iter().filter(|u| u.is_alive()) {
        let radius =
            unit.stats().vision + state.traits(unit.player).vision_bonus(unit.category);
        reveal_disk(&mut visibility, unit.player, unit.position, radius);
    }

    visibility
}

/// Replace the state's visibility with a fresh computation
pub fn recompute(state: &mut GameState) {
    state.visibility = compute_visibility(state);
}

/// Can `observer` see this unit?
///
/// Owners always see their own units. Anyone else needs the tile in view,
/// and a hidden unit additionally needs one of the observer's living units
/// within one tile (diagonals included).
pub fn is_unit_visible_to(unit: &Unit, observer: Player, state: &GameState) -> bool {
    if unit.player == observer {
        return true;
    }

    if !state.visibility.is_visible(observer, unit.position) {
        return false;
    }

    if unit.is_hidden {
        return state
            .living_units(observer)
            .any(|u| u.position.chebyshev(&unit.position) <= 1);
    }

    true
}
