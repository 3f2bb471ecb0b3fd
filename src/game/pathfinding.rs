//! Reachability search
//!
//! Breadth-first expansion over the four orthogonal neighbours with a
//! uniform step cost of 1. The result is a dense cost field over the board,
//! used both for move legality and by the AI as a goal-directed cost map.

use std::collections::VecDeque;

use crate::core::types::Position;
use crate::game::board::Board;
use crate::game::state::GameState;
use crate::game::terrain::TerrainType;
use crate::game::unit_type::UnitCategory;
use crate::game::units::Unit;

/// Minimal step cost to every reachable tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachMap {
    width: u32,
    origin: Position,
    costs: Vec<Option<u32>>,
}

impl ReachMap {
    fn new(board: &Board, origin: Position) -> Self {
        Self {
            width: board.width(),
            origin,
            costs: vec![None; board.area()],
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let height = self.costs.len() as u32 / self.width.max(1);
        if pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < height {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Record `cost` if it improves on what is known; true when it did
    fn relax(&mut self, pos: Position, cost: u32) -> bool {
        match self.index(pos) {
            Some(i) if self.costs[i].map_or(true, |known| cost < known) => {
                self.costs[i] = Some(cost);
                true
            }
            _ => false,
        }
    }

    /// Where the search started (the carrier's tile for a launch)
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn cost(&self, pos: Position) -> Option<u32> {
        self.index(pos).and_then(|i| self.costs[i])
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cost(pos).is_some()
    }

    /// Reachable tiles and their costs, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        let width = self.width.max(1) as usize;
        self.costs.iter().enumerate().filter_map(move |(i, cost)| {
            cost.map(|c| (Position::new((i % width) as i32, (i / width) as i32), c))
        })
    }

    pub fn len(&self) -> usize {
        self.costs.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Does the living unit standing on a tile stop `mover` from entering it?
///
/// A friendly unit able to carry the mover never blocks (air onto a carrier,
/// land onto a transport). Otherwise aircraft block aircraft and every
/// surface unit blocks every other surface unit.
fn blocks(mover: &Unit, occupant: &Unit) -> bool {
    if occupant.player == mover.player && occupant.unit_type.carries() == Some(mover.category) {
        return false;
    }
    let mover_air = mover.category == UnitCategory::Air;
    let occupant_air = occupant.category == UnitCategory::Air;
    mover_air == occupant_air
}

/// Every tile `unit` can reach this turn and the cost to get there.
///
/// `origin` overrides the start tile; used when an embarked unit launches
/// from its carrier.
pub fn reachable_tiles(unit: &Unit, state: &GameState, origin: Option<Position>) -> ReachMap {
    let board = &state.board;
    let start = origin.unwrap_or(unit.position);
    let mut reach = ReachMap::new(board, start);
    reach.relax(start, 0);

    let mut queue = VecDeque::from([(start, 0u32)]);

    while let Some((pos, cost)) = queue.pop_front() {
        for next in pos.neighbors() {
            let Some(terrain) = board.terrain(next) else {
                continue;
            };

            if let Some(occupant) = state.unit_at(next) {
                if blocks(unit, occupant) {
                    continue;
                }
            }

            let next_cost = cost + 1;
            if next_cost > unit.remaining_mov {
                continue;
            }

            // Wading into the sea ends the move on that tile
            if unit.category == UnitCategory::Land && terrain == TerrainType::Sea {
                reach.relax(next, next_cost);
                continue;
            }

            if !terrain.is_passable_for(unit.category) {
                continue;
            }

            if reach.relax(next, next_cost) {
                queue.push_back((next, next_cost));
            }
        }
    }

    reach
}
