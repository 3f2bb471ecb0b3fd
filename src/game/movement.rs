//! Move legality and execution
//!
//! Three kinds of move share one entry point: an ordinary step across the
//! board, a launch out of a carrier's cargo, and boarding a friendly
//! carrier or transport. The predicate decides which; the mutator re-checks
//! it and never touches the input on rejection.

use thiserror::Error;
use tracing::debug;

use crate::core::types::{Position, UnitId};
use crate::game::events::{GameEvent, Transition};
use crate::game::pathfinding::reachable_tiles;
use crate::game::state::{Buff, GameState};
use crate::game::terrain::TerrainType;
use crate::game::unit_type::UnitCategory;
use crate::game::units::{Unit, UnitLocation};
use crate::game::visibility::recompute;

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveDenied {
    #[error("unit not found")]
    UnitNotFound,
    #[error("unit is destroyed")]
    Destroyed,
    #[error("cannot move after attacking")]
    AlreadyAttacked,
    #[error("no movement left")]
    NoMovementLeft,
    #[error("target is outside the board")]
    OutOfBounds,
    #[error("target cannot be reached")]
    Unreachable,
    #[error("target tile is occupied")]
    Occupied,
    #[error("carrier has no free slot")]
    CarrierFull,
    #[error("cannot launch from a destroyed carrier")]
    CarrierDestroyed,
}

/// What an accepted move will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// End on an empty tile
    Step,
    /// Board the friendly carrier or transport standing on the target
    Embark { carrier: UnitId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub kind: MoveKind,
    /// Search origin: the unit's tile, or its carrier's when launching
    pub origin: Position,
    pub cost: u32,
}

/// Check whether `unit` may move to `target` this turn
pub fn can_move_to(unit: &Unit, target: Position, state: &GameState) -> Result<MovePlan, MoveDenied> {
    if !unit.is_alive() {
        return Err(MoveDenied::Destroyed);
    }
    if !state.board.in_bounds(target) {
        return Err(MoveDenied::OutOfBounds);
    }
    if unit.has_attacked {
        return Err(MoveDenied::AlreadyAttacked);
    }
    if unit.remaining_mov == 0 {
        return Err(MoveDenied::NoMovementLeft);
    }

    // Embarked units search from their carrier's tile
    let launch_from = match state.locate(unit.id) {
        Some(UnitLocation::Embarked { carrier_index, .. }) => {
            let carrier = &state.units[carrier_index];
            if !carrier.is_alive() {
                return Err(MoveDenied::CarrierDestroyed);
            }
            Some(carrier.position)
        }
        _ => None,
    };

    let reach = reachable_tiles(unit, state, launch_from);
    let cost = reach.cost(target).ok_or(MoveDenied::Unreachable)?;
    let origin = reach.origin();

    let kind = match state.unit_at(target) {
        None => MoveKind::Step,
        Some(occupant) if launch_from.is_some() && occupant.position == origin => {
            return Err(MoveDenied::Occupied);
        }
        Some(occupant)
            if occupant.player == unit.player
                && occupant.unit_type.carries() == Some(unit.category) =>
        {
            if !occupant.can_load(unit) {
                return Err(MoveDenied::CarrierFull);
            }
            MoveKind::Embark {
                carrier: occupant.id,
            }
        }
        Some(_) => return Err(MoveDenied::Occupied),
    };

    Ok(MovePlan { kind, origin, cost })
}

/// Move a unit, returning the new state and what happened.
///
/// Rejected moves return the input unchanged with no events.
pub fn perform_move(state: &GameState, unit_id: UnitId, target: Position) -> Transition {
    let Some((unit, location)) = state.find_unit(unit_id) else {
        debug!(%unit_id, "move rejected: {}", MoveDenied::UnitNotFound);
        return Transition::unchanged(state);
    };

    let plan = match can_move_to(unit, target, state) {
        Ok(plan) => plan,
        Err(reason) => {
            debug!(%unit_id, %target, "move rejected: {reason}");
            return Transition::unchanged(state);
        }
    };

    let mut next = state.clone();
    let mut events = Vec::new();

    // Launched units leave the cargo; walkers keep their slot in the list
    let mover = match location {
        UnitLocation::Embarked {
            carrier_index,
            slot,
        } => {
            let carrier = next.units[carrier_index].id;
            let mut launched = next.units[carrier_index].cargo.remove(slot);
            settle(&mut launched, plan, target);
            // Launching is a move, never an attack
            launched.has_attacked = false;
            events.push(GameEvent::UnitLaunched {
                unit: unit_id,
                carrier,
                to: target,
            });
            Mover::Detached(launched)
        }
        UnitLocation::OnMap { index } => {
            let player = next.units[index].player;
            let free_follow_up = next.units[index].unit_type.attacks_after_moving()
                || next.has_buff(player, Buff::Blitzkrieg);

            let walker = &mut next.units[index];
            settle(walker, plan, target);
            if !free_follow_up {
                walker.has_attacked = true;
            }

            events.push(GameEvent::UnitMoved {
                unit: unit_id,
                from: plan.origin,
                to: target,
                cost: plan.cost,
            });
            Mover::InPlace(index)
        }
    };

    match plan.kind {
        MoveKind::Embark { carrier } => {
            let mut mover = match mover {
                Mover::Detached(unit) => unit,
                Mover::InPlace(index) => next.units.remove(index),
            };
            mover.exhaust();
            match next.units.iter_mut().find(|u| u.id == carrier) {
                Some(host) => {
                    mover.position = host.position;
                    host.cargo.push(mover);
                }
                None => next.units.push(mover),
            }
            events.push(GameEvent::UnitEmbarked {
                unit: unit_id,
                carrier,
            });
        }
        MoveKind::Step => {
            let terrain = next.board.terrain(target);
            match mover {
                Mover::InPlace(index) => {
                    arrive(&mut next.units[index], terrain, target, &mut events);
                }
                Mover::Detached(mut unit) => {
                    arrive(&mut unit, terrain, target, &mut events);
                    next.units.push(unit);
                }
            }
        }
    }

    recompute(&mut next);
    Transition::new(next, events)
}

/// Where the moving unit sits while a move is applied
enum Mover {
    /// Still in the top-level list at this index
    InPlace(usize),
    /// Taken out of a carrier's cargo
    Detached(Unit),
}

/// Finish a step onto an open tile
fn arrive(
    unit: &mut Unit,
    terrain: Option<TerrainType>,
    target: Position,
    events: &mut Vec<GameEvent>,
) {
    if unit.category == UnitCategory::Land && terrain == Some(TerrainType::Sea) {
        unit.remaining_mov = 0;
        unit.has_attacked = true;
        events.push(GameEvent::UnitStranded {
            unit: unit.id,
            at: target,
        });
    }
    // Cargo rides along
    for passenger in &mut unit.cargo {
        passenger.position = target;
    }
}

/// Common bookkeeping for any accepted move
fn settle(unit: &mut Unit, plan: MovePlan, target: Position) {
    unit.remaining_mov = unit.remaining_mov.saturating_sub(plan.cost);
    if let Some(facing) = plan.origin.facing_towards(&target) {
        unit.facing = Some(facing);
    }
    unit.position = target;
    unit.has_moved = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Player;
    use crate::game::board::{Board, MapId};
    use crate::game::setup::create_initial_state;
    use crate::game::unit_type::UnitType;

    fn open_state() -> GameState {
        let mut state = create_initial_state(MapId::Default, 0);
        state.board = Board::new(8, 8);
        state
    }

    fn add(state: &mut GameState, unit_type: UnitType, player: Player, x: i32, y: i32) -> UnitId {
        let id = state.allocate_id();
        state
            .units
            .push(Unit::new(id, unit_type, player, Position::new(x, y)));
        id
    }

    fn get(state: &GameState, id: UnitId) -> &Unit {
        state.find_unit(id).unwrap().0
    }

    #[test]
    fn test_ordinary_move_spends_cost() {
        let mut state = open_state();
        let tank = add(&mut state, UnitType::Tank, Player::Player1, 1, 1);

        let result = perform_move(&state, tank, Position::new(3, 1));
        let moved = get(&result.state, tank);
        assert_eq!(moved.position, Position::new(3, 1));
        assert_eq!(moved.remaining_mov, 1);
        assert!(moved.has_moved);
        // Tanks cannot shoot after moving
        assert!(moved.has_attacked);
        assert_eq!(result.events.len(), 1);
    }

    #[test]
    fn test_assault_keeps_attack_after_move() {
        let mut state = open_state();
        let assault = add(&mut state, UnitType::Assault, Player::Player1, 1, 1);
        let result = perform_move(&state, assault, Position::new(1, 4));
        assert!(!get(&result.state, assault).has_attacked);
    }

    #[test]
    fn test_blitzkrieg_allows_move_then_attack() {
        let mut state = open_state();
        let tank = add(&mut state, UnitType::Tank, Player::Player1, 1, 1);
        state.buffs[Player::Player1].push(Buff::Blitzkrieg);
        let result = perform_move(&state, tank, Position::new(2, 1));
        assert!(!get(&result.state, tank).has_attacked);
    }

    #[test]
    fn test_unreachable_move_is_noop() {
        let mut state = open_state();
        let infantry = add(&mut state, UnitType::Infantry, Player::Player1, 1, 1);
        assert_eq!(
            can_move_to(get(&state, infantry), Position::new(5, 5), &state),
            Err(MoveDenied::Unreachable)
        );
        let result = perform_move(&state, infantry, Position::new(5, 5));
        assert!(result.is_noop());
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_cannot_move_after_attacking() {
        let mut state = open_state();
        let infantry = add(&mut state, UnitType::Infantry, Player::Player1, 1, 1);
        state.units[0].has_attacked = true;
        assert_eq!(
            can_move_to(get(&state, infantry), Position::new(1, 2), &state),
            Err(MoveDenied::AlreadyAttacked)
        );
    }

    #[test]
    fn test_land_unit_stranded_at_sea() {
        let mut state = open_state();
        state.board.set_terrain(Position::new(2, 1), TerrainType::Sea);
        let assault = add(&mut state, UnitType::Assault, Player::Player1, 1, 1);

        let result = perform_move(&state, assault, Position::new(2, 1));
        let moved = get(&result.state, assault);
        assert_eq!(moved.remaining_mov, 0);
        assert!(moved.has_attacked);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::UnitStranded { .. })));
    }

    #[test]
    fn test_embark_and_launch() {
        let mut state = open_state();
        for x in 0..8 {
            state.board.set_terrain(Position::new(x, 2), TerrainType::Sea);
        }
        let carrier = add(&mut state, UnitType::Carrier, Player::Player1, 3, 2);
        let fighter = add(&mut state, UnitType::Fighter, Player::Player1, 3, 0);

        let boarded = perform_move(&state, fighter, Position::new(3, 2)).state;
        assert_eq!(boarded.units.len(), 1);
        let (passenger, location) = boarded.find_unit(fighter).unwrap();
        assert!(location.is_embarked());
        assert_eq!(passenger.remaining_mov, 0);

        // Next turn: launch from the carrier
        let mut refreshed = boarded.clone();
        refreshed.units[0].cargo[0].remaining_mov = 4;
        refreshed.units[0].cargo[0].has_moved = false;
        refreshed.units[0].cargo[0].has_attacked = false;

        let launched = perform_move(&refreshed, fighter, Position::new(3, 4)).state;
        let (flyer, location) = launched.find_unit(fighter).unwrap();
        assert!(!location.is_embarked());
        assert_eq!(flyer.remaining_mov, 2);
        assert!(!flyer.has_attacked);
        assert!(get(&launched, carrier).cargo.is_empty());
    }

    #[test]
    fn test_full_carrier_rejects_third_aircraft() {
        let mut state = open_state();
        for x in 0..8 {
            state.board.set_terrain(Position::new(x, 2), TerrainType::Sea);
        }
        let carrier = add(&mut state, UnitType::Carrier, Player::Player1, 3, 2);
        for x in [2, 3, 4] {
            add(&mut state, UnitType::Fighter, Player::Player1, x, 0);
        }
        let fighters: Vec<UnitId> = state.units[1..].iter().map(|u| u.id).collect();

        let mut current = state.clone();
        for &f in &fighters[..2] {
            current = perform_move(&current, f, Position::new(3, 2)).state;
        }
        assert_eq!(get(&current, carrier).cargo.len(), 2);

        let third = get(&current, fighters[2]).clone();
        assert_eq!(
            can_move_to(&third, Position::new(3, 2), &current),
            Err(MoveDenied::CarrierFull)
        );
        let after = perform_move(&current, fighters[2], Position::new(3, 2));
        assert!(after.is_noop());
        assert_eq!(get(&after.state, carrier).cargo.len(), 2);
    }

    #[test]
    fn test_move_keeps_list_order() {
        let mut state = open_state();
        let first = add(&mut state, UnitType::Tank, Player::Player1, 0, 0);
        let second = add(&mut state, UnitType::Tank, Player::Player1, 3, 0);
        let third = add(&mut state, UnitType::Tank, Player::Player1, 6, 0);

        let result = perform_move(&state, first, Position::new(0, 2));
        let order: Vec<UnitId> = result.state.units.iter().map(|u| u.id).collect();
        assert_eq!(order, vec![first, second, third]);
        assert_eq!(result.state.units[0].position, Position::new(0, 2));
    }

    #[test]
    fn test_cannot_launch_from_wreck() {
        let mut state = open_state();
        for x in 0..8 {
            state.board.set_terrain(Position::new(x, 2), TerrainType::Sea);
        }
        add(&mut state, UnitType::Carrier, Player::Player1, 3, 2);
        let fighter = add(&mut state, UnitType::Fighter, Player::Player1, 3, 0);
        let mut loaded = perform_move(&state, fighter, Position::new(3, 2)).state;
        loaded.units[0].cargo[0].remaining_mov = 4;
        loaded.units[0].cargo[0].has_moved = false;
        loaded.units[0].cargo[0].has_attacked = false;
        loaded.units[0].hp = 0;

        let pilot = get(&loaded, fighter).clone();
        assert!(pilot.is_alive());
        assert_eq!(
            can_move_to(&pilot, Position::new(3, 4), &loaded),
            Err(MoveDenied::CarrierDestroyed)
        );
        let result = perform_move(&loaded, fighter, Position::new(3, 4));
        assert!(result.is_noop());
        assert!(result.state.find_unit(fighter).unwrap().1.is_embarked());
    }

    #[test]
    fn test_cargo_follows_carrier() {
        let mut state = open_state();
        for x in 0..8 {
            state.board.set_terrain(Position::new(x, 2), TerrainType::Sea);
        }
        let transport = add(&mut state, UnitType::Transport, Player::Player1, 1, 2);
        let infantry = add(&mut state, UnitType::Infantry, Player::Player1, 1, 1);

        let loaded = perform_move(&state, infantry, Position::new(1, 2)).state;
        let sailed = perform_move(&loaded, transport, Position::new(5, 2)).state;
        assert_eq!(get(&sailed, infantry).position, Position::new(5, 2));
    }
}
