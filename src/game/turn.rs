//! Turn lifecycle

use tracing::info;

use crate::core::types::{Player, Timestamp};
use crate::game::constants::{BASE_INCOME, BONUS_ZONE_PAYOUT, TURN_DURATION_MS};
use crate::game::events::{GameEvent, Transition};
use crate::game::state::GameState;
use crate::game::visibility::recompute;

/// Income the incoming player collects at the start of their turn
pub fn turn_income(state: &GameState, player: Player) -> u32 {
    let mut income = BASE_INCOME + state.traits(player).income_bonus;

    if let Some(zone) = state.map_id.bonus_zone() {
        let holders = state
            .living_units(player)
            .filter(|u| zone.contains(u.position))
            .count() as u32;
        income += holders * BONUS_ZONE_PAYOUT;
    }

    income
}

/// End the current player's turn and start the opponent's.
///
/// Every unit, embarked ones included, gets its flags cleared and its
/// movement refilled. The ending player's buffs expire. The turn counter
/// advances only when play returns to PLAYER1.
pub fn start_new_turn(state: &GameState, now: Timestamp) -> Transition {
    let mut next = state.clone();
    let ending = state.current_player;
    let incoming = ending.opponent();

    let nations = next.nations;
    for unit in &mut next.units {
        unit.for_each_mut(&mut |u| {
            u.has_moved = false;
            u.has_attacked = false;
            u.remaining_mov = u.stats().mov + nations[u.player].traits().movement_bonus(u.category);
        });
    }

    next.current_player = incoming;
    next.buffs[ending].clear();

    let income = turn_income(&next, incoming);
    next.money[incoming] += income;

    if incoming == Player::Player1 {
        next.turn += 1;
    }
    next.turn_deadline = Some(now + TURN_DURATION_MS);

    recompute(&mut next);

    let turn = next.turn;
    info!(player = %incoming, turn, income, "turn started");
    Transition::new(
        next,
        vec![GameEvent::TurnStarted {
            player: incoming,
            turn,
            income,
        }],
    )
}
