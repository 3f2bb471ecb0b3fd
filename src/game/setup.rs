//! Initial state construction

use tracing::info;

use crate::core::config::MatchConfig;
use crate::core::types::{PerPlayer, Player, Timestamp};
use crate::game::board::MapId;
use crate::game::constants::{STARTING_BASE_HP, TURN_DURATION_MS};
use crate::game::nation::NationId;
use crate::game::state::{Difficulty, GameMode, GameState};
use crate::game::visibility::{recompute, Visibility};

/// Fresh PvE state on `map_id` with the default line-up (GERMANY vs USSR)
pub fn create_initial_state(map_id: MapId, now: Timestamp) -> GameState {
    let board = map_id.build_board();
    let start_money = map_id.starting_money();
    let visibility = Visibility::new(board.width(), board.height());

    let mut state = GameState {
        board,
        units: Vec::new(),
        current_player: Player::Player1,
        money: PerPlayer::splat(start_money),
        base_hp: PerPlayer::splat(STARTING_BASE_HP),
        turn: 1,
        visibility,
        mode: GameMode::PvE,
        difficulty: Difficulty::Normal,
        map_id,
        nations: PerPlayer::new(NationId::Germany, NationId::Ussr),
        skill_used: PerPlayer::splat(false),
        buffs: PerPlayer::default(),
        latest_effect: None,
        turn_deadline: Some(now + TURN_DURATION_MS),
        next_unit_id: 1,
    };
    recompute(&mut state);
    state
}

/// Build the opening state for a configured match
pub fn new_match(config: &MatchConfig, now: Timestamp) -> GameState {
    let mut state = create_initial_state(config.map, now);
    state.mode = config.mode;
    state.difficulty = config.difficulty;
    state.nations = config.nations;
    // Nation passives can change vision
    recompute(&mut state);

    info!(
        map = %config.map,
        p1 = %config.nations.player1,
        p2 = %config.nations.player2,
        "match created"
    );
    state
}
