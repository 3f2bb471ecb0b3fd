//! AI Planner - plays a whole turn through the same primitives as a human
//!
//! Buys units first, then walks its units in order: attack in place if it
//! can, otherwise move toward a goal and try again.

use ordered_float::OrderedFloat;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::core::types::{Player, Position, Timestamp, UnitId};
use crate::game::ai::deployment::deployment_phase;
use crate::game::ai::profile::{AiProfile, TargetOrder};
use crate::game::ai::{roll, GameAI};
use crate::game::combat::{can_attack, perform_attack};
use crate::game::events::Transition;
use crate::game::movement::{can_move_to, perform_move};
use crate::game::pathfinding::reachable_tiles;
use crate::game::state::{Difficulty, GameState};
use crate::game::units::Unit;
use crate::game::visibility::is_unit_visible_to;

/// Heuristic AI implementing `GameAI`
pub struct AiPlanner {
    profile: AiProfile,
    rng: ChaCha8Rng,
}

impl AiPlanner {
    /// Create a planner with the default seed
    pub fn new(profile: AiProfile) -> Self {
        Self::with_seed(profile, 42)
    }

    /// Create with specific RNG seed for deterministic behavior
    pub fn with_seed(profile: AiProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Built-in profile for `difficulty`
    pub fn for_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_seed(AiProfile::for_difficulty(difficulty), seed)
    }
}

impl GameAI for AiPlanner {
    fn process_turn(&mut self, state: &GameState, now: Timestamp) -> Transition {
        process_ai_turn(state, &self.profile, &mut self.rng, now)
    }

    fn profile(&self) -> &AiProfile {
        &self.profile
    }

    fn ignores_fog_of_war(&self) -> bool {
        self.profile.ignores_fog_of_war
    }
}

/// Play `state.current_player`'s turn: deployment, then every unit acts once.
pub fn process_ai_turn(
    state: &GameState,
    profile: &AiProfile,
    rng: &mut impl Rng,
    now: Timestamp,
) -> Transition {
    let player = state.current_player;
    let mut result = deployment_phase(profile, state, player, rng);

    let roster: Vec<UnitId> = result.state.living_units(player).map(|u| u.id).collect();
    for id in roster {
        if result.state.is_game_over() {
            break;
        }
        let step = unit_action(&result.state, id, profile, rng, now);
        result = result.then(|_| step);
    }

    debug!(
        %player,
        events = result.events.len(),
        "AI turn planned"
    );
    result
}

/// Living top-level unit with this id
fn active_unit(state: &GameState, id: UnitId) -> Option<&Unit> {
    state
        .units
        .iter()
        .find(|u| u.id == id)
        .filter(|u| u.is_alive())
}

/// One unit's turn: attack in place, or move and then attack
fn unit_action(
    state: &GameState,
    id: UnitId,
    profile: &AiProfile,
    rng: &mut impl Rng,
    now: Timestamp,
) -> Transition {
    let Some(unit) = active_unit(state, id) else {
        return Transition::unchanged(state);
    };

    if !unit.has_attacked {
        if let Some(attack) = try_attack(state, unit, profile, rng, now) {
            return attack;
        }
    }
    if unit.has_moved {
        return Transition::unchanged(state);
    }

    let Some(goal) = choose_goal(state, unit, profile) else {
        return Transition::unchanged(state);
    };
    let Some(destination) = choose_destination(state, unit, goal, profile, rng) else {
        return Transition::unchanged(state);
    };

    debug!(unit = %id, %goal, %destination, "AI moves");
    let mut result = perform_move(state, id, destination);

    if let Some(moved) = active_unit(&result.state, id) {
        if !moved.has_attacked {
            if let Some(attack) = try_attack(&result.state, moved, profile, rng, now) {
                result = result.then(|_| attack);
            }
        }
    }
    result
}

/// Attack the enemy HQ if in reach, else the best unit target.
///
/// `None` when nothing was attacked.
fn try_attack(
    state: &GameState,
    unit: &Unit,
    profile: &AiProfile,
    rng: &mut impl Rng,
    now: Timestamp,
) -> Option<Transition> {
    let enemy = unit.player.opponent();

    if let Some(hq) = state.board.base_of(enemy) {
        if can_attack(unit, hq, state).is_ok() {
            debug!(unit = %unit.id, %hq, "AI strikes headquarters");
            return Some(perform_attack(state, unit.id, hq, now));
        }
    }

    let mut targets: Vec<&Unit> = state
        .living_units(enemy)
        .filter(|target| can_attack(unit, target.position, state).is_ok())
        .collect();
    if targets.is_empty() {
        return None;
    }

    match profile.tactics.target_order {
        TargetOrder::Weakest => targets.sort_by_key(|t| t.hp),
        TargetOrder::Nearest => targets.sort_by_key(|t| unit.position.distance(&t.position)),
    }

    if roll(rng, profile.tactics.hesitation_chance) {
        debug!(unit = %unit.id, "AI hesitates");
        return None;
    }

    let target = targets[0].position;
    Some(perform_attack(state, unit.id, target, now))
}

/// Where this unit should head
fn choose_goal(state: &GameState, unit: &Unit, profile: &AiProfile) -> Option<Position> {
    let enemy = unit.player.opponent();
    let hq = state.board.base_of(enemy);
    if hq.is_none() {
        warn!(player = %enemy, "enemy has no headquarters tile");
    }

    let enemies: Vec<&Unit> = state
        .living_units(enemy)
        .filter(|e| profile.ignores_fog_of_war || is_unit_visible_to(e, unit.player, state))
        .collect();

    let mut goal = hq.map(|pos| (pos, i64::from(unit.position.distance(&pos))));

    if profile.tactics.chase_units {
        for target in &enemies {
            // Engaging units is favoured by one tile over rushing the HQ
            let d = i64::from(unit.position.distance(&target.position)) - 1;
            if goal.map_or(true, |(_, best)| d < best) {
                goal = Some((target.position, d));
            }
        }
    }

    if let Some(threshold) = profile.tactics.weak_enemy_hp {
        let weakest = enemies
            .iter()
            .filter(|e| e.hp <= threshold)
            .min_by_key(|e| unit.position.distance(&e.position));
        if let Some(prey) = weakest {
            goal = Some((prey.position, 0));
        }
    }

    goal.map(|(pos, _)| pos)
}

/// Reachable tile closest to `goal`, preferring to stop at range
fn choose_destination(
    state: &GameState,
    unit: &Unit,
    goal: Position,
    profile: &AiProfile,
    rng: &mut impl Rng,
) -> Option<Position> {
    let reach = reachable_tiles(unit, state, None);
    let range_max = unit.stats().range_max;
    let jitter = profile.tactics.move_jitter;

    let mut scored = Vec::new();
    for (pos, _) in reach.iter() {
        if pos == unit.position || can_move_to(unit, pos, state).is_err() {
            continue;
        }
        let distance = pos.distance(&goal);
        let mut score = f64::from(distance);
        // Kiting: don't close in further than needed
        if range_max > 1 && distance < range_max - 1 {
            score += 1.0;
        }
        if jitter > 0.0 {
            score += rng.gen::<f64>() * jitter - jitter / 2.0;
        }
        scored.push((pos, OrderedFloat(score)));
    }

    scored
        .into_iter()
        .min_by_key(|&(_, score)| score)
        .map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PerPlayer;
    use crate::game::board::MapId;
    use crate::game::nation::NationId;
    use crate::game::setup::create_initial_state;
    use crate::game::unit_type::UnitType;

    fn quiet_state() -> GameState {
        let mut state = create_initial_state(MapId::Default, 0);
        state.money = PerPlayer::splat(0);
        state.nations = PerPlayer::new(NationId::Usa, NationId::Usa);
        state
    }

    fn place(state: &mut GameState, unit_type: UnitType, player: Player, x: i32, y: i32) -> UnitId {
        let id = state.allocate_id();
        state.units.push(Unit::new(id, unit_type, player, Position::new(x, y)));
        crate::game::visibility::recompute(state);
        id
    }

    #[test]
    fn test_attacks_adjacent_enemy_without_moving() {
        let mut state = quiet_state();
        let tank = place(&mut state, UnitType::Tank, Player::Player1, 1, 2);
        place(&mut state, UnitType::Infantry, Player::Player2, 1, 3);

        let mut planner = AiPlanner::for_difficulty(Difficulty::Normal, 1);
        let result = planner.process_turn(&state, 0);

        let (tank_after, _) = result.state.find_unit(tank).unwrap();
        assert_eq!(tank_after.position, Position::new(1, 2));
        assert!(tank_after.has_attacked);
        assert_eq!(result.events[0].name(), "unit_attacked");
    }

    #[test]
    fn test_headquarters_preferred_over_units() {
        let mut state = quiet_state();
        // PLAYER2's base sits at (7,7) on the default map
        let tank = place(&mut state, UnitType::Tank, Player::Player1, 7, 5);
        place(&mut state, UnitType::Infantry, Player::Player2, 6, 5);

        let mut planner = AiPlanner::for_difficulty(Difficulty::Normal, 1);
        let result = planner.process_turn(&state, 0);

        assert!(result.state.base_hp[Player::Player2] < 20);
        assert!(result.state.find_unit(tank).unwrap().0.has_attacked);
    }

    #[test]
    fn test_hard_targets_weakest() {
        let mut state = quiet_state();
        place(&mut state, UnitType::Tank, Player::Player1, 1, 2);
        let near = place(&mut state, UnitType::Infantry, Player::Player2, 1, 3);
        let weak = place(&mut state, UnitType::Infantry, Player::Player2, 0, 3);
        state.units.iter_mut().find(|u| u.id == weak).unwrap().hp = 1;
        state.units.iter_mut().find(|u| u.id == near).unwrap().hp = 2;

        let result = process_ai_turn(
            &state,
            &AiProfile::for_difficulty(Difficulty::Hard),
            &mut ChaCha8Rng::seed_from_u64(1),
            0,
        );
        assert!(!result.state.find_unit(weak).unwrap().0.is_alive());
        assert!(result.state.find_unit(near).unwrap().0.is_alive());
    }

    #[test]
    fn test_moves_toward_enemy_headquarters() {
        let mut state = quiet_state();
        let infantry = place(&mut state, UnitType::Infantry, Player::Player1, 0, 0);

        let mut planner = AiPlanner::for_difficulty(Difficulty::Normal, 1);
        let result = planner.process_turn(&state, 0);

        // Both neighbours tie; row-major order breaks it, even onto water
        let (moved, _) = result.state.find_unit(infantry).unwrap();
        assert_eq!(moved.position, Position::new(1, 0));
        assert!(moved.has_moved);
        assert_eq!(result.events[1].name(), "unit_stranded");
    }

    #[test]
    fn test_goal_chases_nearer_enemy() {
        let mut state = quiet_state();
        let id = place(&mut state, UnitType::Infantry, Player::Player1, 1, 1);
        place(&mut state, UnitType::Infantry, Player::Player2, 1, 5);
        let unit = state.find_unit(id).unwrap().0.clone();

        let chaser = AiProfile::for_difficulty(Difficulty::Normal);
        assert_eq!(choose_goal(&state, &unit, &chaser), Some(Position::new(1, 5)));

        let rusher = AiProfile::for_difficulty(Difficulty::Easy);
        assert_eq!(choose_goal(&state, &unit, &rusher), Some(Position::new(7, 7)));
    }

    #[test]
    fn test_hard_hunts_wounded() {
        let mut state = quiet_state();
        let id = place(&mut state, UnitType::Infantry, Player::Player1, 1, 1);
        place(&mut state, UnitType::Infantry, Player::Player2, 1, 5);
        let wounded = place(&mut state, UnitType::Tank, Player::Player2, 6, 6);
        state.units.iter_mut().find(|u| u.id == wounded).unwrap().hp = 2;
        let unit = state.find_unit(id).unwrap().0.clone();

        let hard = AiProfile::for_difficulty(Difficulty::Hard);
        assert_eq!(choose_goal(&state, &unit, &hard), Some(Position::new(6, 6)));
    }

    #[test]
    fn test_kiting_stops_short() {
        let mut state = quiet_state();
        let id = place(&mut state, UnitType::Tank, Player::Player1, 4, 1);
        let unit = state.find_unit(id).unwrap().0.clone();
        let goal = Position::new(6, 2);
        let profile = AiProfile::for_difficulty(Difficulty::Normal);

        // The goal tile itself is reachable, but a range-2 gun stops one short
        let dest = choose_destination(&state, &unit, goal, &profile, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert_eq!(dest, Position::new(6, 1));
    }

    #[test]
    fn test_same_seed_same_turn() {
        let mut state = create_initial_state(MapId::Default, 0);
        state.current_player = Player::Player2;
        let mut a = AiPlanner::for_difficulty(Difficulty::Easy, 77);
        let mut b = AiPlanner::for_difficulty(Difficulty::Easy, 77);

        let left = a.process_turn(&state, 0);
        let right = b.process_turn(&state, 0);
        assert_eq!(left.state, right.state);
        assert_eq!(left.events, right.events);
    }
}
