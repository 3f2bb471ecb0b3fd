//! Rules engine integration tests
//!
//! Multi-step scenarios played through the public API, the way a client
//! or the AI drives the engine.

use steel_tide::core::{PerPlayer, Player, Position, UnitId};
use steel_tide::game::{
    can_attack, can_deploy, can_move_to, create_initial_state, deploy_unit, perform_attack,
    perform_move, perform_nation_skill, reachable_tiles, recompute, start_new_turn, AttackDenied,
    Board, Buff, DeployDenied, GameEvent, GameSnapshot, GameState, MapId, MoveDenied, MoveKind,
    NationId, Unit, UnitType,
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// 8x8 board: land up top, two rows of sea, land below
const ARENA: [&str; 8] = [
    "B.......",
    "H.......",
    "........",
    "........",
    "~~~~~~~~",
    "~~~~~~~~",
    "......H.",
    ".......B",
];

fn arena(nations: PerPlayer<NationId>) -> GameState {
    let mut state = create_initial_state(MapId::Default, 0);
    state.board = Board::from_layout(&ARENA);
    state.nations = nations;
    recompute(&mut state);
    state
}

fn neutral_arena() -> GameState {
    arena(PerPlayer::splat(NationId::Usa))
}

fn spawn(state: &mut GameState, unit_type: UnitType, player: Player, x: i32, y: i32) -> UnitId {
    let id = state.allocate_id();
    state
        .units
        .push(Unit::new(id, unit_type, player, Position::new(x, y)));
    recompute(state);
    id
}

fn unit(state: &GameState, id: UnitId) -> &Unit {
    state.find_unit(id).expect("unit should exist").0
}

#[test]
fn test_infantry_duel_end_to_end() {
    let mut state = neutral_arena();
    let attacker = spawn(&mut state, UnitType::Infantry, Player::Player1, 2, 2);
    let defender = spawn(&mut state, UnitType::Infantry, Player::Player2, 2, 3);
    let bystander = spawn(&mut state, UnitType::Infantry, Player::Player2, 4, 2);

    // Distance 2 is out of reach for a range 1-1 unit
    assert_eq!(
        can_attack(unit(&state, attacker), Position::new(4, 2), &state),
        Err(AttackDenied::OutOfRange)
    );
    assert!(can_attack(unit(&state, attacker), Position::new(2, 3), &state).is_ok());

    let result = perform_attack(&state, attacker, Position::new(2, 3), 1_000);
    assert_eq!(unit(&result.state, defender).hp, 1);
    assert!(unit(&result.state, attacker).has_attacked);
    assert_eq!(result.state.latest_effect.map(|e| e.damage), Some(1));
    assert_eq!(result.state.latest_effect.map(|e| e.timestamp), Some(1_000));

    assert_eq!(
        can_attack(unit(&result.state, attacker), Position::new(2, 3), &result.state),
        Err(AttackDenied::AlreadyAttacked)
    );
    let again = perform_attack(&result.state, attacker, Position::new(2, 3), 2_000);
    assert!(again.is_noop());
    assert_eq!(unit(&again.state, defender).hp, 1);
    assert_eq!(unit(&again.state, bystander).hp, 2);
}

#[test]
fn test_anti_tank_versus_tank() {
    let mut state = neutral_arena();
    let gun = spawn(&mut state, UnitType::AntiTank, Player::Player1, 3, 2);
    let tank = spawn(&mut state, UnitType::Tank, Player::Player2, 3, 3);

    let result = perform_attack(&state, gun, Position::new(3, 3), 0);
    assert_eq!(unit(&result.state, tank).hp, 10 - 6);
}

#[test]
fn test_escort_shields_anti_air_from_aircraft() {
    let mut state = neutral_arena();
    let fighter = spawn(&mut state, UnitType::Fighter, Player::Player1, 3, 0);
    spawn(&mut state, UnitType::AntiAir, Player::Player2, 3, 2);
    let escort = spawn(&mut state, UnitType::Infantry, Player::Player2, 4, 3);

    assert_eq!(
        can_attack(unit(&state, fighter), Position::new(3, 2), &state),
        Err(AttackDenied::EscortedAntiAir)
    );

    // Kill the escort and the gun is fair game
    state
        .units
        .iter_mut()
        .filter(|u| u.id == escort)
        .for_each(|u| u.hp = 0);
    recompute(&mut state);
    assert!(can_attack(unit(&state, fighter), Position::new(3, 2), &state).is_ok());
}

#[test]
fn test_deployment_rules() {
    let state = neutral_arena();

    assert_eq!(
        can_deploy(&state, Player::Player1, UnitType::Cruiser, Position::new(2, 2)),
        Err(DeployDenied::WrongTerrain)
    );

    // Deep in enemy territory, still fine for paratroopers
    let drop = Position::new(3, 6);
    assert!(!state.board.tile(drop).unwrap().is_owned_by(Player::Player1));
    let result = deploy_unit(&state, Player::Player1, UnitType::Paratrooper, drop);
    let trooper = result.state.unit_at(drop).expect("paratrooper should land");
    assert_eq!(trooper.player, Player::Player1);
    assert!(!trooper.has_moved && !trooper.has_attacked);
    assert_eq!(result.state.money[Player::Player1], 200 - 40);
}

#[test]
fn test_carrier_takes_two_aircraft_only() {
    let mut state = neutral_arena();
    let carrier = spawn(&mut state, UnitType::Carrier, Player::Player1, 2, 4);

    let state = deploy_unit(&state, Player::Player1, UnitType::Fighter, Position::new(2, 4)).state;
    let mut state = deploy_unit(&state, Player::Player1, UnitType::Fighter, Position::new(2, 4)).state;
    assert_eq!(unit(&state, carrier).cargo.len(), 2);
    assert_eq!(
        can_deploy(&state, Player::Player1, UnitType::Fighter, Position::new(2, 4)),
        Err(DeployDenied::InsufficientFunds {
            cost: 80,
            available: 40
        })
    );

    let third = spawn(&mut state, UnitType::Fighter, Player::Player1, 2, 2);
    assert_eq!(
        can_move_to(unit(&state, third), Position::new(2, 4), &state),
        Err(MoveDenied::CarrierFull)
    );
    let result = perform_move(&state, third, Position::new(2, 4));
    assert!(result.is_noop());
    assert_eq!(result.state, state);
    assert_eq!(unit(&result.state, carrier).cargo.len(), 2);
}

#[test]
fn test_transport_ferries_infantry_across_the_strait() {
    let mut state = neutral_arena();
    let ship = spawn(&mut state, UnitType::Transport, Player::Player1, 3, 4);
    let soldier = spawn(&mut state, UnitType::Infantry, Player::Player1, 3, 3);

    let plan = can_move_to(unit(&state, soldier), Position::new(3, 4), &state).unwrap();
    assert_eq!(plan.kind, MoveKind::Embark { carrier: ship });
    let state = perform_move(&state, soldier, Position::new(3, 4)).state;
    assert_eq!(unit(&state, ship).cargo[0].id, soldier);
    assert!(state.find_unit(soldier).unwrap().1.is_embarked());

    // Next PLAYER1 turn: sail, then disembark on the far shore
    let state = start_new_turn(&state, 0).state;
    let state = start_new_turn(&state, 0).state;
    let state = perform_move(&state, ship, Position::new(3, 5)).state;
    assert_eq!(unit(&state, soldier).position, Position::new(3, 5));

    let result = perform_move(&state, soldier, Position::new(3, 6));
    assert!(matches!(result.events[0], GameEvent::UnitLaunched { .. }));
    let (landed, location) = result.state.find_unit(soldier).unwrap();
    assert!(!location.is_embarked());
    assert_eq!(landed.position, Position::new(3, 6));
    assert!(unit(&result.state, ship).cargo.is_empty());
}

#[test]
fn test_land_unit_reach_stops_at_shoreline() {
    let mut state = neutral_arena();
    let tank = spawn(&mut state, UnitType::Tank, Player::Player1, 3, 3);

    let reach = reachable_tiles(unit(&state, tank), &state, None);
    assert_eq!(reach.cost(Position::new(3, 4)), Some(1));
    assert!(!reach.contains(Position::new(3, 5)));
    assert!(!reach.contains(Position::new(3, 6)));
    assert!(reach.iter().all(|(_, cost)| cost <= 3));

    let result = perform_move(&state, tank, Position::new(3, 6));
    assert!(result.is_noop());
    assert_eq!(result.state, state);
}

#[test]
fn test_turn_cycle_resets_and_pays() {
    let mut state = arena(PerPlayer::new(NationId::Germany, NationId::Japan));
    let cruiser = spawn(&mut state, UnitType::Cruiser, Player::Player2, 1, 5);
    state
        .units
        .iter_mut()
        .for_each(|u| u.exhaust());

    let result = start_new_turn(&state, 42);
    assert_eq!(result.state.current_player, Player::Player2);
    assert_eq!(result.state.money[Player::Player2], 210);
    let ship = unit(&result.state, cruiser);
    assert!(!ship.has_moved && !ship.has_attacked);
    assert_eq!(ship.remaining_mov, 4 + 1);
    assert_eq!(
        result.events,
        vec![GameEvent::TurnStarted {
            player: Player::Player2,
            turn: 1,
            income: 10
        }]
    );
}

#[test]
fn test_blitzkrieg_move_then_strike_for_one_turn() {
    let mut state = arena(PerPlayer::new(NationId::Germany, NationId::Usa));
    let tank = spawn(&mut state, UnitType::Tank, Player::Player1, 2, 0);
    let target = spawn(&mut state, UnitType::Tank, Player::Player2, 2, 5);
    state.board.set_terrain(Position::new(2, 5), steel_tide::game::TerrainType::Land);
    recompute(&mut state);

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let state = perform_nation_skill(&state, Player::Player1, &mut rng).state;
    assert!(state.has_buff(Player::Player1, Buff::Blitzkrieg));

    let state = perform_move(&state, tank, Position::new(2, 3)).state;
    assert!(!unit(&state, tank).has_attacked);

    let result = perform_attack(&state, tank, Position::new(2, 5), 0);
    // 4 base + 1 German armour + 2 blitz
    assert_eq!(unit(&result.state, target).hp, 10 - 7);

    let next = start_new_turn(&result.state, 0).state;
    assert!(!next.has_buff(Player::Player1, Buff::Blitzkrieg));
    let again = perform_nation_skill(&next, Player::Player1, &mut rng);
    assert!(again.is_noop());
}

#[test]
fn test_base_assault_ends_the_game() {
    let mut state = neutral_arena();
    let tank = spawn(&mut state, UnitType::Tank, Player::Player2, 1, 0);
    state.current_player = Player::Player2;
    state.base_hp[Player::Player1] = 3;

    let result = perform_attack(&state, tank, Position::new(0, 0), 0);
    assert_eq!(result.state.base_hp[Player::Player1], -1);
    assert_eq!(result.state.winner(), Some(Player::Player2));
    assert!(result
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GameOver { winner: Player::Player2 })));
}

#[test]
fn test_snapshot_carries_embarked_units() {
    let mut state = neutral_arena();
    let carrier = spawn(&mut state, UnitType::Carrier, Player::Player1, 5, 4);
    let state = deploy_unit(&state, Player::Player1, UnitType::Bomber, Position::new(5, 4)).state;

    let json = GameSnapshot::from_state(&state, false).to_json().unwrap();
    let restored = GameSnapshot::from_json(&json)
        .unwrap()
        .into_state_with(Some(state.board.clone()))
        .unwrap();

    assert_eq!(restored, state);
    assert_eq!(unit(&restored, carrier).cargo[0].unit_type, UnitType::Bomber);
}
