//! Nation skills: one activation per player per game

use rand::Rng;
use tracing::{info, warn};

use crate::core::types::{Player, Position};
use crate::game::constants::{
    CONSCRIPT_COUNT, CONSCRIPT_PLACEMENT_ATTEMPTS, KAMIKAZE_COUNT, KAMIKAZE_HP, SKILL_MAX_HP_BONUS,
};
use crate::game::events::{GameEvent, Transition};
use crate::game::nation::NationSkill;
use crate::game::state::{Buff, GameState};
use crate::game::terrain::TerrainType;
use crate::game::unit_type::{UnitCategory, UnitType};
use crate::game::units::Unit;
use crate::game::visibility::recompute;

/// Can `player` still use their skill?
pub fn skill_available(state: &GameState, player: Player) -> bool {
    !state.skill_used[player]
}

/// Fire `player`'s nation skill.
///
/// A second activation is a no-op. `rng` drives conscript placement.
pub fn perform_nation_skill(state: &GameState, player: Player, rng: &mut impl Rng) -> Transition {
    if !skill_available(state, player) {
        return Transition::unchanged(state);
    }

    let skill = state.nations[player].skill();
    let mut next = state.clone();
    next.skill_used[player] = true;
    let mut events = vec![GameEvent::SkillActivated { player, skill }];

    match skill {
        NationSkill::Blitzkrieg => {
            if !next.buffs[player].contains(&Buff::Blitzkrieg) {
                next.buffs[player].push(Buff::Blitzkrieg);
            }
        }
        NationSkill::GreatPatrioticWar => {
            spawn_conscripts(&mut next, player, rng, &mut events);
            reinforce(&mut next, player, |u| u.unit_type == UnitType::Infantry, &mut events);
        }
        NationSkill::WarBonds => {
            let amount = next.map_id.starting_money() / 2;
            next.money[player] += amount;
            events.push(GameEvent::FundsGranted { player, amount });
        }
        NationSkill::DivineWind => {
            spawn_kamikazes(&mut next, player, &mut events);
        }
        NationSkill::FinestHour => {
            reinforce(
                &mut next,
                player,
                |u| matches!(u.category, UnitCategory::Air | UnitCategory::Sea),
                &mut events,
            );
        }
    }

    info!(%player, ?skill, "nation skill activated");
    recompute(&mut next);
    Transition::new(next, events)
}

/// Fresh infantry on random empty owned land tiles
fn spawn_conscripts(
    state: &mut GameState,
    player: Player,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let (width, height) = (state.board.width() as i32, state.board.height() as i32);
    if width == 0 || height == 0 {
        return;
    }

    let mut spawned = 0;
    for _ in 0..CONSCRIPT_PLACEMENT_ATTEMPTS {
        if spawned >= CONSCRIPT_COUNT {
            break;
        }
        let pos = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let suitable = state
            .board
            .tile(pos)
            .is_some_and(|t| t.is_owned_by(player) && t.terrain == TerrainType::Land);
        if !suitable || state.unit_at(pos).is_some() {
            continue;
        }

        let id = state.allocate_id();
        state
            .units
            .push(Unit::new(id, UnitType::Infantry, player, pos));
        events.push(GameEvent::UnitSpawned {
            unit: id,
            unit_type: UnitType::Infantry,
            at: pos,
        });
        spawned += 1;
    }
}

/// One-hit fighters on the empty tiles closest to the player's base
fn spawn_kamikazes(state: &mut GameState, player: Player, events: &mut Vec<GameEvent>) {
    let base = state.board.base_of(player).unwrap_or_else(|| {
        warn!(%player, "no headquarters tile; using the home corner");
        match player {
            Player::Player1 => Position::new(0, 0),
            Player::Player2 => Position::new(
                state.board.width() as i32 - 1,
                state.board.height() as i32 - 1,
            ),
        }
    });

    // Stable sort keeps row-major order among equal distances
    let mut spots: Vec<Position> = state
        .board
        .positions()
        .filter(|&pos| state.unit_at(pos).is_none())
        .collect();
    spots.sort_by_key(|pos| pos.distance(&base));

    for pos in spots.into_iter().take(KAMIKAZE_COUNT) {
        let id = state.allocate_id();
        let mut pilot = Unit::new(id, UnitType::Fighter, player, pos);
        pilot.hp = KAMIKAZE_HP;
        pilot.max_hp = KAMIKAZE_HP;
        pilot.is_kamikaze = true;
        state.units.push(pilot);
        events.push(GameEvent::UnitSpawned {
            unit: id,
            unit_type: UnitType::Fighter,
            at: pos,
        });
    }
}

/// +1 max HP and full heal for every matching unit of `player`, cargo included
fn reinforce(
    state: &mut GameState,
    player: Player,
    matches: impl Fn(&Unit) -> bool,
    events: &mut Vec<GameEvent>,
) {
    let mut count = 0;
    for unit in &mut state.units {
        unit.for_each_mut(&mut |u| {
            if u.player == player && u.is_alive() && matches(u) {
                u.reinforce(SKILL_MAX_HP_BONUS);
                count += 1;
            }
        });
    }
    events.push(GameEvent::UnitsReinforced { player, count });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PerPlayer, UnitId};
    use crate::game::board::MapId;
    use crate::game::nation::NationId;
    use crate::game::setup::create_initial_state;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_for(nation: NationId) -> GameState {
        let mut state = create_initial_state(MapId::Default, 0);
        state.nations = PerPlayer::new(nation, NationId::Germany);
        state
    }

    #[test]
    fn test_skill_is_one_shot() {
        let state = state_for(NationId::Usa);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let first = perform_nation_skill(&state, Player::Player1, &mut rng);
        assert_eq!(first.state.money[Player::Player1], 300);

        let second = perform_nation_skill(&first.state, Player::Player1, &mut rng);
        assert!(second.is_noop());
        assert_eq!(second.state.money[Player::Player1], 300);
    }

    #[test]
    fn test_blitzkrieg_buff() {
        let state = state_for(NationId::Germany);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = perform_nation_skill(&state, Player::Player1, &mut rng);
        assert!(result.state.has_buff(Player::Player1, Buff::Blitzkrieg));
    }

    #[test]
    fn test_conscripts_on_owned_land() {
        let mut state = state_for(NationId::Ussr);
        state.units.push(Unit::new(UnitId(900), UnitType::Infantry, Player::Player1, Position::new(1, 1)));
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result = perform_nation_skill(&state, Player::Player1, &mut rng);

        let infantry: Vec<&Unit> = result.state.living_units(Player::Player1).collect();
        assert!(infantry.len() > 1 && infantry.len() <= 1 + CONSCRIPT_COUNT);
        for unit in &infantry {
            let tile = result.state.board.tile(unit.position).unwrap();
            assert!(tile.is_owned_by(Player::Player1));
            assert_eq!(tile.terrain, TerrainType::Land);
            assert_eq!(unit.max_hp, 3);
            assert_eq!(unit.hp, 3);
        }
        // No two conscripts share a tile
        let mut tiles: Vec<Position> = infantry.iter().map(|u| u.position).collect();
        tiles.sort_by_key(|p| (p.y, p.x));
        tiles.dedup();
        assert_eq!(tiles.len(), infantry.len());
    }

    #[test]
    fn test_kamikazes_next_to_base() {
        let state = state_for(NationId::Japan);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = perform_nation_skill(&state, Player::Player1, &mut rng);

        let pilots: Vec<&Unit> = result.state.units.iter().filter(|u| u.is_kamikaze).collect();
        assert_eq!(pilots.len(), KAMIKAZE_COUNT);
        let spots: Vec<Position> = pilots.iter().map(|u| u.position).collect();
        assert_eq!(
            spots,
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(0, 1)]
        );
        assert!(pilots.iter().all(|u| u.hp == 1 && !u.has_moved));
    }

    #[test]
    fn test_finest_hour_boosts_air_and_sea_only() {
        let mut state = state_for(NationId::Uk);
        state.units.push(Unit::new(UnitId(1), UnitType::Cruiser, Player::Player1, Position::new(2, 1)));
        state.units.push(Unit::new(UnitId(2), UnitType::Tank, Player::Player1, Position::new(1, 1)));
        state.units.push(Unit::new(UnitId(3), UnitType::Cruiser, Player::Player2, Position::new(2, 2)));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = perform_nation_skill(&state, Player::Player1, &mut rng);

        assert_eq!(result.state.units[0].max_hp, 11);
        assert_eq!(result.state.units[1].max_hp, 10);
        assert_eq!(result.state.units[2].max_hp, 10);
    }
}
