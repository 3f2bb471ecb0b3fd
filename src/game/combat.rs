//! Combat resolution
//!
//! `can_attack` runs the legality checks in a fixed order and names the
//! target. `perform_attack` applies the hit and every side effect of it:
//! anti-air counter-fire on aircraft, bomber splash, kamikaze self-destruct.

use thiserror::Error;
use tracing::{debug, info};

use crate::core::types::{Player, Position, Timestamp, UnitId};
use crate::game::constants::{ANTI_TANK_MULTIPLIER, BLITZKRIEG_ATTACK_BONUS};
use crate::game::events::{Effect, EffectKind, GameEvent, Transition};
use crate::game::state::{Buff, GameState};
use crate::game::terrain::TerrainType;
use crate::game::unit_type::{UnitCategory, UnitType};
use crate::game::units::{Unit, UnitLocation};
use crate::game::visibility::{is_unit_visible_to, recompute};

/// Why an attack was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttackDenied {
    #[error("unit not found")]
    UnitNotFound,
    #[error("unit is destroyed")]
    Destroyed,
    #[error("cannot attack from inside a carrier")]
    Embarked,
    #[error("already attacked this turn")]
    AlreadyAttacked,
    #[error("land units cannot attack from the sea")]
    StrandedAtSea,
    #[error("target is out of range")]
    OutOfRange,
    #[error("cannot attack a friendly unit")]
    FriendlyFire,
    #[error("target tile is not visible")]
    NotVisible,
    #[error("target is stealthed")]
    Stealthed,
    #[error("only aircraft and anti-air can hit aircraft")]
    CannotTargetAir,
    #[error("escorted anti-air cannot be attacked from the air")]
    EscortedAntiAir,
    #[error("nothing to attack there")]
    InvalidTarget,
}

/// What an accepted attack will hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackTarget {
    Unit(UnitId),
    /// The headquarters of this player
    Base(Player),
}

/// Check whether `attacker` may fire on `target` now
pub fn can_attack(
    attacker: &Unit,
    target: Position,
    state: &GameState,
) -> Result<AttackTarget, AttackDenied> {
    if !attacker.is_alive() {
        return Err(AttackDenied::Destroyed);
    }
    if state.locate(attacker.id).is_some_and(|loc| loc.is_embarked()) {
        return Err(AttackDenied::Embarked);
    }
    if attacker.has_attacked {
        return Err(AttackDenied::AlreadyAttacked);
    }
    if attacker.category == UnitCategory::Land
        && state.board.terrain(attacker.position) == Some(TerrainType::Sea)
    {
        return Err(AttackDenied::StrandedAtSea);
    }

    let stats = attacker.stats();
    let distance = attacker.position.distance(&target);
    if distance < stats.range_min || distance > stats.range_max {
        return Err(AttackDenied::OutOfRange);
    }

    if let Some(defender) = state.unit_at(target) {
        if defender.player == attacker.player {
            return Err(AttackDenied::FriendlyFire);
        }
        if !state.visibility.is_visible(attacker.player, target) {
            return Err(AttackDenied::NotVisible);
        }
        if !is_unit_visible_to(defender, attacker.player, state) {
            return Err(AttackDenied::Stealthed);
        }
        if defender.category == UnitCategory::Air && !attacker.unit_type.can_target_air() {
            return Err(AttackDenied::CannotTargetAir);
        }
        if defender.unit_type == UnitType::AntiAir
            && attacker.category == UnitCategory::Air
            && is_escorted(defender, state)
        {
            return Err(AttackDenied::EscortedAntiAir);
        }
        return Ok(AttackTarget::Unit(defender.id));
    }

    match state.board.tile(target) {
        Some(tile) if tile.terrain == TerrainType::Base => match tile.owner {
            Some(owner) if owner != attacker.player => Ok(AttackTarget::Base(owner)),
            _ => Err(AttackDenied::InvalidTarget),
        },
        _ => Err(AttackDenied::InvalidTarget),
    }
}

/// Does a living friendly unit stand next to this one (diagonals count)?
fn is_escorted(unit: &Unit, state: &GameState) -> bool {
    state
        .living_units(unit.player)
        .any(|u| u.id != unit.id && u.position.chebyshev(&unit.position) <= 1)
}

/// Damage `attacker` deals to `defender`.
///
/// Anti-tank doubling first, then the nation's flat tank bonus, then the
/// blitz buff; all bonuses are added to the doubled value.
pub fn calculate_damage(attacker: &Unit, defender: &Unit, state: &GameState) -> i32 {
    let mut damage = attacker.stats().atk;

    if attacker.unit_type == UnitType::AntiTank && defender.unit_type == UnitType::Tank {
        damage *= ANTI_TANK_MULTIPLIER;
    }

    damage += state.traits(attacker.player).attack_bonus(attacker.unit_type);

    if state.has_buff(attacker.player, Buff::Blitzkrieg) {
        damage += BLITZKRIEG_ATTACK_BONUS;
    }

    damage
}

/// Resolve an attack from `attacker_id` on the tile `target`.
///
/// Rejected attacks return the input unchanged with no events. `now` stamps
/// the effect records.
pub fn perform_attack(
    state: &GameState,
    attacker_id: UnitId,
    target: Position,
    now: Timestamp,
) -> Transition {
    let Some((attacker, location)) = state.find_unit(attacker_id) else {
        debug!(%attacker_id, "attack rejected: {}", AttackDenied::UnitNotFound);
        return Transition::unchanged(state);
    };

    let aim = match can_attack(attacker, target, state) {
        Ok(aim) => aim,
        Err(reason) => {
            debug!(%attacker_id, %target, "attack rejected: {reason}");
            return Transition::unchanged(state);
        }
    };

    let UnitLocation::OnMap { index: attacker_index } = location else {
        return Transition::unchanged(state);
    };

    let mut next = state.clone();
    let mut events = Vec::new();

    // Firing always reveals the shooter
    next.units[attacker_index].has_attacked = true;
    next.units[attacker_index].is_hidden = false;
    let shooter = next.units[attacker_index].clone();

    let (effect, defending_player) = match aim {
        AttackTarget::Unit(defender_id) => {
            let Some(defender_index) = next.units.iter().position(|u| u.id == defender_id) else {
                return Transition::unchanged(state);
            };

            let damage = calculate_damage(&shooter, &next.units[defender_index], &next);
            let effect = Effect {
                kind: EffectKind::Attack,
                position: target,
                damage,
                timestamp: now,
            };
            let defender = &mut next.units[defender_index];
            defender.take_damage(damage);
            events.push(GameEvent::UnitAttacked {
                attacker: attacker_id,
                defender: defender_id,
                damage,
                effect,
            });
            if !defender.is_alive() {
                events.push(GameEvent::UnitDestroyed {
                    unit: defender_id,
                    at: target,
                });
            }
            (effect, defender.player)
        }
        AttackTarget::Base(owner) => {
            // Bases take the raw attack value
            let damage = shooter.stats().atk;
            let effect = Effect {
                kind: EffectKind::Explosion,
                position: target,
                damage,
                timestamp: now,
            };
            let was_standing = next.base_hp[owner] > 0;
            next.base_hp[owner] -= damage;
            events.push(GameEvent::BaseAttacked {
                attacker: attacker_id,
                owner,
                damage,
                remaining_hp: next.base_hp[owner],
                effect,
            });
            if was_standing && next.base_hp[owner] <= 0 {
                info!(winner = %shooter.player, "headquarters of {owner} destroyed");
                events.push(GameEvent::GameOver {
                    winner: shooter.player,
                });
            }
            (effect, owner)
        }
    };

    if shooter.category == UnitCategory::Air {
        apply_counter_fire(&mut next, attacker_index, defending_player, target, now, &mut events);
    }

    if shooter.unit_type == UnitType::Bomber {
        if let AttackTarget::Unit(_) = aim {
            apply_splash(&mut next, &shooter, target, effect.damage / 2, now, &mut events);
        }
    }

    let pilot = &mut next.units[attacker_index];
    if pilot.is_kamikaze && pilot.is_alive() {
        pilot.hp = 0;
        events.push(GameEvent::UnitDestroyed {
            unit: attacker_id,
            at: pilot.position,
        });
    }

    next.latest_effect = Some(effect);
    recompute(&mut next);
    Transition::new(next, events)
}

/// Every living anti-air gun of `defending_player` within one tile of the
/// target fires back at the attacking aircraft.
fn apply_counter_fire(
    state: &mut GameState,
    attacker_index: usize,
    defending_player: Player,
    target: Position,
    now: Timestamp,
    events: &mut Vec<GameEvent>,
) {
    let flak = UnitType::AntiAir.stats().atk;
    let gunners: Vec<UnitId> = state
        .living_units(defending_player)
        .filter(|u| u.unit_type == UnitType::AntiAir && u.position.chebyshev(&target) <= 1)
        .map(|u| u.id)
        .collect();

    let aircraft = &mut state.units[attacker_index];
    let was_alive = aircraft.is_alive();
    for gunner in gunners {
        aircraft.take_damage(flak);
        events.push(GameEvent::CounterFire {
            anti_air: gunner,
            target: aircraft.id,
            damage: flak,
            effect: Effect {
                kind: EffectKind::Attack,
                position: aircraft.position,
                damage: flak,
                timestamp: now,
            },
        });
    }
    if was_alive && !aircraft.is_alive() {
        events.push(GameEvent::UnitDestroyed {
            unit: aircraft.id,
            at: aircraft.position,
        });
    }
}

/// Half damage (floored) to every enemy of the bomber around the target
fn apply_splash(
    state: &mut GameState,
    bomber: &Unit,
    target: Position,
    splash: i32,
    now: Timestamp,
    events: &mut Vec<GameEvent>,
) {
    for pos in target.surrounding() {
        let Some(index) = state.unit_index_at(pos) else {
            continue;
        };
        let victim = &mut state.units[index];
        if victim.player == bomber.player {
            continue;
        }
        victim.take_damage(splash);
        events.push(GameEvent::SplashHit {
            attacker: bomber.id,
            defender: victim.id,
            damage: splash,
            effect: Effect {
                kind: EffectKind::Explosion,
                position: pos,
                damage: splash,
                timestamp: now,
            },
        });
        if !victim.is_alive() {
            events.push(GameEvent::UnitDestroyed {
                unit: victim.id,
                at: pos,
            });
        }
    }
}
