//! AI purchase phase

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::core::types::{Player, Position};
use crate::game::ai::profile::AiProfile;
use crate::game::ai::roll;
use crate::game::deployment::deploy_unit;
use crate::game::events::Transition;
use crate::game::state::GameState;
use crate::game::unit_type::{UnitCategory, UnitType};
use crate::game::units::Unit;

/// Enemy composition by category, with tanks counted apart
#[derive(Debug, Default)]
struct Composition {
    by_category: AHashMap<UnitCategory, usize>,
    tanks: usize,
}

impl Composition {
    fn of<'a>(enemies: impl IntoIterator<Item = &'a Unit>) -> Self {
        let mut composition = Self::default();
        for unit in enemies {
            *composition.by_category.entry(unit.category).or_insert(0) += 1;
            if unit.unit_type == UnitType::Tank {
                composition.tanks += 1;
            }
        }
        composition
    }

    fn count(&self, category: UnitCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

/// Pick a counter to the enemy's line-up, or `None` if they field nothing.
///
/// Each threat adds its answers to a pool and one entry is drawn uniformly,
/// so a threat that adds more entries is answered more often.
pub fn counter_pick<'a>(
    enemies: impl IntoIterator<Item = &'a Unit>,
    rng: &mut impl Rng,
) -> Option<UnitType> {
    let composition = Composition::of(enemies);
    let mut pool = Vec::new();

    let air = composition.count(UnitCategory::Air);
    if air > 0 {
        pool.extend([UnitType::AntiAir, UnitType::Fighter]);
        if air > 2 {
            pool.extend([UnitType::AntiAir, UnitType::Fighter]);
        }
    }
    if composition.tanks > 0 {
        pool.extend([UnitType::AntiTank, UnitType::Bomber]);
        if composition.tanks > 2 {
            pool.push(UnitType::AntiTank);
        }
    }
    if composition.count(UnitCategory::Sea) > 0 {
        pool.extend([UnitType::Submarine, UnitType::Cruiser, UnitType::Bomber]);
    }
    if composition.count(UnitCategory::Land) > 0 {
        pool.extend([UnitType::Tank, UnitType::Assault, UnitType::Mortar]);
    }

    pool.choose(rng).copied()
}

/// Types to try buying this turn, best first
pub fn purchase_priority(
    profile: &AiProfile,
    state: &GameState,
    player: Player,
    rng: &mut impl Rng,
) -> Vec<UnitType> {
    let mut priority = Vec::with_capacity(profile.deployment.priority.len() + 1);
    if profile.deployment.counter_pick {
        if let Some(counter) = counter_pick(state.living_units(player.opponent()), rng) {
            priority.push(counter);
        }
    }
    priority.extend(profile.deployment.priority.iter().copied());
    priority
}

/// Empty owned tiles whose terrain takes a unit of `category`
fn deployment_spots(state: &GameState, player: Player, category: UnitCategory) -> Vec<Position> {
    state
        .board
        .iter()
        .filter(|(pos, tile)| {
            tile.is_owned_by(player)
                && tile.terrain.accepts_deployment_of(category)
                && state.unit_at(*pos).is_none()
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// Spend `player`'s money on units placed at random inside their territory.
///
/// Each round buys the first affordable type in priority order that still
/// has a free spot. Stops when funds drop below the profile's floor, the
/// attempt budget runs out, or a round buys nothing.
pub fn deployment_phase(
    profile: &AiProfile,
    state: &GameState,
    player: Player,
    rng: &mut impl Rng,
) -> Transition {
    let settings = &profile.deployment;
    if roll(rng, settings.skip_chance) {
        debug!(%player, "AI skips deployment this turn");
        return Transition::unchanged(state);
    }

    let priority = purchase_priority(profile, state, player, rng);
    let mut result = Transition::unchanged(state);

    for _ in 0..settings.purchase_attempts {
        if result.state.money[player] < settings.min_funds {
            break;
        }

        let mut deployed = false;
        for &unit_type in &priority {
            let cost = result.state.traits(player).unit_cost(unit_type);
            if result.state.money[player] < cost {
                continue;
            }
            let spots = deployment_spots(&result.state, player, unit_type.category());
            let Some(&spot) = spots.choose(rng) else {
                continue;
            };

            let step = deploy_unit(&result.state, player, unit_type, spot);
            if step.is_noop() {
                continue;
            }
            debug!(%player, ?unit_type, %spot, cost, "AI deployed unit");
            result = result.then(|_| step);
            deployed = true;
            break;
        }

        if !deployed {
            break;
        }
    }

    result
}
