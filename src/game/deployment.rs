//! Buying and placing units
//!
//! Validation order: funds, bounds, occupancy, territory, terrain.
//! Paratroopers skip occupancy and territory. Placing an aircraft onto a
//! friendly carrier waives territory and terrain and puts the new unit
//! straight into the carrier's cargo.

use thiserror::Error;
use tracing::debug;

use crate::core::types::{Player, Position};
use crate::game::events::{GameEvent, Transition};
use crate::game::state::GameState;
use crate::game::unit_type::{UnitCategory, UnitType};
use crate::game::units::Unit;
use crate::game::visibility::recompute;

/// Why a deployment was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeployDenied {
    #[error("not enough funds: need {cost}, have {available}")]
    InsufficientFunds { cost: u32, available: u32 },
    #[error("target is outside the board")]
    OutOfBounds,
    #[error("target tile is occupied")]
    Occupied,
    #[error("carrier has no free slot")]
    CarrierFull,
    #[error("can only deploy inside own territory")]
    NotOwnTerritory,
    #[error("terrain does not accept this unit")]
    WrongTerrain,
}

/// Where an accepted deployment puts the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    OnMap,
    /// Into the cargo of the top-level unit at this index
    OnCarrier { carrier_index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployPlan {
    pub cost: u32,
    pub placement: Placement,
}

/// Check whether `player` may buy a `unit_type` and place it on `pos`
pub fn can_deploy(
    state: &GameState,
    player: Player,
    unit_type: UnitType,
    pos: Position,
) -> Result<DeployPlan, DeployDenied> {
    let cost = state.traits(player).unit_cost(unit_type);
    let available = state.money[player];
    if available < cost {
        return Err(DeployDenied::InsufficientFunds { cost, available });
    }

    let Some(tile) = state.board.tile(pos) else {
        return Err(DeployDenied::OutOfBounds);
    };

    let category = unit_type.category();
    let mut placement = Placement::OnMap;

    // Paratroopers drop onto occupied tiles too
    let occupant = match unit_type {
        UnitType::Paratrooper => None,
        _ => state.unit_index_at(pos),
    };
    if let Some(index) = occupant {
        let occupant = &state.units[index];
        let friendly_carrier = occupant.player == player
            && occupant.unit_type == UnitType::Carrier
            && category == UnitCategory::Air;
        if !friendly_carrier {
            return Err(DeployDenied::Occupied);
        }
        if occupant.free_cargo_slots(category) == 0 {
            return Err(DeployDenied::CarrierFull);
        }
        placement = Placement::OnCarrier {
            carrier_index: index,
        };
    }

    if placement == Placement::OnMap {
        // Paratroopers drop anywhere
        if unit_type != UnitType::Paratrooper && !tile.is_owned_by(player) {
            return Err(DeployDenied::NotOwnTerritory);
        }
        if !tile.terrain.accepts_deployment_of(category) {
            return Err(DeployDenied::WrongTerrain);
        }
    }

    Ok(DeployPlan { cost, placement })
}

/// Buy and place a unit. Rejections return the input unchanged.
pub fn deploy_unit(
    state: &GameState,
    player: Player,
    unit_type: UnitType,
    pos: Position,
) -> Transition {
    let plan = match can_deploy(state, player, unit_type, pos) {
        Ok(plan) => plan,
        Err(reason) => {
            debug!(%player, ?unit_type, %pos, "deployment rejected: {reason}");
            return Transition::unchanged(state);
        }
    };

    let mut next = state.clone();
    let id = next.allocate_id();
    let mut unit = Unit::new(id, unit_type, player, pos);
    unit.facing = Some(match player {
        Player::Player1 => 0.0,
        Player::Player2 => std::f32::consts::PI,
    });
    // Only paratroopers may act on the turn they arrive
    if unit_type != UnitType::Paratrooper {
        unit.exhaust();
    }

    next.money[player] -= plan.cost;

    let carrier = match plan.placement {
        Placement::OnMap => {
            next.units.push(unit);
            None
        }
        Placement::OnCarrier { carrier_index } => {
            let host = &mut next.units[carrier_index];
            host.cargo.push(unit);
            Some(host.id)
        }
    };

    recompute(&mut next);
    Transition::new(
        next,
        vec![GameEvent::UnitDeployed {
            unit: id,
            unit_type,
            player,
            at: pos,
            cost: plan.cost,
            carrier,
        }],
    )
}
