//! Terrain kinds and map tiles

use serde::{Deserialize, Serialize};

use crate::core::types::Player;
use crate::game::unit_type::UnitCategory;

/// Primary terrain type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TerrainType {
    #[default]
    Land,
    Sea,
    Helipad, // Air deployment point
    Base,    // Headquarters; also a harbour for ships
}

impl TerrainType {
    /// Can a unit of this category stand here after a normal step?
    ///
    /// LAND units may still step onto SEA, but they stop there stranded;
    /// that case is handled by the pathfinder, not here.
    pub fn is_passable_for(&self, category: UnitCategory) -> bool {
        match category {
            UnitCategory::Air => true,
            UnitCategory::Land => !matches!(self, TerrainType::Sea),
            UnitCategory::Sea => matches!(self, TerrainType::Sea | TerrainType::Base),
        }
    }

    /// Terrain a freshly purchased unit of this category may be placed on
    pub fn accepts_deployment_of(&self, category: UnitCategory) -> bool {
        match category {
            UnitCategory::Air => matches!(self, TerrainType::Helipad),
            UnitCategory::Sea => matches!(self, TerrainType::Sea),
            UnitCategory::Land => !matches!(self, TerrainType::Sea),
        }
    }
}

/// A single tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainType,
    /// Territory owner: grants passive vision and deployment rights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Player>,
}

impl Tile {
    pub fn new(terrain: TerrainType, owner: Option<Player>) -> Self {
        Self { terrain, owner }
    }

    pub fn is_owned_by(&self, player: Player) -> bool {
        self.owner == Some(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ships_dock_at_base() {
        assert!(TerrainType::Base.is_passable_for(UnitCategory::Sea));
        assert!(!TerrainType::Land.is_passable_for(UnitCategory::Sea));
        assert!(!TerrainType::Helipad.is_passable_for(UnitCategory::Sea));
    }

    #[test]
    fn test_aircraft_need_helipad() {
        assert!(TerrainType::Helipad.accepts_deployment_of(UnitCategory::Air));
        assert!(!TerrainType::Land.accepts_deployment_of(UnitCategory::Air));
        assert!(!TerrainType::Base.accepts_deployment_of(UnitCategory::Air));
    }

    #[test]
    fn test_land_units_avoid_sea() {
        assert!(!TerrainType::Sea.accepts_deployment_of(UnitCategory::Land));
        assert!(TerrainType::Helipad.accepts_deployment_of(UnitCategory::Land));
        assert!(TerrainType::Base.accepts_deployment_of(UnitCategory::Land));
    }
}
