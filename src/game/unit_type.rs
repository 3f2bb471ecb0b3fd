//! Unit types and their stat table

use serde::{Deserialize, Serialize};

/// Movement domain of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitCategory {
    Land,
    Sea,
    Air,
}

/// Type of military unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    // Land
    Infantry,
    SpecialForces,
    Mortar,      // Indirect fire, cannot hit adjacent tiles
    Assault,     // May attack after moving
    Paratrooper, // Drops anywhere, acts on deployment turn
    Sniper,      // Stealthed until it fires
    AntiTank,    // Double damage against tanks
    AntiAir,     // Escort-protected, counter-fires at aircraft
    Tank,

    // Air
    Fighter,
    Bomber, // Splash damage

    // Sea
    Cruiser,
    Carrier,   // Carries aircraft
    Submarine, // Stealthed until it fires
    Transport, // Carries land units
}

/// Static stats for a unit type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    pub name: &'static str,
    pub category: UnitCategory,
    pub cost: u32,
    pub atk: i32,
    pub hp: i32,
    pub mov: u32,
    pub range_min: u32,
    pub range_max: u32,
    pub vision: u32,
    pub cargo_capacity: usize,
    pub description: &'static str,
}

impl UnitType {
    pub const ALL: [UnitType; 15] = [
        UnitType::Infantry,
        UnitType::SpecialForces,
        UnitType::Mortar,
        UnitType::Assault,
        UnitType::Paratrooper,
        UnitType::Sniper,
        UnitType::AntiTank,
        UnitType::AntiAir,
        UnitType::Tank,
        UnitType::Fighter,
        UnitType::Bomber,
        UnitType::Cruiser,
        UnitType::Carrier,
        UnitType::Submarine,
        UnitType::Transport,
    ];

    /// Stat table entry for this type
    pub fn stats(&self) -> UnitStats {
        use UnitCategory::{Air, Land, Sea};

        let (name, category, cost, atk, hp, mov, range_min, range_max, cargo, description) =
            match self {
                UnitType::Infantry => ("Infantry", Land, 10, 1, 2, 1, 1, 1, 0, "Basic land unit."),
                UnitType::SpecialForces => (
                    "Special Forces",
                    Land,
                    20,
                    2,
                    3,
                    2,
                    1,
                    1,
                    0,
                    "Elite infantry with better movement and attack.",
                ),
                UnitType::Mortar => (
                    "Mortar",
                    Land,
                    40,
                    3,
                    2,
                    2,
                    3,
                    5,
                    0,
                    "Long-range indirect fire.",
                ),
                UnitType::Assault => (
                    "Assault Troops",
                    Land,
                    40,
                    3,
                    2,
                    4,
                    1,
                    1,
                    0,
                    "Can attack after moving.",
                ),
                UnitType::Paratrooper => (
                    "Paratrooper",
                    Land,
                    40,
                    2,
                    3,
                    2,
                    1,
                    1,
                    0,
                    "Deploys anywhere and acts the same turn.",
                ),
                UnitType::Sniper => (
                    "Sniper",
                    Land,
                    60,
                    5,
                    1,
                    1,
                    1,
                    5,
                    0,
                    "Hidden until it attacks.",
                ),
                UnitType::AntiTank => (
                    "Anti-Tank Gun",
                    Land,
                    60,
                    3,
                    2,
                    2,
                    1,
                    2,
                    0,
                    "Deals double damage to tanks.",
                ),
                UnitType::AntiAir => (
                    "Anti-Air Gun",
                    Land,
                    60,
                    3,
                    2,
                    2,
                    1,
                    2,
                    0,
                    "Untargetable by aircraft while escorted; fires on attacking aircraft nearby.",
                ),
                UnitType::Tank => (
                    "Tank",
                    Land,
                    80,
                    4,
                    10,
                    3,
                    1,
                    2,
                    0,
                    "High health, high attack.",
                ),
                UnitType::Fighter => (
                    "Fighter",
                    Air,
                    80,
                    3,
                    5,
                    4,
                    1,
                    2,
                    0,
                    "Air superiority unit.",
                ),
                UnitType::Bomber => (
                    "Bomber",
                    Air,
                    80,
                    2,
                    5,
                    2,
                    1,
                    2,
                    0,
                    "Deals half damage to every enemy around the target.",
                ),
                UnitType::Cruiser => (
                    "Cruiser",
                    Sea,
                    80,
                    3,
                    10,
                    4,
                    1,
                    3,
                    0,
                    "General-purpose surface combatant.",
                ),
                UnitType::Carrier => (
                    "Aircraft Carrier",
                    Sea,
                    90,
                    1,
                    8,
                    3,
                    1,
                    2,
                    2,
                    "Carries up to 2 aircraft.",
                ),
                UnitType::Submarine => (
                    "Submarine",
                    Sea,
                    80,
                    4,
                    5,
                    4,
                    1,
                    1,
                    0,
                    "Hidden until it attacks.",
                ),
                UnitType::Transport => (
                    "Transport",
                    Sea,
                    50,
                    1,
                    6,
                    4,
                    1,
                    1,
                    4,
                    "Carries up to 4 land units.",
                ),
            };

        UnitStats {
            name,
            category,
            cost,
            atk,
            hp,
            mov,
            range_min,
            range_max,
            vision: 2,
            cargo_capacity: cargo,
            description,
        }
    }

    pub fn category(&self) -> UnitCategory {
        self.stats().category
    }

    /// Does this type deploy stealthed?
    pub fn starts_hidden(&self) -> bool {
        matches!(self, UnitType::Sniper | UnitType::Submarine)
    }

    /// May this type attack after moving without any buff?
    pub fn attacks_after_moving(&self) -> bool {
        matches!(self, UnitType::Assault) || self.category() == UnitCategory::Air
    }

    /// Which category this type can carry, if it is a carrier at all
    pub fn carries(&self) -> Option<UnitCategory> {
        match self {
            UnitType::Carrier => Some(UnitCategory::Air),
            UnitType::Transport => Some(UnitCategory::Land),
            _ => None,
        }
    }

    /// Can this type shoot at aircraft?
    pub fn can_target_air(&self) -> bool {
        matches!(self, UnitType::AntiAir) || self.category() == UnitCategory::Air
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(UnitType::Tank.category(), UnitCategory::Land);
        assert_eq!(UnitType::Bomber.category(), UnitCategory::Air);
        assert_eq!(UnitType::Submarine.category(), UnitCategory::Sea);
    }

    #[test]
    fn test_only_carriers_have_cargo() {
        for unit_type in UnitType::ALL {
            let stats = unit_type.stats();
            assert_eq!(stats.cargo_capacity > 0, unit_type.carries().is_some());
        }
        assert_eq!(UnitType::Carrier.stats().cargo_capacity, 2);
        assert_eq!(UnitType::Transport.stats().cargo_capacity, 4);
    }

    #[test]
    fn test_ranges_are_ordered() {
        for unit_type in UnitType::ALL {
            let stats = unit_type.stats();
            assert!(stats.range_min >= 1);
            assert!(stats.range_min <= stats.range_max, "{:?}", unit_type);
        }
    }

    #[test]
    fn test_infantry_baseline() {
        let stats = UnitType::Infantry.stats();
        assert_eq!((stats.cost, stats.atk, stats.hp, stats.mov), (10, 1, 2, 1));
    }

    #[test]
    fn test_move_then_attack_types() {
        assert!(UnitType::Assault.attacks_after_moving());
        assert!(UnitType::Fighter.attacks_after_moving());
        assert!(!UnitType::Tank.attacks_after_moving());
    }

    #[test]
    fn test_stealth_types() {
        assert!(UnitType::Sniper.starts_hidden());
        assert!(UnitType::Submarine.starts_hidden());
        assert!(!UnitType::Cruiser.starts_hidden());
    }
}
