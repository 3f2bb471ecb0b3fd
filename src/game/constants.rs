//! Game rule constants - all tunable values in one place
//!
//! Modifiers are ADDITIVE on top of the unit table, never multiplicative,
//! except the two explicit doublings/halvings in combat.

use crate::core::types::Timestamp;

// Economy
pub const BASE_INCOME: u32 = 10;
pub const DEFAULT_STARTING_MONEY: u32 = 200;
pub const ARCHIPELAGO_STARTING_MONEY: u32 = 300;
pub const GOLDEN_VALLEY_STARTING_MONEY: u32 = 400;

/// Paid per living unit standing in a map's bonus zone at turn start
pub const BONUS_ZONE_PAYOUT: u32 = 50;

// Headquarters
pub const STARTING_BASE_HP: i32 = 20;

// Turn timer (advisory only)
pub const TURN_DURATION_MS: Timestamp = 180_000;

// Combat
pub const ANTI_TANK_MULTIPLIER: i32 = 2;
pub const BLITZKRIEG_ATTACK_BONUS: i32 = 2;

// Nation skills
pub const CONSCRIPT_COUNT: usize = 5;
pub const CONSCRIPT_PLACEMENT_ATTEMPTS: usize = 200;
pub const KAMIKAZE_COUNT: usize = 3;
pub const KAMIKAZE_HP: i32 = 1;
pub const SKILL_MAX_HP_BONUS: i32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_money_ordering() {
        assert!(DEFAULT_STARTING_MONEY < ARCHIPELAGO_STARTING_MONEY);
        assert!(ARCHIPELAGO_STARTING_MONEY < GOLDEN_VALLEY_STARTING_MONEY);
    }

    #[test]
    fn test_income_affordable() {
        // One turn of income must buy at least the cheapest unit
        assert!(BASE_INCOME >= 10);
    }
}
