//! Nations: display profiles, passive traits and active skills
//!
//! Every nation-specific rule is read from the closed tables here. Damage,
//! cost, income, movement and vision code asks `NationId::traits()` instead
//! of checking for a particular nation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;
use crate::game::unit_type::{UnitCategory, UnitType};

/// Playable factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NationId {
    Germany,
    Ussr,
    Usa,
    Japan,
    Uk,
}

/// Display-only nation data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NationProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub active_skill_name: &'static str,
    pub active_skill_desc: &'static str,
    pub passive_skill_name: &'static str,
    pub passive_skill_desc: &'static str,
}

/// Passive modifiers, all additive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NationTraits {
    pub tank_attack_bonus: i32,
    pub infantry_discount_percent: u32,
    pub income_bonus: u32,
    pub sea_movement_bonus: u32,
    pub air_vision_bonus: u32,
}

/// One-shot active skill, one per nation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NationSkill {
    /// +2 attack and move-then-attack for the rest of the turn
    Blitzkrieg,
    /// Conscripts on owned land, +1 max HP for all infantry
    GreatPatrioticWar,
    /// Half the map's starting money, immediately
    WarBonds,
    /// One-hit kamikaze fighters next to the base
    DivineWind,
    /// +1 max HP and full heal for aircraft and ships
    FinestHour,
}

impl NationId {
    pub const ALL: [NationId; 5] = [
        NationId::Germany,
        NationId::Ussr,
        NationId::Usa,
        NationId::Japan,
        NationId::Uk,
    ];

    pub fn profile(&self) -> NationProfile {
        match self {
            NationId::Germany => NationProfile {
                name: "Germany",
                description: "An iron legion famed for its armoured divisions.",
                active_skill_name: "Blitzkrieg",
                active_skill_desc: "All units gain +2 attack this turn and may attack after moving.",
                passive_skill_name: "Iron Cross",
                passive_skill_desc: "All tanks gain +1 attack.",
            },
            NationId::Ussr => NationProfile {
                name: "Soviet Union",
                description: "Overwhelming numbers through mass mobilisation.",
                active_skill_name: "Great Patriotic War",
                active_skill_desc: "Summons 5 infantry at random and gives all friendly infantry +1 HP.",
                passive_skill_name: "Mass Mobilisation",
                passive_skill_desc: "Infantry costs 20% less.",
            },
            NationId::Usa => NationProfile {
                name: "United States",
                description: "An industrial superpower with a deep treasury.",
                active_skill_name: "War Bonds",
                active_skill_desc: "Immediately gain half of the starting funds.",
                passive_skill_name: "Arsenal of Democracy",
                passive_skill_desc: "+20 income every turn.",
            },
            NationId::Japan => NationProfile {
                name: "Japan",
                description: "An island nation built on sea control and air tactics.",
                active_skill_name: "Divine Wind",
                active_skill_desc: "Summons 3 kamikaze fighters (1 HP, destroyed after attacking).",
                passive_skill_name: "Combined Fleet",
                passive_skill_desc: "All naval units gain +1 movement.",
            },
            NationId::Uk => NationProfile {
                name: "United Kingdom",
                description: "Resilient defenders with a royal navy and air force.",
                active_skill_name: "Finest Hour",
                active_skill_desc: "All friendly air and naval units gain +1 HP and fully heal.",
                passive_skill_name: "Radar Network",
                passive_skill_desc: "All air units gain +1 vision.",
            },
        }
    }

    pub fn traits(&self) -> NationTraits {
        match self {
            NationId::Germany => NationTraits {
                tank_attack_bonus: 1,
                ..NationTraits::default()
            },
            NationId::Ussr => NationTraits {
                infantry_discount_percent: 20,
                ..NationTraits::default()
            },
            NationId::Usa => NationTraits {
                income_bonus: 20,
                ..NationTraits::default()
            },
            NationId::Japan => NationTraits {
                sea_movement_bonus: 1,
                ..NationTraits::default()
            },
            NationId::Uk => NationTraits {
                air_vision_bonus: 1,
                ..NationTraits::default()
            },
        }
    }

    pub fn skill(&self) -> NationSkill {
        match self {
            NationId::Germany => NationSkill::Blitzkrieg,
            NationId::Ussr => NationSkill::GreatPatrioticWar,
            NationId::Usa => NationSkill::WarBonds,
            NationId::Japan => NationSkill::DivineWind,
            NationId::Uk => NationSkill::FinestHour,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NationId::Germany => "GERMANY",
            NationId::Ussr => "USSR",
            NationId::Usa => "USA",
            NationId::Japan => "JAPAN",
            NationId::Uk => "UK",
        }
    }
}

impl NationTraits {
    /// Flat attack bonus for one of this nation's units
    pub fn attack_bonus(&self, unit_type: UnitType) -> i32 {
        if unit_type == UnitType::Tank {
            self.tank_attack_bonus
        } else {
            0
        }
    }

    /// Purchase price after discounts, floored
    pub fn unit_cost(&self, unit_type: UnitType) -> u32 {
        let cost = unit_type.stats().cost;
        if unit_type == UnitType::Infantry && self.infantry_discount_percent > 0 {
            cost * (100 - self.infantry_discount_percent) / 100
        } else {
            cost
        }
    }

    pub fn movement_bonus(&self, category: UnitCategory) -> u32 {
        if category == UnitCategory::Sea {
            self.sea_movement_bonus
        } else {
            0
        }
    }

    pub fn vision_bonus(&self, category: UnitCategory) -> u32 {
        if category == UnitCategory::Air {
            self.air_vision_bonus
        } else {
            0
        }
    }
}

impl fmt::Display for NationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NationId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NationId::ALL
            .into_iter()
            .find(|nation| nation.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::UnknownName {
                kind: "nation",
                name: s.to_string(),
            })
    }
}
