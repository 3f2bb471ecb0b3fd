//! AI tuning profiles loaded from TOML
//!
//! Every number the planner uses lives here. Built-in profiles exist for
//! each difficulty; files under `data/ai_profiles/` can override them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::error::{GameError, Result};
use crate::game::state::Difficulty;
use crate::game::unit_type::UnitType;

/// How the planner ranks units it can already hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetOrder {
    /// Closest first
    Nearest,
    /// Lowest remaining HP first
    Weakest,
}

/// Purchase behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Chance to skip buying entirely this turn
    pub skip_chance: f32,
    /// Upper bound on purchase rounds per turn
    pub purchase_attempts: u32,
    /// Stop buying below this balance
    pub min_funds: u32,
    /// Types to try, highest priority first
    pub priority: Vec<UnitType>,
    /// Prepend a counter to the enemy's composition
    pub counter_pick: bool,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            skip_chance: 0.0,
            purchase_attempts: 10,
            min_funds: 10,
            priority: vec![
                UnitType::Tank,
                UnitType::AntiAir,
                UnitType::Infantry,
                UnitType::Assault,
            ],
            counter_pick: false,
        }
    }
}

/// Per-unit action behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticsConfig {
    /// Chance to pass up a valid attack on a unit
    pub hesitation_chance: f32,
    pub target_order: TargetOrder,
    /// Head for the nearest enemy unit instead of only the HQ
    pub chase_units: bool,
    /// Always chase an enemy at or below this HP, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weak_enemy_hp: Option<i32>,
    /// Amplitude of random noise added to move scores
    pub move_jitter: f64,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            hesitation_chance: 0.0,
            target_order: TargetOrder::Nearest,
            chase_units: true,
            weak_enemy_hp: None,
            move_jitter: 0.0,
        }
    }
}

/// Complete AI profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Name of this profile (set from filename)
    #[serde(default)]
    pub name: String,
    /// See every enemy unit when choosing where to go
    #[serde(default = "default_true")]
    pub ignores_fog_of_war: bool,
    #[serde(default)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub tactics: TacticsConfig,
}

fn default_true() -> bool {
    true
}

impl Default for AiProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Normal)
    }
}

impl AiProfile {
    /// Built-in profile for a difficulty level
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                name: "easy".to_string(),
                ignores_fog_of_war: true,
                deployment: DeploymentConfig {
                    skip_chance: 0.2,
                    priority: vec![UnitType::Infantry, UnitType::Assault, UnitType::Tank],
                    ..DeploymentConfig::default()
                },
                tactics: TacticsConfig {
                    hesitation_chance: 0.3,
                    chase_units: false,
                    move_jitter: 2.0,
                    ..TacticsConfig::default()
                },
            },
            Difficulty::Normal => Self {
                name: "normal".to_string(),
                ignores_fog_of_war: true,
                deployment: DeploymentConfig::default(),
                tactics: TacticsConfig::default(),
            },
            Difficulty::Hard => Self {
                name: "hard".to_string(),
                ignores_fog_of_war: true,
                deployment: DeploymentConfig {
                    priority: vec![
                        UnitType::Tank,
                        UnitType::Infantry,
                        UnitType::Assault,
                        UnitType::SpecialForces,
                        UnitType::Bomber,
                    ],
                    counter_pick: true,
                    ..DeploymentConfig::default()
                },
                tactics: TacticsConfig {
                    target_order: TargetOrder::Weakest,
                    weak_enemy_hp: Some(2),
                    ..TacticsConfig::default()
                },
            },
        }
    }

    /// Parse a profile from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let profile: AiProfile = toml::from_str(contents)?;
        profile.validate().map_err(GameError::InvalidConfig)?;
        Ok(profile)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        for (label, chance) in [
            ("deployment.skip_chance", self.deployment.skip_chance),
            ("tactics.hesitation_chance", self.tactics.hesitation_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(format!("{label} must be within [0, 1], got {chance}"));
            }
        }
        if self.tactics.move_jitter < 0.0 {
            return Err("tactics.move_jitter must not be negative".into());
        }
        Ok(())
    }
}

/// Load a profile from TOML
///
/// Loads from `data/ai_profiles/{name}.toml`
pub fn load_profile(name: &str) -> Result<AiProfile> {
    let path = profile_path(name);
    let contents = fs::read_to_string(&path)?;
    let mut profile = AiProfile::from_toml_str(&contents)?;
    profile.name = name.to_string();
    Ok(profile)
}

/// Get path to profile file
fn profile_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data/ai_profiles")
        .join(format!("{}.toml", name))
}
