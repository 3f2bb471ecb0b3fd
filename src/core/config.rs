//! Match configuration
//!
//! Everything needed to set up a game before the first turn. Loaded from
//! TOML by the headless runner; `Default` matches a fresh PvE lobby.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::PerPlayer;
use crate::game::nation::NationId;
use crate::game::state::{Difficulty, GameMode};
use crate::game::board::MapId;

/// Configuration for a single match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Which built-in layout to play on
    pub map: MapId,

    /// AI strength for PvE games
    pub difficulty: Difficulty,

    pub mode: GameMode,

    /// Faction per side; drives passives and the one-shot skill
    pub nations: PerPlayer<NationId>,

    /// Seed for every random choice made during the match
    pub seed: u64,

    /// Full turns (both players) before the runner calls a draw
    pub max_turns: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            map: MapId::Default,
            difficulty: Difficulty::Normal,
            mode: GameMode::PvE,
            nations: PerPlayer::new(NationId::Germany, NationId::Ussr),
            seed: 42,
            max_turns: 200,
        }
    }
}

impl MatchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(contents)?;
        config.validate().map_err(GameError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_turns == 0 {
            return Err("max_turns must be at least 1".into());
        }
        Ok(())
    }
}
