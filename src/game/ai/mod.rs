//! Computer opponent
//!
//! Architecture: Trait + Data hybrid
//! - GameAI trait defines interface for swappable implementations
//! - AiProfile struct holds TOML-loaded tuning numbers
//! - AiPlanner plays a turn through the same primitives a human uses

mod deployment;
mod planner;
mod profile;

pub use deployment::{counter_pick, deployment_phase, purchase_priority};
pub use planner::{process_ai_turn, AiPlanner};
pub use profile::{load_profile, AiProfile, DeploymentConfig, TacticsConfig, TargetOrder};

use rand::Rng;

use crate::core::types::Timestamp;
use crate::game::events::Transition;
use crate::game::state::GameState;

/// Trait for AI players
pub trait GameAI {
    /// Play the whole turn of `state.current_player`
    fn process_turn(&mut self, state: &GameState, now: Timestamp) -> Transition;

    /// Get the profile configuration
    fn profile(&self) -> &AiProfile;

    /// Check if AI cheats on fog of war
    fn ignores_fog_of_war(&self) -> bool;
}

/// Roll for a mistake; a zero chance draws nothing from `rng`
fn roll(rng: &mut impl Rng, chance: f32) -> bool {
    chance > 0.0 && rng.gen::<f32>() < chance
}
