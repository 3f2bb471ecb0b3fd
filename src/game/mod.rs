//! Rules engine - two-player grid wargame with fog of war and transports
//!
//! Every mutator takes a snapshot and returns a new one plus the events it
//! produced. Illegal actions are never errors: predicates explain why, and
//! mutators hand back the input unchanged.
//!
//! Key rules:
//! - Units either move or attack, unless their type or a buff says otherwise
//! - Aircraft land on carriers and infantry boards transports
//! - Stealthed units are only seen from an adjacent tile
//! - Visibility is recomputed after every change

pub mod ai;
pub mod board;
pub mod combat;
pub mod constants;
pub mod deployment;
pub mod events;
pub mod movement;
pub mod nation;
pub mod pathfinding;
pub mod setup;
pub mod skills;
pub mod state;
pub mod terrain;
pub mod turn;
pub mod unit_type;
pub mod units;
pub mod visibility;
pub mod wire;

// Re-exports for convenient access
pub use ai::{load_profile, process_ai_turn, AiPlanner, AiProfile, GameAI};
pub use board::{Board, BonusZone, MapId};
pub use combat::{calculate_damage, can_attack, perform_attack, AttackDenied, AttackTarget};
pub use constants::*;
pub use deployment::{can_deploy, deploy_unit, DeployDenied, DeployPlan, Placement};
pub use events::{Effect, EffectKind, EventLog, GameEvent, Transition};
pub use movement::{can_move_to, perform_move, MoveDenied, MoveKind, MovePlan};
pub use nation::{NationId, NationProfile, NationSkill, NationTraits};
pub use pathfinding::{reachable_tiles, ReachMap};
pub use setup::{create_initial_state, new_match};
pub use skills::{perform_nation_skill, skill_available};
pub use state::{Buff, Difficulty, GameMode, GameState};
pub use terrain::{TerrainType, Tile};
pub use turn::{start_new_turn, turn_income};
pub use unit_type::{UnitCategory, UnitStats, UnitType};
pub use units::{Unit, UnitLocation};
pub use visibility::{compute_visibility, is_unit_visible_to, recompute, Visibility};
pub use wire::{GameSnapshot, VisibilityWire};
