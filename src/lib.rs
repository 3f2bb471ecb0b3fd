//! Steel Tide - turn-based grid wargame engine with a heuristic AI opponent

pub mod core;
pub mod game;
