pub mod config;
pub mod error;
pub mod types;

pub use config::MatchConfig;
pub use error::{GameError, Result};
pub use types::{PerPlayer, Player, Position, Timestamp, UnitId};
