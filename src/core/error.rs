use thiserror::Error;

/// Failures outside the game rules: data loading, parsing, transport decoding.
///
/// Illegal game actions are not errors; see the `*Denied` reasons in the
/// game modules.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },

    #[error("Malformed tile key: {0:?}")]
    InvalidTileKey(String),

    #[error("Tile ({x}, {y}) is outside a {width}x{height} board")]
    TileOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("Snapshot has no board and none was supplied")]
    MissingBoard,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
