use thiserror::Error;
use std::path::PathBuf;

#[derive(Error, Debug)]
pub enum HexMapError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Generation-related errors
    #[error("Unknown terrain type: '{name}'")]
    UnknownTerrain { name: String },

    #[error("Invalid grid size {width}x{height}")]
    InvalidGridSize { width: u32, height: u32 },

    #[error("Failed to write preview image: {0}")]
    PreviewFailed(#[from] image::ImageError),
}

/// Result type alias for all fallible operations
pub type HexMapResult<T> = Result<T, HexMapError>;
