//! Error types for terrain generation and streaming

use thiserror::Error;

/// Main error type for the crate
///
/// Only construction can fail. Queries against the world fall back to
/// documented defaults instead of returning errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Biome table has no entries")]
    EmptyBiomeTable,

    #[error("Biome {biome} lists spawner {spawner} more than once")]
    DuplicateSpawner { biome: String, spawner: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
