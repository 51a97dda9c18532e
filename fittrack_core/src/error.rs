//! Error types for the fittrack_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fittrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record or value failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stat name outside the fixed stat catalog
    #[error("Unknown stat: {0}")]
    UnknownStat(String),

    /// The preference backing store rejected a read or write
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A meal or workout log could not be imported
    #[error("Import error: {0}")]
    Import(String),
}
