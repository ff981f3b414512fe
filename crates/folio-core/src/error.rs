//! Error types for Folio page effects

use thiserror::Error;

/// Main error type for page effect setup
#[derive(Error, Debug)]
pub enum EffectsError {
    /// A host document operation failed (carries the host's message)
    #[error("DOM error: {0}")]
    Dom(String),

    /// A required structural element (head, body) is missing
    #[error("Missing element: {0}")]
    MissingElement(&'static str),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration parsed but holds values the effects cannot use
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Logging could not be installed
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type alias using EffectsError
pub type EffectsResult<T> = Result<T, EffectsError>;
