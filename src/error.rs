//! Error types for cosmos.

use thiserror::Error;

/// Cosmos error types.
#[derive(Error, Debug)]
pub enum CosmosError {
    /// Zero-length or non-finite input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Vectors of different lengths were compared or blended
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Configuration value out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Snapshot written by an unknown schema version
    #[error("Unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedSnapshot { found: u32, supported: u32 },

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for cosmos operations.
pub type Result<T> = std::result::Result<T, CosmosError>;
