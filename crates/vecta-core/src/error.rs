/// Core error types for the Vecta engine.
use std::path::PathBuf;

/// A specialized Result type for Vecta operations.
pub type VectaResult<T> = Result<T, VectaError>;

/// Errors shared by every Vecta crate that are not specific to scene mutation.
#[derive(Debug, thiserror::Error)]
pub enum VectaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {message} ({path:?})")]
    Config { message: String, path: PathBuf },
}

impl VectaError {
    /// Create a config error.
    pub fn config(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        VectaError::Config {
            message: message.into(),
            path: path.into(),
        }
    }
}
