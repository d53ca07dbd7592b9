//! Error types shared across Gitartha crates

use thiserror::Error;

/// Result type alias for shared Gitartha operations
pub type Result<T> = std::result::Result<T, GitarthaError>;

/// Low-level error shared by the server and the ingestion tool
#[derive(Error, Debug)]
pub enum GitarthaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported language '{0}': expected 'en' or 'hi'")]
    InvalidLanguage(String),

    #[error("Invalid {field}: '{value}' is not a positive integer")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GitarthaError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
