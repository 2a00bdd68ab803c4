//! Error types for verdant.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, VerdantError>;

#[derive(Debug, Error)]
pub enum VerdantError {
    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required secret or setting is absent. Fatal at startup.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// The inference service call failed (transport, auth, or malformed
    /// response). Surfaced to the caller without automatic retry.
    #[error("gateway error: {0}")]
    Gateway(String),

    /// A required input field was empty or missing. Carries user-facing
    /// guidance rather than a diagnostic.
    #[error("{0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
