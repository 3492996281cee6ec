//! Error types for ferrofetch

use thiserror::Error;

/// Result type alias for ferrofetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ferrofetch
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Plugin guard error (fail-closed refusal to run plugins)
    #[error("plugin guard error: {0}")]
    Guard(String),

    /// Plugin runtime error
    #[error("plugin error: {0}")]
    Plugin(String),

    /// Profile management error
    #[error("profile error: {0}")]
    Profile(String),

    /// Banner rendering error
    #[error("banner error: {0}")]
    Banner(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Version parse error
    #[error("version error: {0}")]
    Version(#[from] semver::Error),
}
