//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Judge-path errors ([`ConfigError::NoJudgesConfigured`], a missing credential) only
/// disable the judge path; they never stop the local classifier.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    #[error("invalid number in {name}: '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid judge transport '{value}': expected 'openrouter' or 'native'")]
    InvalidTransport { value: String },

    #[error("invalid judge list: {reason}")]
    InvalidJudges { reason: String },

    #[error("no judges configured")]
    NoJudgesConfigured,

    #[error("invalid fusion weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("failed to build HTTP client: {reason}")]
    HttpClient { reason: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
