//! Error types for xpboard
//!
//! Every failure the dashboard can hit is normalized here. `ApiError`'s
//! `Display` output is the exact message the fetch hooks store and the UI
//! shows, so variants carry user-facing text rather than debugging detail.

use thiserror::Error;

/// Main error type for the xpboard library
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend errors (signin and GraphQL)
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Key/value store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDirectory,

    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration file: {0}")]
    SaveFailed(String),

    #[error("Invalid API base URL: {0}")]
    InvalidApiBase(String),
}

/// Errors from the signin and GraphQL collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx status without a GraphQL error message to surface
    #[error("HTTP {0}")]
    Status(u16),

    /// First message of a non-empty GraphQL `errors` list
    #[error("{0}")]
    Graphql(String),

    #[error("No data in GraphQL response")]
    MissingData,

    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Signin rejected; server detail is deliberately dropped
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Key/value store errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not determine storage directory")]
    NoDirectory,

    #[error("Failed to read store {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Failed to write store {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid theme: {0}. Expected light or dark")]
    InvalidTheme(String),
}

/// Result type alias for the xpboard library
pub type Result<T> = std::result::Result<T, AppError>;
