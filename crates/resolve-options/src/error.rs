//! Error types for resolve-options

/// Result type for resolve-options operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering or applying option defaults
///
/// Every variant is a programming error in how defaults were declared.
/// None of them are transient, so callers should not retry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid option path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Unknown defaulting strategy: {0}")]
    UnknownStrategy(String),

    #[error("Strategy '{strategy}' for {path} cannot take {value_kind} as its default")]
    StrategyValueMismatch {
        path: String,
        strategy: String,
        value_kind: String,
    },

    #[error("Options must be an object, got {kind}")]
    NotAnObject { kind: String },

    #[error("Failed to parse defaults manifest: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
