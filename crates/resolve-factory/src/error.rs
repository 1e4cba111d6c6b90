//! Error types for resolve-factory

/// Result type for resolve-factory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or deriving resolvers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The creation collaborator produced no resolver for the options
    #[error("No resolver created for namespace '{namespace}'")]
    NoResolverCreated { namespace: String },

    /// A resolver outlived the factory that built it
    #[error("Resolver factory for namespace '{namespace}' has been dropped")]
    FactoryDropped { namespace: String },

    /// A legacy plugin name and its handler disagree on the hook shape
    #[error("Plugin '{name}' expects a {expected} handler")]
    PluginShapeMismatch { name: String, expected: String },

    /// Options could not be serialized into a cache key
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
