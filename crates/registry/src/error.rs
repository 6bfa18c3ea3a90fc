//! Registry error types.

use sift_filter::ConfigError;

/// Errors from registry lookups and filter construction.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// No factory is registered under the name.
    #[error("filter not found: {0}")]
    NotFound(String),

    /// The factory could not interpret its arguments.
    #[error("invalid arguments for filter '{name}': {source}")]
    InvalidArguments {
        /// The filter name.
        name: String,
        /// Why the arguments were rejected.
        #[source]
        source: serde_json::Error,
    },

    /// A step of a chain description has the wrong shape.
    #[error("malformed chain step: {0}")]
    MalformedStep(String),

    /// The factory produced an invalid filter configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
