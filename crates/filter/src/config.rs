//! Runner configuration and construction-time errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default nesting limit applied by [`RunnerConfig::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Settings for one [`Runner`](crate::Runner) evaluation.
///
/// # Examples
///
/// ```rust
/// use sift_filter::RunnerConfig;
///
/// let config: RunnerConfig = serde_json::from_str(r#"{"include_context": true}"#).unwrap();
/// assert_eq!(config.max_depth, Some(128));
/// assert!(config.include_context);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Maximum nesting depth of the input. Deeper input is rejected with a
    /// single `too_deep` record before any filter runs. `None` disables the
    /// check.
    pub max_depth: Option<usize>,

    /// Whether [`Runner::errors_json`](crate::Runner::errors_json) includes
    /// each record's context.
    pub include_context: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            include_context: false,
        }
    }
}

impl RunnerConfig {
    /// Disables the depth guard.
    #[must_use = "builder methods must be chained or built"]
    pub fn unbounded(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Sets the depth limit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets whether JSON error output includes record context.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_context(mut self, include_context: bool) -> Self {
        self.include_context = include_context;
        self
    }
}

/// Misuse detected while building a filter.
///
/// These are never produced while filtering a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A chain was composed from zero filters.
    #[error("a chain needs at least one filter")]
    EmptyChain,

    /// A mapper declared the same key twice.
    #[error("key `{0}` is declared more than once")]
    DuplicateKey(String),

    /// A key policy allow-list names a key it cannot apply to: an undeclared
    /// key in `allow_missing_keys`, or a declared key in `allow_extra_keys`.
    #[error("`{policy}` lists `{key}`, which it cannot apply to")]
    UnknownPolicyKey {
        /// Policy that carries the key (`allow_missing_keys` or `allow_extra_keys`).
        policy: &'static str,
        /// Offending key.
        key: String,
    },

    /// A switch registered the same dispatch key twice.
    #[error("case `{0}` is registered more than once")]
    DuplicateCase(String),

    /// A switch has neither cases nor a default.
    #[error("a switch needs at least one case or a default")]
    EmptySwitch,
}
