//! SWITCH combinator - dispatch to one of several chains

use crate::chain::Chain;
use crate::config::ConfigError;
use crate::error::codes;
use crate::filter::{Filter, FilterResult};
use crate::value::{Value, display_value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Derives the dispatch key from a value. `None` means "no key".
pub type Getter = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Runs exactly one of several chains, chosen by a key derived from the
/// value.
///
/// When the derived key matches no case, the default chain runs if there is
/// one; otherwise the value is rejected with `unexpected_case`, carrying the
/// key (or `null` when the getter produced none) in its context.
///
/// # Examples
///
/// ```rust
/// use sift_filter::prelude::*;
/// use serde_json::json;
///
/// let shape = Switch::by_field("kind")
///     .case("circle", Mapper::builder().key("kind").field("r", Required.pipe(Int)).build().unwrap())
///     .case("square", Mapper::builder().key("kind").field("side", Required.pipe(Int)).build().unwrap())
///     .build()
///     .unwrap();
///
/// assert!(Runner::new(&shape, json!({"kind": "circle", "r": "2"})).is_valid());
///
/// let runner = Runner::new(&shape, json!({"kind": "hexagon"}));
/// assert_eq!(runner.error_codes().get(""), Some(&vec!["unexpected_case"]));
/// ```
#[derive(Clone)]
pub struct Switch {
    getter: Getter,
    cases: IndexMap<String, Chain>,
    default: Option<Chain>,
}

impl Switch {
    /// Starts building a switch that dispatches on `getter(value)`.
    pub fn builder<G>(getter: G) -> SwitchBuilder
    where
        G: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        SwitchBuilder {
            getter: Arc::new(getter),
            cases: Vec::new(),
            default: None,
        }
    }

    /// Starts building a switch that dispatches on a field of a mapping.
    ///
    /// String fields dispatch on their content; other present fields on
    /// their JSON rendering. A missing field, a `null` field, or a value that
    /// is not a mapping produces no key.
    pub fn by_field(field: impl Into<String>) -> SwitchBuilder {
        let field = field.into();
        Self::builder(move |value| match value.get(&field)? {
            Value::Null => None,
            present => Some(display_value(present)),
        })
    }

    /// Returns the registered case keys in registration order.
    pub fn case_keys(&self) -> impl Iterator<Item = &str> {
        self.cases.keys().map(String::as_str)
    }

    /// Returns true when a default chain is configured.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl Filter for Switch {
    fn apply(&self, value: Value) -> FilterResult {
        let key = (self.getter)(&value);

        if let Some(chain) = key.as_deref().and_then(|k| self.cases.get(k)) {
            return chain.run(value);
        }

        match &self.default {
            Some(chain) => chain.run(value),
            None => Err(self
                .reject(codes::UNEXPECTED_CASE, &value)
                .param("key", key.unwrap_or_else(|| "null".to_owned()))
                .into()),
        }
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(codes::UNEXPECTED_CASE, "No case matches key \"{key}\".")]
    }
}

impl fmt::Debug for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switch")
            .field("getter", &"<function>")
            .field("cases", &self.cases)
            .field("default", &self.default)
            .finish()
    }
}

/// Builder for [`Switch`].
pub struct SwitchBuilder {
    getter: Getter,
    cases: Vec<(String, Chain)>,
    default: Option<Chain>,
}

impl SwitchBuilder {
    /// Registers the chain to run when the dispatch key equals `key`.
    #[must_use = "builder methods must be chained or built"]
    pub fn case<F: Filter + 'static>(mut self, key: impl Into<String>, filter: F) -> Self {
        self.cases.push((key.into(), Chain::new(filter)));
        self
    }

    /// Sets the chain to run when no case matches.
    #[must_use = "builder methods must be chained or built"]
    pub fn default<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.default = Some(Chain::new(filter));
        self
    }

    /// Validates the cases and builds the switch.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateCase`] when a key is registered twice.
    /// - [`ConfigError::EmptySwitch`] when there are no cases and no default.
    pub fn build(self) -> Result<Switch, ConfigError> {
        if self.cases.is_empty() && self.default.is_none() {
            return Err(ConfigError::EmptySwitch);
        }

        let mut cases = IndexMap::with_capacity(self.cases.len());
        for (key, chain) in self.cases {
            if cases.contains_key(&key) {
                return Err(ConfigError::DuplicateCase(key));
            }
            cases.insert(key, chain);
        }

        Ok(Switch {
            getter: self.getter,
            cases,
            default: self.default,
        })
    }
}

impl fmt::Debug for SwitchBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchBuilder")
            .field("getter", &"<function>")
            .field("cases", &self.cases)
            .field("default", &self.default)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
