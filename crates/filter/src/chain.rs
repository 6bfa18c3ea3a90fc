//! Ordered composition of filters.

use crate::config::ConfigError;
use crate::filter::{Filter, FilterResult};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// An ordered, non-empty sequence of filters that behaves as one filter.
///
/// Each member receives the previous member's output. Execution stops at the
/// first member that fails, and the chain fails with that member's errors
/// only; later members never run.
///
/// Chains never contain other chains: adding a chain splices its members in.
/// Members are reference-counted, so cloning a chain is cheap and the same
/// chain can back any number of concurrent runners.
///
/// # Examples
///
/// ```rust
/// use sift_filter::prelude::*;
/// use serde_json::json;
///
/// let chain = Chain::new(Int).then(Min::new(1));
/// assert_eq!(chain.run(json!("5")), Ok(json!(5)));
/// assert!(chain.run(json!("0")).is_err());
/// ```
#[derive(Clone)]
pub struct Chain {
    filters: Vec<Arc<dyn Filter>>,
}

impl Chain {
    /// Creates a chain whose first member is `filter`.
    pub fn new<F: Filter + 'static>(filter: F) -> Self {
        let mut chain = Self {
            filters: Vec::new(),
        };
        chain.push(filter);
        chain
    }

    /// Builds a chain from a dynamic list of filters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyChain`] when `filters` yields nothing.
    pub fn compose<I>(filters: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<Arc<dyn Filter>>,
    {
        let mut chain = Self {
            filters: Vec::new(),
        };
        for filter in filters {
            chain.push_shared(filter.into());
        }

        if chain.filters.is_empty() {
            return Err(ConfigError::EmptyChain);
        }
        Ok(chain)
    }

    /// Appends `filter`, splicing in its members if it is a chain.
    #[must_use = "builder methods must be chained or built"]
    pub fn then<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.push(filter);
        self
    }

    /// Appends `filter` in place, splicing in its members if it is a chain.
    pub fn push<F: Filter + 'static>(&mut self, filter: F) {
        if let Some(chain) = filter.as_chain() {
            self.filters.extend(chain.filters.iter().cloned());
        } else {
            self.filters.push(Arc::new(filter));
        }
    }

    /// Appends an already shared filter, splicing in its members if it is a
    /// chain.
    pub fn push_shared(&mut self, filter: Arc<dyn Filter>) {
        if let Some(chain) = filter.as_chain() {
            self.filters.extend(chain.filters.iter().cloned());
        } else {
            self.filters.push(filter);
        }
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Always false for a chain built through the public constructors.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the members in execution order.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    fn execute(&self, value: Value) -> FilterResult {
        let mut value = value;
        for filter in &self.filters {
            value = filter.run(value)?;
        }
        Ok(value)
    }
}

impl Filter for Chain {
    fn apply(&self, value: Value) -> FilterResult {
        self.execute(value)
    }

    fn apply_none(&self) -> FilterResult {
        self.execute(Value::Null)
    }

    fn name(&self) -> &'static str {
        "Chain"
    }

    fn as_chain(&self) -> Option<&Chain> {
        Some(self)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
