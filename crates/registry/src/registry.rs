//! Name-keyed factory table.

use crate::RegistryError;
use indexmap::IndexMap;
use serde_json::Value;
use sift_filter::{Chain, Filter};
use std::fmt;
use std::sync::Arc;

/// Builds a filter chain from JSON arguments.
pub type FilterFactory = Arc<dyn Fn(&Value) -> Result<Chain, RegistryError> + Send + Sync>;

/// A source of filter factories, injected into [`RegistryBuilder`].
///
/// ```
/// use sift_filter::prelude::*;
/// use sift_registry::{FilterProvider, FilterRegistry, RegistryBuilder};
///
/// struct Ages;
///
/// impl FilterProvider for Ages {
///     fn name(&self) -> &str {
///         "ages"
///     }
///
///     fn register(&self, builder: &mut RegistryBuilder) {
///         builder.register("Age", |_| Ok(Int.pipe(Min::new(0)).pipe(Max::new(150))));
///     }
/// }
///
/// let registry = FilterRegistry::builder().provider(&Ages).build();
/// assert!(registry.contains("Age"));
/// ```
pub trait FilterProvider {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Registers this provider's factories.
    fn register(&self, builder: &mut RegistryBuilder);
}

struct Entry {
    provider: String,
    factory: FilterFactory,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Collects factories from providers before the registry is frozen.
///
/// When two registrations share a name, the later one replaces the earlier
/// one and a warning is logged.
pub struct RegistryBuilder {
    entries: IndexMap<String, Entry>,
    current_provider: String,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            current_provider: String::from("direct"),
        }
    }

    /// Registers every factory of `provider`.
    #[must_use = "builder methods must be chained or built"]
    pub fn provider(mut self, provider: &dyn FilterProvider) -> Self {
        let previous = std::mem::replace(&mut self.current_provider, provider.name().to_owned());
        provider.register(&mut self);
        self.current_provider = previous;
        self
    }

    /// Registers `factory` under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Chain, RegistryError> + Send + Sync + 'static,
    {
        let name = name.into();
        let entry = Entry {
            provider: self.current_provider.clone(),
            factory: Arc::new(factory),
        };

        tracing::debug!(filter = %name, provider = %entry.provider, "registering filter factory");
        if let Some(replaced) = self.entries.insert(name.clone(), entry) {
            tracing::warn!(
                filter = %name,
                replaced = %replaced.provider,
                provider = %self.current_provider,
                "filter factory replaced by a later registration"
            );
        }
        self
    }

    /// Freezes the collected factories.
    pub fn build(self) -> FilterRegistry {
        tracing::info!(filters = self.entries.len(), "filter registry built");
        FilterRegistry {
            entries: self.entries,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("count", &self.entries.len())
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Read-only table from filter name to factory.
///
/// Built once at startup and shared freely afterwards; lookups never
/// mutate it.
///
/// ```
/// use serde_json::json;
/// use sift_filter::Runner;
/// use sift_registry::FilterRegistry;
///
/// let registry = FilterRegistry::with_builtins();
/// let chain = registry.compose(&json!(["Required", "Int", {"Min": {"min": 1}}])).unwrap();
///
/// assert!(Runner::new(&chain, json!("3")).is_valid());
/// assert!(!Runner::new(&chain, json!("0")).is_valid());
/// ```
pub struct FilterRegistry {
    entries: IndexMap<String, Entry>,
}

impl FilterRegistry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry holding only the built-in catalog.
    pub fn with_builtins() -> Self {
        Self::builder().provider(&crate::Builtins).build()
    }

    /// Builds the filter registered under `name` with `args`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] for unknown names; otherwise whatever the
    /// factory reports.
    pub fn create(&self, name: &str, args: &Value) -> Result<Chain, RegistryError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))?;
        (entry.factory)(args)
    }

    /// Builds one chain from a JSON description.
    ///
    /// The description is either a single step or an array of steps. A
    /// step is a filter name (no arguments) or a one-entry object mapping the
    /// name to its arguments.
    ///
    /// # Errors
    ///
    /// [`RegistryError::MalformedStep`] for malformed steps and
    /// [`RegistryError::Config`] for an empty array, plus any error from
    /// [`create`](Self::create).
    pub fn compose(&self, description: &Value) -> Result<Chain, RegistryError> {
        let steps = match description {
            Value::Array(steps) => steps.as_slice(),
            single => std::slice::from_ref(single),
        };

        let chains = steps
            .iter()
            .map(|step| self.create_step(step))
            .collect::<Result<Vec<_>, _>>()?;

        let filters = chains
            .into_iter()
            .map(|chain| Arc::new(chain) as Arc<dyn Filter>);
        Ok(Chain::compose(filters)?)
    }

    fn create_step(&self, step: &Value) -> Result<Chain, RegistryError> {
        match step {
            Value::String(name) => self.create(name, &Value::Null),
            Value::Object(map) if map.len() == 1 => {
                let (name, args) = map
                    .iter()
                    .next()
                    .ok_or_else(|| RegistryError::MalformedStep(step.to_string()))?;
                self.create(name, args)
            }
            other => Err(RegistryError::MalformedStep(other.to_string())),
        }
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Name of the provider that registered `name`.
    pub fn provider_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|entry| entry.provider.as_str())
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("count", &self.entries.len())
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sift_filter::prelude::*;

    struct First;

    impl FilterProvider for First {
        fn name(&self) -> &str {
            "first"
        }

        fn register(&self, builder: &mut RegistryBuilder) {
            builder
                .register("Shared", |_| Ok(Chain::new(Int)))
                .register("OnlyFirst", |_| Ok(Chain::new(NoOp)));
        }
    }

    struct Second;

    impl FilterProvider for Second {
        fn name(&self) -> &str {
            "second"
        }

        fn register(&self, builder: &mut RegistryBuilder) {
            builder.register("Shared", |_| Ok(Chain::new(Required)));
        }
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = FilterRegistry::builder()
            .provider(&First)
            .provider(&Second)
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.provider_of("Shared"), Some("second"));
        assert_eq!(registry.provider_of("OnlyFirst"), Some("first"));

        let chain = registry.create("Shared", &Value::Null).unwrap();
        assert!(chain.run(Value::Null).is_err());
    }

    #[test]
    fn direct_registration() {
        let mut builder = RegistryBuilder::new();
        builder.register("Anything", |_| Ok(Chain::new(NoOp)));
        let registry = builder.build();
        assert_eq!(registry.provider_of("Anything"), Some("direct"));
    }

    #[test]
    fn unknown_name() {
        let registry = FilterRegistry::builder().build();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.create("Nope", &Value::Null),
            Err(RegistryError::NotFound(name)) if name == "Nope"
        ));
    }

    #[test]
    fn compose_rejects_malformed_specs() {
        let registry = FilterRegistry::builder().provider(&First).build();

        assert!(matches!(
            registry.compose(&json!([])),
            Err(RegistryError::Config(ConfigError::EmptyChain))
        ));
        assert!(matches!(
            registry.compose(&json!([42])),
            Err(RegistryError::MalformedStep(_))
        ));
        assert!(matches!(
            registry.compose(&json!({"Shared": null, "OnlyFirst": null})),
            Err(RegistryError::MalformedStep(_))
        ));
    }

    #[test]
    fn compose_single_step() {
        let registry = FilterRegistry::builder().provider(&First).build();
        let chain = registry.compose(&json!("Shared")).unwrap();
        assert_eq!(chain.run(json!("4")), Ok(json!(4)));
    }
}
