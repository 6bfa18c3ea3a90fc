//! MAPPER combinator - per-key chains for a mapping

use super::UNEXPECTED_TEMPLATE;
use crate::chain::Chain;
use crate::config::ConfigError;
use crate::error::{ErrorRecord, ErrorReport, FieldPath, codes};
use crate::filter::{Filter, FilterResult};
use crate::value::{Kind, Map, Value};
use indexmap::IndexMap;
use std::collections::BTreeSet;

// ============================================================================
// KEY POLICY
// ============================================================================

/// Which keys a [`Mapper`] lets through for a presence rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Every key is allowed.
    #[default]
    AllowAll,
    /// No key is allowed.
    DenyAll,
    /// Only the listed keys are allowed.
    Only(BTreeSet<String>),
}

impl KeyPolicy {
    /// Creates an allow-list policy.
    pub fn only<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::Only(keys.into_iter().map(Into::into).collect())
    }

    /// Returns true when `key` is allowed.
    pub fn allows(&self, key: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::DenyAll => false,
            Self::Only(keys) => keys.contains(key),
        }
    }
}

impl From<bool> for KeyPolicy {
    fn from(allow: bool) -> Self {
        if allow { Self::AllowAll } else { Self::DenyAll }
    }
}

// ============================================================================
// MAPPER COMBINATOR
// ============================================================================

/// Validates a mapping with one chain per declared key.
///
/// - A declared key that is present runs its chain on the value.
/// - A declared key that is absent runs its chain on `null` when
///   `allow_missing_keys` allows it, and is reported as `missing` otherwise.
/// - An undeclared key passes through unchanged when `allow_extra_keys`
///   allows it, and is reported as `unexpected` otherwise.
///
/// Keys are evaluated independently; a failure under one key never stops
/// the others. The cleaned mapping holds declared keys in declaration order
/// followed by allowed extra keys in sorted order. Keys whose chain failed
/// are left out.
///
/// Both policies default to [`KeyPolicy::AllowAll`].
///
/// # Examples
///
/// ```rust
/// use sift_filter::prelude::*;
/// use serde_json::json;
///
/// let mapper = Mapper::builder()
///     .field("id", Required.pipe(Int))
///     .field("subject", NotEmpty::new())
///     .allow_extra_keys(false)
///     .allow_missing_keys(false)
///     .build()
///     .unwrap();
///
/// let runner = Runner::new(&mapper, json!({"id": "7", "extra": true}));
/// assert!(!runner.is_valid());
/// assert_eq!(runner.error_codes().get("extra"), Some(&vec!["unexpected"]));
/// assert_eq!(runner.error_codes().get("subject"), Some(&vec!["missing"]));
/// ```
#[derive(Debug, Clone)]
pub struct Mapper {
    fields: IndexMap<String, Option<Chain>>,
    allow_missing_keys: KeyPolicy,
    allow_extra_keys: KeyPolicy,
}

impl Mapper {
    /// Starts building a mapper.
    pub fn builder() -> MapperBuilder {
        MapperBuilder::default()
    }

    /// Returns the declared keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the missing-key policy.
    pub fn allow_missing_keys(&self) -> &KeyPolicy {
        &self.allow_missing_keys
    }

    /// Returns the extra-key policy.
    pub fn allow_extra_keys(&self) -> &KeyPolicy {
        &self.allow_extra_keys
    }

    fn run_field(chain: Option<&Chain>, value: Value) -> FilterResult {
        match chain {
            Some(chain) => chain.run(value),
            None => Ok(value),
        }
    }
}

impl Filter for Mapper {
    fn apply(&self, value: Value) -> FilterResult {
        let mut input = match value {
            Value::Object(map) => map,
            other => return Err(ErrorRecord::wrong_type(&other, &[Kind::Object]).into()),
        };

        let mut cleaned = Map::new();
        let mut report = ErrorReport::new();

        for (key, chain) in &self.fields {
            let value = match input.remove(key) {
                Some(value) => value,
                None if self.allow_missing_keys.allows(key) => Value::Null,
                None => {
                    report.push(
                        FieldPath::key(key.as_str()),
                        self.reject(codes::MISSING, &Value::Null)
                            .param("key", key.clone())
                            .build(),
                    );
                    continue;
                }
            };

            match Self::run_field(chain.as_ref(), value) {
                Ok(value) => {
                    cleaned.insert(key.clone(), value);
                }
                Err(child) => report.merge_under(key.as_str(), child),
            }
        }

        let mut extras: Vec<(String, Value)> = input.into_iter().collect();
        extras.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (key, value) in extras {
            if self.allow_extra_keys.allows(&key) {
                cleaned.insert(key, value);
            } else {
                let record = self
                    .reject(codes::UNEXPECTED, &value)
                    .param("actual_key", key.clone())
                    .build();
                report.push(FieldPath::key(key), record);
            }
        }

        if report.is_empty() {
            Ok(Value::Object(cleaned))
        } else {
            Err(report)
        }
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (codes::MISSING, "{key} is required."),
            (codes::UNEXPECTED, UNEXPECTED_TEMPLATE),
        ]
    }
}

// ============================================================================
// MAPPER BUILDER
// ============================================================================

/// Builder for [`Mapper`].
#[derive(Debug, Default)]
pub struct MapperBuilder {
    fields: Vec<(String, Option<Chain>)>,
    allow_missing_keys: KeyPolicy,
    allow_extra_keys: KeyPolicy,
}

impl MapperBuilder {
    /// Declares `key` with the chain that filters its value.
    #[must_use = "builder methods must be chained or built"]
    pub fn field<F: Filter + 'static>(mut self, key: impl Into<String>, filter: F) -> Self {
        self.fields.push((key.into(), Some(Chain::new(filter))));
        self
    }

    /// Declares `key` without a chain; its value passes through unchanged.
    #[must_use = "builder methods must be chained or built"]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.fields.push((key.into(), None));
        self
    }

    /// Sets which declared keys may be absent.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_missing_keys(mut self, policy: impl Into<KeyPolicy>) -> Self {
        self.allow_missing_keys = policy.into();
        self
    }

    /// Sets which undeclared keys may be present.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_extra_keys(mut self, policy: impl Into<KeyPolicy>) -> Self {
        self.allow_extra_keys = policy.into();
        self
    }

    /// Validates the declarations and builds the mapper.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateKey`] when a key is declared twice.
    /// - [`ConfigError::UnknownPolicyKey`] when `allow_missing_keys` lists an
    ///   undeclared key or `allow_extra_keys` lists a declared one.
    pub fn build(self) -> Result<Mapper, ConfigError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for (key, chain) in self.fields {
            if fields.contains_key(&key) {
                return Err(ConfigError::DuplicateKey(key));
            }
            fields.insert(key, chain);
        }

        if let KeyPolicy::Only(keys) = &self.allow_missing_keys {
            if let Some(key) = keys.iter().find(|k| !fields.contains_key(k.as_str())) {
                return Err(ConfigError::UnknownPolicyKey {
                    policy: "allow_missing_keys",
                    key: key.clone(),
                });
            }
        }

        if let KeyPolicy::Only(keys) = &self.allow_extra_keys {
            if let Some(key) = keys.iter().find(|k| fields.contains_key(k.as_str())) {
                return Err(ConfigError::UnknownPolicyKey {
                    policy: "allow_extra_keys",
                    key: key.clone(),
                });
            }
        }

        Ok(Mapper {
            fields,
            allow_missing_keys: self.allow_missing_keys,
            allow_extra_keys: self.allow_extra_keys,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
