//! The filter capability
//!
//! This module defines the trait every filter implements, the shared
//! result type, and the `pipe` combinator that composes two filters into a
//! [`Chain`].

use crate::chain::Chain;
use crate::error::{ErrorRecord, ErrorRecordBuilder, ErrorReport};
use crate::value::{Value, display_value};
use std::fmt;
use std::sync::Arc;

/// The outcome of filtering one value: the cleaned value, or every error
/// found in it.
pub type FilterResult = Result<Value, ErrorReport>;

/// Message used for codes that have no template of their own.
pub const DEFAULT_TEMPLATE: &str = "This value is invalid.";

// ============================================================================
// CORE FILTER TRAIT
// ============================================================================

/// A single-purpose unit that validates and/or coerces one value.
///
/// Implementors provide [`apply`](Filter::apply) for present values. Callers
/// go through [`run`](Filter::run), which routes `null` to
/// [`apply_none`](Filter::apply_none) instead. The default `apply_none`
/// returns `null` unchanged, so an absent value passes every filter unless
/// the filter overrides it on purpose.
///
/// Filters are immutable after construction and are shared freely between
/// threads, hence the `Send + Sync` bound.
///
/// # Examples
///
/// ```rust
/// use sift_filter::prelude::*;
/// use serde_json::json;
///
/// #[derive(Debug)]
/// struct Upper;
///
/// impl Filter for Upper {
///     fn apply(&self, value: Value) -> FilterResult {
///         match value {
///             Value::String(s) => Ok(Value::String(s.to_uppercase())),
///             other => Err(ErrorRecord::wrong_type(&other, &[Kind::String]).into()),
///         }
///     }
/// }
///
/// assert_eq!(Upper.run(json!("abc")), Ok(json!("ABC")));
/// assert_eq!(Upper.run(Value::Null), Ok(Value::Null));
/// assert!(Upper.run(json!(1)).is_err());
/// ```
pub trait Filter: fmt::Debug + Send + Sync {
    /// Filters a present (non-null) value.
    fn apply(&self, value: Value) -> FilterResult;

    /// Filters an absent value.
    ///
    /// Only filters whose purpose is to reject absence should override this.
    fn apply_none(&self) -> FilterResult {
        Ok(Value::Null)
    }

    /// Filters any value, applying the absent-value policy.
    ///
    /// This is the entry point used by chains, combinators, and the runner.
    /// Every record of a failure is attributed to the filter that produced
    /// it (context entry `filter`), and a failure with an empty report is
    /// turned into a single `invalid` record.
    fn run(&self, value: Value) -> FilterResult {
        let result = if value.is_null() {
            self.apply_none()
        } else {
            self.apply(value)
        };
        result.map_err(|report| report.attributed_to(self.name()))
    }

    /// Returns the message template for each code this filter can emit.
    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Starts an error record for `code`, using this filter's template.
    fn invalid(&self, code: &'static str) -> ErrorRecordBuilder {
        let template = self
            .templates()
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(DEFAULT_TEMPLATE, |(_, t)| *t);
        ErrorRecord::builder(code, template)
    }

    /// Starts an error record for `code` that carries the rejected `value`
    /// in its context.
    fn reject(&self, code: &'static str, value: &Value) -> ErrorRecordBuilder {
        self.invalid(code).param("value", display_value(value))
    }

    /// Returns a short name for diagnostics.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Returns this filter as a chain, if it is one.
    ///
    /// Composition uses this to splice the members of a chain into another
    /// chain instead of nesting it.
    fn as_chain(&self) -> Option<&Chain> {
        None
    }
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn apply(&self, value: Value) -> FilterResult {
        (**self).apply(value)
    }

    fn apply_none(&self) -> FilterResult {
        (**self).apply_none()
    }

    fn run(&self, value: Value) -> FilterResult {
        (**self).run(value)
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        (**self).templates()
    }

    fn invalid(&self, code: &'static str) -> ErrorRecordBuilder {
        (**self).invalid(code)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn as_chain(&self) -> Option<&Chain> {
        (**self).as_chain()
    }
}

impl<F: Filter + ?Sized> Filter for Arc<F> {
    fn apply(&self, value: Value) -> FilterResult {
        (**self).apply(value)
    }

    fn apply_none(&self) -> FilterResult {
        (**self).apply_none()
    }

    fn run(&self, value: Value) -> FilterResult {
        (**self).run(value)
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        (**self).templates()
    }

    fn invalid(&self, code: &'static str) -> ErrorRecordBuilder {
        (**self).invalid(code)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn as_chain(&self) -> Option<&Chain> {
        (**self).as_chain()
    }
}

// ============================================================================
// FILTER EXTENSION TRAIT
// ============================================================================

/// Extension trait providing composition for filters.
///
/// Automatically implemented for every [`Filter`].
pub trait FilterExt: Filter + Sized + 'static {
    /// Composes `self` and `next` into a chain that runs `self` first.
    ///
    /// Chains on either side are spliced in rather than nested, so
    /// `a.pipe(b).pipe(c)` and `a.pipe(b.pipe(c))` hold the same members.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sift_filter::prelude::*;
    ///
    /// let chain = Int.pipe(Min::new(0)).pipe(Max::new(10));
    /// assert_eq!(chain.len(), 3);
    /// ```
    fn pipe<F: Filter + 'static>(self, next: F) -> Chain {
        Chain::new(self).then(next)
    }
}

impl<T: Filter + 'static> FilterExt for T {}

/// Composes two filters into a chain; see [`FilterExt::pipe`].
pub fn pipe<A, B>(first: A, second: B) -> Chain
where
    A: Filter + 'static,
    B: Filter + 'static,
{
    first.pipe(second)
}

// ============================================================================
// TESTS
// ============================================================================
