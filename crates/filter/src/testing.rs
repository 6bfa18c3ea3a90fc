//! Assertion helpers for filter test suites.
//!
//! Enabled with the `testing` feature. Each helper evaluates the filter
//! through a [`Runner`], so the same absent-value policy, depth guard, and
//! error normalisation apply as in production.
//!
//! # Examples
//!
//! ```rust
//! use sift_filter::prelude::*;
//! use sift_filter::testing::{assert_errors, assert_passes};
//! use serde_json::json;
//!
//! assert_passes(&Int, json!("5"), json!(5));
//! assert_errors(&Int, json!("five"), json!({"": ["not_numeric"]}));
//! ```

use crate::filter::Filter;
use crate::runner::Runner;
use crate::value::Value;
use pretty_assertions::assert_eq;

/// Asserts that `filter` accepts `input` and cleans it to `expected`.
#[track_caller]
pub fn assert_passes(filter: &dyn Filter, input: Value, expected: Value) {
    let runner = Runner::new(filter, input);
    assert!(
        runner.is_valid(),
        "expected {} to pass, got errors: {}",
        filter.name(),
        runner.errors_json()
    );
    assert_eq!(runner.cleaned_data(), Some(&expected));
}

/// Asserts that `filter` accepts `input` and returns it unchanged.
#[track_caller]
pub fn assert_unchanged(filter: &dyn Filter, input: Value) {
    let expected = input.clone();
    assert_passes(filter, input, expected);
}

/// Asserts that `filter` rejects `input` with exactly the expected codes.
///
/// `expected` maps each path to the list of codes reported under it, in
/// the form `{"path": ["code", ...]}`.
#[track_caller]
pub fn assert_errors(filter: &dyn Filter, input: Value, expected: Value) {
    let runner = Runner::new(filter, input);
    assert!(
        !runner.is_valid(),
        "expected {} to fail, got cleaned data: {:?}",
        filter.name(),
        runner.cleaned_data()
    );

    let actual: serde_json::Map<String, Value> = runner
        .error_codes()
        .into_iter()
        .map(|(path, codes)| {
            let codes = codes.into_iter().map(Value::from).collect();
            (path, Value::Array(codes))
        })
        .collect();
    assert_eq!(Value::Object(actual), expected);
}
