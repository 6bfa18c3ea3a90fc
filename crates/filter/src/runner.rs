//! Top-level harness that evaluates one filter against one input.

use crate::config::RunnerConfig;
use crate::error::{ErrorRecord, ErrorReport, codes};
use crate::filter::{Filter, FilterResult};
use crate::value::{Value, depth};
use indexmap::IndexMap;
use std::cell::OnceCell;

/// Applies a filter to one input value and exposes the verdict.
///
/// The filter runs at most once, on first access to any accessor; every
/// later access reads the memoized verdict. A runner is created per input
/// and never reused.
///
/// The runner is the single source of truth for validity: it is valid if and
/// only if its error report is empty. When it is invalid, the cleaned data is
/// absent.
///
/// # Examples
///
/// ```rust
/// use sift_filter::prelude::*;
/// use serde_json::json;
///
/// let runner = Runner::new(&Int, json!("abc"));
/// assert!(!runner.is_valid());
/// assert_eq!(runner.cleaned_data(), None);
/// assert_eq!(runner.error_codes().get(""), Some(&vec!["not_numeric"]));
/// ```
#[derive(Debug)]
pub struct Runner<'f> {
    filter: &'f dyn Filter,
    input: Value,
    config: RunnerConfig,
    verdict: OnceCell<FilterResult>,
}

impl<'f> Runner<'f> {
    /// Creates a runner with the default configuration.
    pub fn new(filter: &'f dyn Filter, input: Value) -> Self {
        Self::with_config(filter, input, RunnerConfig::default())
    }

    /// Creates a runner with an explicit configuration.
    pub fn with_config(filter: &'f dyn Filter, input: Value, config: RunnerConfig) -> Self {
        Self {
            filter,
            input,
            config,
            verdict: OnceCell::new(),
        }
    }

    /// Returns true when the filter accepted the input.
    pub fn is_valid(&self) -> bool {
        self.verdict().is_ok()
    }

    /// Returns the filtered value, or `None` when the input is invalid.
    pub fn cleaned_data(&self) -> Option<&Value> {
        self.verdict().as_ref().ok()
    }

    /// Returns the error report; empty when the input is valid.
    pub fn errors(&self) -> &ErrorReport {
        static EMPTY: std::sync::OnceLock<ErrorReport> = std::sync::OnceLock::new();
        match self.verdict() {
            Ok(_) => EMPTY.get_or_init(ErrorReport::new),
            Err(report) => report,
        }
    }

    /// Returns the error codes per path.
    pub fn error_codes(&self) -> IndexMap<String, Vec<&str>> {
        self.errors().codes()
    }

    /// Returns the error report as JSON, with context if the configuration
    /// asks for it.
    pub fn errors_json(&self) -> Value {
        self.errors().to_json(self.config.include_context)
    }

    /// Returns the input this runner was created with.
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Consumes the runner and returns the verdict.
    pub fn into_result(self) -> FilterResult {
        let Self {
            filter,
            input,
            config,
            verdict,
        } = self;
        match verdict.into_inner() {
            Some(result) => result,
            None => evaluate(filter, input, config),
        }
    }

    fn verdict(&self) -> &FilterResult {
        self.verdict
            .get_or_init(|| evaluate(self.filter, self.input.clone(), self.config))
    }
}

fn evaluate(filter: &dyn Filter, input: Value, config: RunnerConfig) -> FilterResult {
    let span = tracing::trace_span!("filter_runner", filter = filter.name());
    let _enter = span.enter();

    if let Some(max_depth) = config.max_depth {
        let actual = depth(&input);
        if actual > max_depth {
            tracing::debug!(depth = actual, max_depth, "input nests too deeply");
            let record = ErrorRecord::builder(
                codes::TOO_DEEP,
                "Value is nested too deeply (maximum depth is {max_depth}).",
            )
            .param("max_depth", max_depth.to_string())
            .param("depth", actual.to_string())
            .build();
            return Err(ErrorReport::single(record).with_paths());
        }
    }

    let result = filter.run(input).map_err(ErrorReport::with_paths);

    match &result {
        Ok(_) => tracing::debug!(valid = true, "filter run complete"),
        Err(report) => tracing::debug!(
            valid = false,
            error_paths = report.len(),
            "filter run complete"
        ),
    }

    result
}

// ============================================================================
// TESTS
// ============================================================================
