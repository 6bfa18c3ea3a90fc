//! # sift-filter
//!
//! Composable filters that validate and coerce JSON-like values.
//!
//! ## Quick Start
//!
//! ```rust
//! use sift_filter::prelude::*;
//! use serde_json::json;
//!
//! // Compose filters with .pipe(); the chain stops at the first failure.
//! let age = Int.pipe(Min::new(0)).pipe(Max::new(150));
//!
//! let runner = Runner::new(&age, json!("42"));
//! assert!(runner.is_valid());
//! assert_eq!(runner.cleaned_data(), Some(&json!(42)));
//! ```
//!
//! ## Structural filters
//!
//! - [`Mapper`](combinators::Mapper) applies a chain per key of a mapping and
//!   enforces which keys may be missing or extra.
//! - [`Repeater`](combinators::Repeater) applies one chain to every element of
//!   a sequence or every value of a mapping.
//! - [`Switch`](combinators::Switch) picks one chain based on a key derived
//!   from the value.
//!
//! All three are filters themselves, so they nest inside each other and inside
//! chains. Errors from nested filters are reported under a dotted path such as
//! `0.x` (element `0`, field `x`).
//!
//! ## Absent values
//!
//! `null` passes through every filter unchanged, except for the filters whose
//! purpose is to reject it ([`Required`](filters::Required) and
//! [`NotEmpty`](filters::NotEmpty) configured without `allow_none`).

// ErrorReport is the error type of every filter; boxing it would add an
// allocation to every failing path for no practical benefit.
#![allow(clippy::result_large_err)]

pub mod chain;
pub mod combinators;
pub mod config;
pub mod error;
pub mod filter;
pub mod filters;
pub mod prelude;
pub mod runner;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod value;

pub use chain::Chain;
pub use config::{ConfigError, RunnerConfig};
pub use error::{ErrorRecord, ErrorRecordBuilder, ErrorReport, FieldPath, Segment};
pub use filter::{Filter, FilterExt, FilterResult, pipe};
pub use runner::Runner;
pub use value::{Kind, Value};
