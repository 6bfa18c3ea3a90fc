//! Prelude module for convenient imports.
//!
//! Provides a single `use sift_filter::prelude::*;` import that brings in
//! the filter traits, the error model, the runner, the combinators, and the
//! reference catalog.
//!
//! # Examples
//!
//! ```rust
//! use sift_filter::prelude::*;
//!
//! let tags = Repeater::new(Required.pipe(MaxLength::new(20)));
//! let post = Mapper::builder()
//!     .field("title", Required.pipe(MinLength::new(1)))
//!     .field("tags", tags)
//!     .build()
//!     .unwrap();
//! # let _ = post;
//! ```

// ============================================================================
// CORE: Traits, chain, runner, errors
// ============================================================================

pub use crate::chain::Chain;
pub use crate::config::{ConfigError, RunnerConfig};
pub use crate::error::{ErrorRecord, ErrorRecordBuilder, ErrorReport, FieldPath, Segment};
pub use crate::filter::{Filter, FilterExt, FilterResult, pipe};
pub use crate::runner::Runner;
pub use crate::value::{Kind, Value};

// ============================================================================
// COMBINATORS
// ============================================================================

pub use crate::combinators::{KeyPolicy, Mapper, Repeater, Switch};

// ============================================================================
// FILTERS
// ============================================================================

pub use crate::filters::{Choice, Int, Max, MaxLength, Min, MinLength, NoOp, NotEmpty, Required, Type};
