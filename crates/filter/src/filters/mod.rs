//! Reference leaf filters
//!
//! A small catalog of capability-conforming units. Every filter here honors
//! the absent-value policy: `null` passes unchanged, except through
//! [`Required`] and [`NotEmpty`] configured with `allow_none(false)`.

mod number;
mod simple;

pub use number::{Int, Max, Min};
pub use simple::{Choice, MaxLength, MinLength, NoOp, NotEmpty, Required, Type};

/// Codes emitted by the catalog filters.
pub mod codes {
    pub use super::number::{NOT_FINITE, NOT_INT, NOT_NUMERIC, TOO_BIG, TOO_SMALL};
    pub use super::simple::{EMPTY, NOT_VALID_CHOICE, TOO_LONG, TOO_SHORT};
}
