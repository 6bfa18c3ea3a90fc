//! Structural combinators
//!
//! Each combinator is a [`Filter`](crate::Filter) that delegates parts of a
//! value to child chains and attributes their errors to the key or index the
//! part was found under.
//!
//! - [`Mapper`]: one chain per declared key of a mapping, plus a key policy.
//! - [`Repeater`]: one chain for every element of a sequence or mapping.
//! - [`Switch`]: one of several chains, picked from a key derived from the
//!   value.

mod mapper;
mod repeater;
mod switch;

pub use mapper::{KeyPolicy, Mapper, MapperBuilder};
pub use repeater::Repeater;
pub use switch::{Getter, Switch, SwitchBuilder};

/// Template for keys that are not allowed, shared by Mapper and Repeater.
pub(crate) const UNEXPECTED_TEMPLATE: &str = "Unexpected key \"{actual_key}\".";
