//! # sift-registry
//!
//! A name-keyed table of filter factories, populated once at startup from
//! injected [`FilterProvider`]s and read-only afterwards.
//!
//! The core engine never depends on this crate: it only ever sees the
//! [`Chain`](sift_filter::Chain)s a factory produces.
//!
//! ## Core Types
//!
//! - [`FilterProvider`] - a source of factories (the built-in catalog, a
//!   third-party crate, an application module)
//! - [`RegistryBuilder`] - collects factories; later registrations replace
//!   earlier ones
//! - [`FilterRegistry`] - the frozen table; builds chains by name or from a
//!   JSON chain description
//! - [`Builtins`] - provider for the `sift-filter` reference catalog
//! - [`RegistryError`] - error type for lookups and construction

mod builtin;
mod error;
mod registry;

pub use builtin::Builtins;
pub use error::RegistryError;
pub use registry::{FilterFactory, FilterProvider, FilterRegistry, RegistryBuilder};
