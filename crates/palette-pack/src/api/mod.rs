//! Public API for the palette-pack crate.
//!
//! This module provides the high-level API: the [`Reformer`] builder, its
//! [`Reformed`] result and the unified [`ReformError`] type.

mod builder;
mod error;

pub use builder::{Reformed, Reformer};
pub use error::ReformError;
