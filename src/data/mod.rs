//! Data sources.

pub mod brian;

pub use brian::*;
