//! Filesystem helpers.
//!
//! - fixture layout + input/golden reads (`fixtures`)
//! - baseline writes (`baseline`)

pub mod baseline;
pub mod fixtures;

pub use baseline::*;
pub use fixtures::*;
