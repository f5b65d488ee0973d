//! Reporting utilities: structural JSON diff and its text rendering.

pub mod diff;
pub mod format;

pub use diff::{DiffKind, Difference, JsonPath, PathSegment, diff, normalize};
pub use format::{pretty, render_diff};
