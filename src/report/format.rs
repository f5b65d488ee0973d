//! Text rendering for diffs and failure reports.
//!
//! Formatting lives here so the diff walk and the comparator stay free of
//! presentation concerns.

use serde_json::Value;

use super::diff::{DiffKind, Difference};

/// Longest compact JSON excerpt printed on a single diff line.
const MAX_INLINE: usize = 120;

/// Render differences as an annotated report, one line per difference.
///
/// `prefix` is prepended to every path, e.g. `timeseries[0].years[3]`.
///
/// ```text
/// ~ timeseries[0].years[0].value: "12.3" -> "12.4"
/// + timeseries[0].years[0].note: "x"
/// - timeseries[0].years[0].month: ""
/// ```
pub fn render_diff(prefix: &str, diffs: &[Difference]) -> String {
    let mut out = String::new();
    for d in diffs {
        let path = format!("{prefix}{}", d.path);
        let path = if path.is_empty() { "<root>".to_string() } else { path };
        let line = match &d.kind {
            DiffKind::Added(actual) => format!("+ {path}: {}", inline(actual)),
            DiffKind::Removed(expected) => format!("- {path}: {}", inline(expected)),
            DiffKind::Changed { expected, actual } => {
                format!("~ {path}: {} -> {}", inline(expected), inline(actual))
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Pretty-print a JSON value with the two-space indent used by golden files.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn inline(value: &Value) -> String {
    let s = value.to_string();
    if s.chars().count() <= MAX_INLINE {
        return s;
    }
    let mut cut: String = s.chars().take(MAX_INLINE).collect();
    cut.push_str("...");
    cut
}
