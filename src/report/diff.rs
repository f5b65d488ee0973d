//! Structural JSON diff.
//!
//! `diff` walks two `serde_json::Value` trees side by side and returns every
//! point where they disagree, tagged with the path to it. It knows nothing
//! about records or buckets, which keeps it testable on synthetic trees.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// One step into a JSON tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node relative to the diffed roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiffKind {
    /// Present in actual only.
    Added(Value),
    /// Present in expected only.
    Removed(Value),
    Changed { expected: Value, actual: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub path: JsonPath,
    pub kind: DiffKind,
}

/// Serialize a value into the tree form `diff` works on.
///
/// Objects come out with sorted keys, so the diff order is stable regardless
/// of field declaration order.
pub fn normalize<T: Serialize + ?Sized>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

/// Compute the ordered list of differences between `expected` and `actual`.
///
/// Object keys are visited in sorted order and array positions in index order.
/// Arrays are compared positionally; surplus positions on either side are
/// reported individually as added or removed.
pub fn diff(expected: &Value, actual: &Value) -> Vec<Difference> {
    let mut out = Vec::new();
    diff_into(&JsonPath::root(), expected, actual, &mut out);
    out
}

fn diff_into(path: &JsonPath, expected: &Value, actual: &Value, out: &mut Vec<Difference>) {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => {
            let keys: BTreeSet<&String> = exp.keys().chain(act.keys()).collect();
            for key in keys {
                let child = path.child(PathSegment::Key(key.clone()));
                match (exp.get(key), act.get(key)) {
                    (Some(e), Some(a)) => diff_into(&child, e, a, out),
                    (Some(e), None) => out.push(Difference {
                        path: child,
                        kind: DiffKind::Removed(e.clone()),
                    }),
                    (None, Some(a)) => out.push(Difference {
                        path: child,
                        kind: DiffKind::Added(a.clone()),
                    }),
                    (None, None) => {}
                }
            }
        }
        (Value::Array(exp), Value::Array(act)) => {
            let shared = exp.len().min(act.len());
            for i in 0..shared {
                diff_into(&path.child(PathSegment::Index(i)), &exp[i], &act[i], out);
            }
            for (i, e) in exp.iter().enumerate().skip(shared) {
                out.push(Difference {
                    path: path.child(PathSegment::Index(i)),
                    kind: DiffKind::Removed(e.clone()),
                });
            }
            for (i, a) in act.iter().enumerate().skip(shared) {
                out.push(Difference {
                    path: path.child(PathSegment::Index(i)),
                    kind: DiffKind::Added(a.clone()),
                });
            }
        }
        _ => {
            if expected != actual {
                out.push(Difference {
                    path: path.clone(),
                    kind: DiffKind::Changed {
                        expected: expected.clone(),
                        actual: actual.clone(),
                    },
                });
            }
        }
    }
}
