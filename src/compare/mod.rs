//! Positional comparison of converted records against a golden file.
//!
//! Records, and values within each bucket, must line up by index. There is no
//! out-of-order matching: a dropped observation shows up as a change at every
//! following position, which is what we want when the service regresses.
//!
//! Order of checks per record: `description`, `type`, then `years`, `months`,
//! `quarters` (length first, then each position). Strict mode skips the typed
//! shape altogether and diffs each record as raw JSON, so `sourceDatasets`,
//! `section` and fields the typed shape does not know about all count.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Bucket, TimeSeriesRecord};
use crate::report::{self, Difference};

/// Which part of a record disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Record count differs; no positional comparison was attempted.
    Length,
    Description,
    Type,
    /// Bucket length differs.
    BucketLength(Bucket),
    /// Observation at a position differs.
    BucketValue(Bucket),
    /// Strict mode: anything in the raw record.
    Record,
}

/// Location and evidence for the first (or each) mismatch found.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Record index; for `Field::Length` the first index present on one side only.
    pub index: usize,
    pub field: Field,
    /// Position within the bucket for `Field::BucketValue`.
    pub sub_index: Option<usize>,
    pub diffs: Vec<Difference>,
    /// Two-space pretty JSON of the actual value.
    pub actual: String,
    /// Two-space pretty JSON of the expected value.
    pub expected: String,
}

impl Mismatch {
    /// Path of the mismatching node, e.g. `timeseries[0].years[0]`.
    pub fn location(&self) -> String {
        match self.field {
            Field::Length | Field::Record => format!("timeseries[{}]", self.index),
            Field::Description => format!("timeseries[{}].description", self.index),
            Field::Type => format!("timeseries[{}].type", self.index),
            Field::BucketLength(bucket) => {
                format!("timeseries[{}].{}", self.index, bucket.field_name())
            }
            Field::BucketValue(bucket) => format!(
                "timeseries[{}].{}[{}]",
                self.index,
                bucket.field_name(),
                self.sub_index.unwrap_or_default()
            ),
        }
    }

    /// Annotated per-path diff lines.
    pub fn report(&self) -> String {
        // Length diffs are taken over the lengths themselves, not a subtree.
        let prefix = match self.field {
            Field::Length => "timeseries.len()".to_string(),
            Field::BucketLength(_) => format!("{}.len()", self.location()),
            _ => self.location(),
        };
        report::render_diff(&prefix, &self.diffs)
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headline = match self.field {
            Field::Length => "record count mismatch",
            Field::BucketLength(_) => "bucket length mismatch",
            _ => "values do not match",
        };
        writeln!(f, "{headline} at {}", self.location())?;
        write!(f, "{}", self.report())?;
        writeln!(f, "Expected: {}", self.expected)?;
        write!(f, "Actual: {}", self.actual)
    }
}

/// Return the first mismatch, or `None` when actual matches expected.
pub fn first_mismatch(
    actual: &[TimeSeriesRecord],
    expected: &[TimeSeriesRecord],
) -> Option<Mismatch> {
    if let Some(m) = length_mismatch(actual.len(), expected.len()) {
        return Some(m);
    }
    actual
        .iter()
        .zip(expected)
        .enumerate()
        .find_map(|(index, (a, e))| record_mismatches(index, a, e, true).into_iter().next())
}

/// Return every mismatch, at most one per field/bucket position.
///
/// A record count mismatch is still terminal: it is the only entry returned.
pub fn all_mismatches(actual: &[TimeSeriesRecord], expected: &[TimeSeriesRecord]) -> Vec<Mismatch> {
    if let Some(m) = length_mismatch(actual.len(), expected.len()) {
        return vec![m];
    }
    actual
        .iter()
        .zip(expected)
        .enumerate()
        .flat_map(|(index, (a, e))| record_mismatches(index, a, e, false))
        .collect()
}

/// Strict mode: compare records as untyped JSON.
///
/// Nothing is defaulted or dropped: an unknown field or a `null` standing in
/// for `""` counts as a difference. Object key order does not.
pub fn first_raw_mismatch(actual: &[Value], expected: &[Value]) -> Option<Mismatch> {
    if let Some(m) = length_mismatch(actual.len(), expected.len()) {
        return Some(m);
    }
    actual
        .iter()
        .zip(expected)
        .enumerate()
        .find_map(|(index, (a, e))| raw_record_mismatch(index, a, e))
}

/// Strict mode, one mismatch per differing record.
pub fn all_raw_mismatches(actual: &[Value], expected: &[Value]) -> Vec<Mismatch> {
    if let Some(m) = length_mismatch(actual.len(), expected.len()) {
        return vec![m];
    }
    actual
        .iter()
        .zip(expected)
        .enumerate()
        .filter_map(|(index, (a, e))| raw_record_mismatch(index, a, e))
        .collect()
}

fn length_mismatch(actual: usize, expected: usize) -> Option<Mismatch> {
    if actual == expected {
        return None;
    }
    Some(count_mismatch(actual.min(expected), Field::Length, actual, expected))
}

fn raw_record_mismatch(index: usize, actual: &Value, expected: &Value) -> Option<Mismatch> {
    if actual == expected {
        return None;
    }
    Some(Mismatch {
        index,
        field: Field::Record,
        sub_index: None,
        diffs: report::diff(expected, actual),
        actual: report::pretty(actual),
        expected: report::pretty(expected),
    })
}

fn record_mismatches(
    index: usize,
    actual: &TimeSeriesRecord,
    expected: &TimeSeriesRecord,
    stop_at_first: bool,
) -> Vec<Mismatch> {
    let mut out = Vec::new();

    if actual.description != expected.description {
        out.push(value_mismatch(
            index,
            Field::Description,
            None,
            &actual.description,
            &expected.description,
        ));
        if stop_at_first {
            return out;
        }
    }

    if actual.kind != expected.kind {
        out.push(value_mismatch(index, Field::Type, None, &actual.kind, &expected.kind));
        if stop_at_first {
            return out;
        }
    }

    for bucket in Bucket::ALL {
        let a = actual.bucket(bucket);
        let e = expected.bucket(bucket);
        if a.len() != e.len() {
            out.push(count_mismatch(index, Field::BucketLength(bucket), a.len(), e.len()));
            if stop_at_first {
                return out;
            }
            continue;
        }
        for (sub_index, (av, ev)) in a.iter().zip(e).enumerate() {
            if av != ev {
                out.push(value_mismatch(
                    index,
                    Field::BucketValue(bucket),
                    Some(sub_index),
                    av,
                    ev,
                ));
                if stop_at_first {
                    return out;
                }
            }
        }
    }

    out
}

fn count_mismatch(index: usize, field: Field, actual: usize, expected: usize) -> Mismatch {
    let (a, e) = (Value::from(actual), Value::from(expected));
    Mismatch {
        index,
        field,
        sub_index: None,
        diffs: report::diff(&e, &a),
        actual: actual.to_string(),
        expected: expected.to_string(),
    }
}

/// Build the diagnostic for two values already known to differ.
///
/// The mismatch is always returned: a side that cannot be turned into JSON is
/// shown as a placeholder string rather than losing the failure.
fn value_mismatch<T: Serialize + ?Sized>(
    index: usize,
    field: Field,
    sub_index: Option<usize>,
    actual: &T,
    expected: &T,
) -> Mismatch {
    let a = to_tree(actual);
    let e = to_tree(expected);
    Mismatch {
        index,
        field,
        sub_index,
        diffs: report::diff(&e, &a),
        actual: report::pretty(&a),
        expected: report::pretty(&e),
    }
}

fn to_tree<T: Serialize + ?Sized>(value: &T) -> Value {
    report::normalize(value).unwrap_or_else(|e| Value::String(format!("<unserializable: {e}>")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Description, TimeSeriesValue};
    use crate::report::DiffKind;
    use serde_json::json;

    fn year(date: &str, value: &str) -> TimeSeriesValue {
        TimeSeriesValue {
            date: date.to_string(),
            value: value.to_string(),
            year: date.to_string(),
            month: String::new(),
            quarter: String::new(),
            source_dataset: "ott".to_string(),
        }
    }

    fn record(years: Vec<TimeSeriesValue>) -> TimeSeriesRecord {
        TimeSeriesRecord {
            years,
            source_datasets: vec!["ott".to_string()],
            kind: "timeseries".to_string(),
            description: Description {
                title: "Output".to_string(),
                cdid: "ABMI".to_string(),
                ..Description::default()
            },
            ..TimeSeriesRecord::default()
        }
    }

    #[test]
    fn identical_records_match() {
        let expected = vec![record(vec![year("2000", "12.3"), year("2001", "13.0")])];
        let actual = expected.clone();
        assert_eq!(first_mismatch(&actual, &expected), None);
        assert!(all_mismatches(&actual, &expected).is_empty());
    }

    #[test]
    fn single_value_change_cites_bucket_and_index() {
        let expected = vec![record(vec![year("2000", "12.3")])];
        let actual = vec![record(vec![year("2000", "12.4")])];

        let m = first_mismatch(&actual, &expected).unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.field, Field::BucketValue(Bucket::Years));
        assert_eq!(m.sub_index, Some(0));
        assert_eq!(m.location(), "timeseries[0].years[0]");
        assert_eq!(m.diffs.len(), 1);
        assert_eq!(m.diffs[0].path.to_string(), ".value");
        assert_eq!(
            m.diffs[0].kind,
            DiffKind::Changed {
                expected: json!("12.3"),
                actual: json!("12.4")
            }
        );

        let text = m.to_string();
        assert!(text.contains("timeseries[0].years[0]"));
        assert!(text.contains("~ timeseries[0].years[0].value: \"12.3\" -> \"12.4\""));
        assert!(text.contains("\"sourceDataset\": \"ott\""));
    }

    #[test]
    fn record_count_mismatch_fails_before_positional_checks() {
        let expected = vec![record(vec![year("2000", "1")]), record(vec![])];
        // Record 0 also differs; the count must still be what is reported.
        let actual = vec![record(vec![year("2000", "2")])];

        let m = first_mismatch(&actual, &expected).unwrap();
        assert_eq!(m.field, Field::Length);
        assert_eq!(m.index, 1);
        assert_eq!(m.expected, "2");
        assert_eq!(m.actual, "1");
        assert_eq!(m.report(), "~ timeseries.len(): 2 -> 1\n");

        let all = all_mismatches(&actual, &expected);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].field, Field::Length);
    }

    #[test]
    fn bucket_length_mismatch_is_reported_before_values() {
        let expected = vec![record(vec![year("2000", "1"), year("2001", "2")])];
        let actual = vec![record(vec![year("2000", "9")])];

        let m = first_mismatch(&actual, &expected).unwrap();
        assert_eq!(m.field, Field::BucketLength(Bucket::Years));
        assert_eq!(m.location(), "timeseries[0].years");
        assert!(m.report().contains("~ timeseries[0].years.len(): 2 -> 1"));
    }

    #[test]
    fn description_is_checked_before_buckets() {
        let expected = vec![record(vec![year("2000", "1")])];
        let mut changed = record(vec![year("2000", "2")]);
        changed.description.unit = "£m".to_string();
        let actual = vec![changed];

        let m = first_mismatch(&actual, &expected).unwrap();
        assert_eq!(m.field, Field::Description);
        assert_eq!(m.diffs[0].path.to_string(), ".unit");

        let all = all_mismatches(&actual, &expected);
        let fields: Vec<Field> = all.iter().map(|m| m.field).collect();
        assert_eq!(fields, vec![Field::Description, Field::BucketValue(Bucket::Years)]);
    }

    #[test]
    fn type_and_month_mismatches_use_their_own_names() {
        let mut e = record(vec![]);
        e.months = vec![year("2000 JAN", "1")];
        let mut a = e.clone();
        a.kind = "other".to_string();
        a.months[0].month = "January".to_string();

        let all = all_mismatches(&[a], &[e]);
        let locations: Vec<String> = all.iter().map(Mismatch::location).collect();
        assert_eq!(locations, vec!["timeseries[0].type", "timeseries[0].months[0]"]);
    }

    #[test]
    fn typed_comparison_ignores_passthrough_fields() {
        let expected = vec![record(vec![])];
        let mut changed = expected[0].clone();
        changed.section = json!({"markdown": ["x"]});
        changed.source_datasets.push("bb".to_string());
        assert_eq!(first_mismatch(&[changed], &expected), None);
    }

    #[test]
    fn raw_comparison_sees_unknown_fields_and_nulls() {
        let expected = vec![json!({
            "type": "timeseries",
            "uri": "/economy/ott/abmi",
            "description": {"cdid": "ABMI", "unit": ""},
            "years": []
        })];
        let actual = vec![json!({
            "type": "timeseries",
            "uri": "/economy/ott/abmi2",
            "description": {"cdid": "ABMI", "unit": null},
            "years": []
        })];

        let m = first_raw_mismatch(&actual, &expected).unwrap();
        assert_eq!(m.field, Field::Record);
        assert_eq!(m.location(), "timeseries[0]");
        let paths: Vec<String> = m.diffs.iter().map(|d| d.path.to_string()).collect();
        assert_eq!(paths, vec![".description.unit", ".uri"]);
        assert_eq!(
            m.diffs[0].kind,
            DiffKind::Changed {
                expected: json!(""),
                actual: Value::Null
            }
        );
        assert!(
            m.report()
                .contains("~ timeseries[0].uri: \"/economy/ott/abmi\" -> \"/economy/ott/abmi2\"")
        );
    }

    #[test]
    fn raw_comparison_checks_length_then_every_record() {
        let one = json!({"type": "timeseries"});
        let two = json!({"type": "other"});

        let m = first_raw_mismatch(&[one.clone()], &[one.clone(), two.clone()]).unwrap();
        assert_eq!(m.field, Field::Length);
        assert_eq!(m.index, 1);

        let same = [one.clone(), two.clone()];
        assert!(all_raw_mismatches(&same, &same).is_empty());
        let all = all_raw_mismatches(&[two.clone(), one.clone()], &[one, two]);
        let locations: Vec<String> = all.iter().map(Mismatch::location).collect();
        assert_eq!(locations, vec!["timeseries[0]", "timeseries[1]"]);
    }

    #[test]
    fn value_mismatch_always_yields_a_diagnostic() {
        use std::collections::HashMap;
        // Non-string map keys cannot become JSON objects.
        let a: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let e: HashMap<(u8, u8), u8> = HashMap::new();
        let m = value_mismatch(0, Field::Record, None, &a, &e);
        assert!(m.actual.contains("unserializable"));
        assert!(!m.diffs.is_empty());
    }
}
