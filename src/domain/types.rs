//! Shared domain types.
//!
//! These mirror the JSON the conversion service emits. Field names follow the
//! wire format (camelCase) via serde renames so golden files round-trip without
//! any mapping layer.

use serde::{Deserialize, Deserializer, Serialize};

/// One observation within a bucket.
///
/// Every field is a string on the wire, including `value`; the service keeps
/// the formatting of the source file and we compare it verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeSeriesValue {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(deserialize_with = "null_as_default")]
    pub month: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quarter: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_dataset: String,
}

/// Series metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Description {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Four-character series identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub cdid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pre_unit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sample_size: i64,
}

/// One converted time series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeSeriesRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub years: Vec<TimeSeriesValue>,
    #[serde(deserialize_with = "null_as_default")]
    pub quarters: Vec<TimeSeriesValue>,
    #[serde(deserialize_with = "null_as_default")]
    pub months: Vec<TimeSeriesValue>,
    /// Originating dataset names, in wire order.
    #[serde(deserialize_with = "null_as_default")]
    pub source_datasets: Vec<String>,
    /// Opaque passthrough; the typed comparison ignores it.
    pub section: serde_json::Value,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    pub description: Description,
}

impl TimeSeriesRecord {
    pub fn bucket(&self, bucket: Bucket) -> &[TimeSeriesValue] {
        match bucket {
            Bucket::Years => &self.years,
            Bucket::Months => &self.months,
            Bucket::Quarters => &self.quarters,
        }
    }
}

/// Time-granularity bucket of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Years,
    Months,
    Quarters,
}

impl Bucket {
    /// Comparison order used by the comparator.
    pub const ALL: [Bucket; 3] = [Bucket::Years, Bucket::Months, Bucket::Quarters];

    pub fn field_name(self) -> &'static str {
        match self {
            Bucket::Years => "years",
            Bucket::Months => "months",
            Bucket::Quarters => "quarters",
        }
    }
}

/// Decode `null` as the type's default, matching how the service's clients
/// treat absent strings and lists.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
