//! Domain types shared by the transport, comparator and capture flows.
//!
//! This module defines:
//!
//! - the converted series shape returned by the service (`TimeSeriesRecord`)
//! - its metadata block (`Description`) and observations (`TimeSeriesValue`)
//! - the three time-granularity buckets (`Bucket`)

pub mod types;

pub use types::*;
