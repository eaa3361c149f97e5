#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grouping and aggregation queries over crime records.
//!
//! Every function is a read-only query over a borrowed record slice. None
//! of them fail: empty input produces empty maps or the documented
//! sentinel values.

pub mod distinct;
pub mod trend;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crime_atlas_analytics_models::{CategoryCounts, TopLocation};
use crime_atlas_crime_models::CrimeRecord;

pub use trend::monthly_trend;

/// Counts records per normalized severity bucket.
///
/// Labels are trimmed and lowercased; records without a severity are
/// counted under `"unknown"`, so the counts always sum to `records.len()`.
#[must_use]
pub fn count_by_severity(records: &[CrimeRecord]) -> CategoryCounts {
    let mut counts = CategoryCounts::new();
    for record in records {
        *counts.entry(record.severity_key()).or_default() += 1;
    }
    counts
}

/// Counts records per exact crime type. Records without a crime type are
/// not counted.
#[must_use]
pub fn count_by_type(records: &[CrimeRecord]) -> CategoryCounts {
    let mut counts = CategoryCounts::new();
    for crime_type in records.iter().filter_map(|r| r.crime_type.as_deref()) {
        *counts.entry(crime_type.to_string()).or_default() += 1;
    }
    counts
}

/// Returns the location with the most records.
///
/// Ties go to the location that appears first in `records`. Returns
/// [`TopLocation::none`] when no record has a location.
#[must_use]
pub fn top_location(records: &[CrimeRecord]) -> TopLocation {
    // location -> (count, first index)
    let mut counts: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for (index, location) in records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.location_description.as_deref().map(|l| (i, l)))
    {
        counts.entry(location).or_insert((0, index)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map_or_else(TopLocation::none, |(location, (count, _))| TopLocation {
            location: location.to_string(),
            count,
        })
}

/// Returns the `n` most recent records, newest first.
///
/// Records without a date sort after every dated record; records with
/// equal dates keep their input order.
#[must_use]
pub fn recent_n(records: &[CrimeRecord], n: usize) -> Vec<CrimeRecord> {
    let mut sorted: Vec<&CrimeRecord> = records.iter().collect();
    sorted.sort_by(|a, b| match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted.into_iter().take(n).cloned().collect()
}
