//! Distinct value listings for filter controls.

use std::collections::BTreeSet;

use crime_atlas_analytics_models::FilterOptions;
use crime_atlas_crime_models::CrimeRecord;

fn distinct_in_order<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .flatten()
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Distinct location descriptions in first-appearance order.
#[must_use]
pub fn distinct_locations(records: &[CrimeRecord]) -> Vec<String> {
    distinct_in_order(records.iter().map(|r| r.location_description.as_deref()))
}

/// Distinct crime types in first-appearance order.
#[must_use]
pub fn distinct_crime_types(records: &[CrimeRecord]) -> Vec<String> {
    distinct_in_order(records.iter().map(|r| r.crime_type.as_deref()))
}

/// Distinct normalized severity labels, sorted. Absent severities are
/// skipped.
fn severity_labels(records: &[CrimeRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.severity.as_deref().is_some_and(|s| !s.trim().is_empty()))
        .map(CrimeRecord::severity_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct locations, crime types, and severities.
#[must_use]
pub fn filter_options(records: &[CrimeRecord]) -> FilterOptions {
    let sorted = |values: Vec<String>| {
        let mut values = values;
        values.sort();
        values
    };

    FilterOptions {
        locations: sorted(distinct_locations(records)),
        crime_types: sorted(distinct_crime_types(records)),
        severities: severity_labels(records),
    }
}
