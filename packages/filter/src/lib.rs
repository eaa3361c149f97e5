#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Predicate filtering of crime records.
//!
//! A [`FilterCriteria`] holds up to three predicates that are ANDed
//! together. Each predicate only looks at its own field, so the order in
//! which they are applied never changes the result.

use crime_atlas_crime_models::{CrimeRecord, FilterCriteria};

/// A single predicate over one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate<'a> {
    /// Case-insensitive substring of `location_description`.
    Location(&'a str),
    /// Exact equality on `crime_type`.
    CrimeType(&'a str),
    /// Case-insensitive equality on `severity`.
    Severity(&'a str),
}

impl Predicate<'_> {
    /// Returns `true` if `record` satisfies this predicate. An absent field
    /// never matches.
    #[must_use]
    pub fn matches(&self, record: &CrimeRecord) -> bool {
        match *self {
            Self::Location(needle) => record
                .location_description
                .as_deref()
                .is_some_and(|location| {
                    location.to_lowercase().contains(&needle.to_lowercase())
                }),
            Self::CrimeType(crime_type) => record.crime_type.as_deref() == Some(crime_type),
            Self::Severity(severity) => record
                .severity
                .as_deref()
                .is_some_and(|s| s.trim().to_lowercase() == severity.to_lowercase()),
        }
    }
}

/// Returns the active predicates of `criteria`.
#[must_use]
pub fn predicates(criteria: &FilterCriteria) -> Vec<Predicate<'_>> {
    [
        criteria.location().map(Predicate::Location),
        criteria.crime_type().map(Predicate::CrimeType),
        criteria.severity().map(Predicate::Severity),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Returns `true` if `record` satisfies every active predicate.
#[must_use]
pub fn matches(record: &CrimeRecord, criteria: &FilterCriteria) -> bool {
    predicates(criteria).iter().all(|p| p.matches(record))
}

/// Returns the records satisfying `criteria`, in input order. Empty
/// criteria return every record unchanged.
#[must_use]
pub fn apply(records: Vec<CrimeRecord>, criteria: &FilterCriteria) -> Vec<CrimeRecord> {
    if criteria.is_empty() {
        return records;
    }

    let predicates = predicates(criteria);
    let before = records.len();
    let filtered: Vec<CrimeRecord> = records
        .into_iter()
        .filter(|record| predicates.iter().all(|p| p.matches(record)))
        .collect();

    log::debug!(
        "Filter {criteria:?} kept {} of {before} records",
        filtered.len()
    );

    filtered
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crime_atlas_crime_models::Coordinate;

    use super::*;

    fn record(id: u32, location: Option<&str>, crime_type: &str, severity: &str) -> CrimeRecord {
        CrimeRecord {
            id: id.to_string(),
            location_description: location.map(str::to_string),
            crime_type: Some(crime_type.to_string()),
            severity: Some(severity.to_string()),
            date: NaiveDate::from_ymd_opt(2024, 1, id.clamp(1, 28)),
            coordinate: Some(Coordinate::new(16.5, 80.6)),
        }
    }

    fn dataset() -> Vec<CrimeRecord> {
        vec![
            record(1, Some("Benz Circle, Vijayawada"), "Theft", "High"),
            record(2, Some("Benz Circle, Vijayawada"), "Theft", "low"),
            record(3, Some("Benz Circle, Vijayawada"), "Assault", "high"),
            record(4, Some("Guntur Bus Stand"), "Theft", "high"),
            record(5, Some("Visakhapatnam Beach Road"), "Robbery", "medium"),
            record(6, Some("Tirupati"), "theft", "high"),
            record(7, None, "Theft", "high"),
            record(8, Some("Nellore"), "Fraud", "low"),
            record(9, Some("Kakinada Port"), "Theft", "medium"),
            record(10, Some("Rajahmundry"), "Burglary", "High"),
        ]
    }

    fn ids(records: &[CrimeRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn combined_criteria_select_single_record() {
        let criteria = FilterCriteria::new("vijayawada", "Theft", "high");
        let filtered = apply(dataset(), &criteria);
        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn empty_criteria_is_identity() {
        let filtered = apply(dataset(), &FilterCriteria::all());
        assert_eq!(filtered, dataset());
    }

    #[test]
    fn location_match_is_case_insensitive_substring() {
        let filtered = apply(dataset(), &FilterCriteria::new("BENZ circle", "", ""));
        assert_eq!(ids(&filtered), vec!["1", "2", "3"]);
    }

    #[test]
    fn absent_location_never_matches_non_empty_filter() {
        let filtered = apply(dataset(), &FilterCriteria::new("a", "", ""));
        assert!(!ids(&filtered).contains(&"7"));
    }

    #[test]
    fn crime_type_match_is_exact() {
        let filtered = apply(dataset(), &FilterCriteria::new("", "Theft", ""));
        assert_eq!(ids(&filtered), vec!["1", "2", "4", "7", "9"]);
    }

    #[test]
    fn crime_type_whitespace_is_not_normalized() {
        let padded = record(11, Some("Ongole"), " Theft ", "low");
        assert!(!matches(&padded, &FilterCriteria::new("", "Theft", "")));
        assert!(matches(&padded, &FilterCriteria::new("", " Theft ", "")));
        assert!(matches(&padded, &FilterCriteria::all()));
    }

    #[test]
    fn severity_match_is_case_insensitive() {
        let filtered = apply(dataset(), &FilterCriteria::new("", "", "HIGH"));
        assert_eq!(ids(&filtered), vec!["1", "3", "4", "6", "7", "10"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let filtered = apply(dataset(), &FilterCriteria::new("Chennai", "", ""));
        assert!(filtered.is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let combos = [
            FilterCriteria::new("vijayawada", "", ""),
            FilterCriteria::new("", "Theft", "high"),
            FilterCriteria::new("a", "Theft", "medium"),
            FilterCriteria::new("", "", ""),
        ];
        for criteria in &combos {
            let once = apply(dataset(), criteria);
            let twice = apply(once.clone(), criteria);
            assert_eq!(once, twice, "not idempotent for {criteria:?}");
        }
    }

    #[test]
    fn predicate_order_does_not_matter() {
        let criteria = FilterCriteria::new("a", "Theft", "high");
        let predicates = predicates(&criteria);
        assert_eq!(predicates.len(), 3);

        let forward: Vec<CrimeRecord> = dataset()
            .into_iter()
            .filter(|r| predicates.iter().all(|p| p.matches(r)))
            .collect();
        let reverse: Vec<CrimeRecord> = dataset()
            .into_iter()
            .filter(|r| predicates.iter().rev().all(|p| p.matches(r)))
            .collect();
        let staged = predicates.iter().rev().fold(dataset(), |records, p| {
            records.into_iter().filter(|r| p.matches(r)).collect()
        });

        assert_eq!(forward, reverse);
        assert_eq!(forward, staged);
        assert_eq!(forward, apply(dataset(), &criteria));
    }

    #[test]
    fn filtered_records_are_unchanged_subset() {
        let original = dataset();
        let filtered = apply(original.clone(), &FilterCriteria::new("", "Theft", ""));
        for record in &filtered {
            assert!(original.contains(record));
        }
    }
}
