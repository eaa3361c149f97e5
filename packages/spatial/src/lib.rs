#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Approximate proximity search over record coordinates.
//!
//! Distance is the planar Euclidean distance between two points measured in
//! degrees, scaled by [`KM_PER_DEGREE`]. This ignores the earth's curvature
//! and the shrinking of longitude degrees away from the equator; it is an
//! intentional simplification and not a geodesic distance.

use crime_atlas_crime_models::{Coordinate, CrimeRecord};

/// Approximate kilometers per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Maximum number of records returned by [`nearby`].
pub const MAX_RESULTS: usize = 20;

/// Slack added to the radius when comparing distances, so a zero radius
/// still matches points that are equal up to floating-point noise.
pub const DISTANCE_TOLERANCE_KM: f64 = 1e-9;

/// Approximate distance in kilometers between two coordinates.
#[must_use]
pub fn approximate_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = a.latitude - b.latitude;
    let dlng = a.longitude - b.longitude;
    dlat.hypot(dlng) * KM_PER_DEGREE
}

/// Returns up to [`MAX_RESULTS`] records within `radius_km` of
/// (`lat`, `lng`), in input order. Records without a coordinate never
/// match. A negative or non-finite radius matches nothing.
#[must_use]
pub fn nearby(records: &[CrimeRecord], lat: f64, lng: f64, radius_km: f64) -> Vec<CrimeRecord> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        log::warn!("Rejecting proximity search with invalid radius {radius_km}");
        return Vec::new();
    }

    let center = Coordinate::new(lat, lng);
    let results: Vec<CrimeRecord> = records
        .iter()
        .filter(|record| {
            record.coordinate.is_some_and(|coordinate| {
                approximate_distance_km(center, coordinate) <= radius_km + DISTANCE_TOLERANCE_KM
            })
        })
        .take(MAX_RESULTS)
        .cloned()
        .collect();

    log::debug!(
        "Found {} records within {radius_km} km of ({lat}, {lng})",
        results.len()
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: &str, lat: f64, lng: f64) -> CrimeRecord {
        CrimeRecord {
            id: id.to_string(),
            location_description: None,
            crime_type: None,
            severity: None,
            date: None,
            coordinate: Some(Coordinate::new(lat, lng)),
        }
    }

    fn ids(records: &[CrimeRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn distance_is_scaled_degree_distance() {
        let d = approximate_distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(3.0, 4.0));
        assert!((d - 555.0).abs() < 1e-9);
    }

    #[test]
    fn zero_radius_matches_only_exact_point() {
        let records = vec![
            at("exact", 16.5062, 80.648),
            at("close", 16.5063, 80.648),
            at("also-exact", 16.5062, 80.648),
        ];
        let found = nearby(&records, 16.5062, 80.648, 0.0);
        assert_eq!(ids(&found), vec!["exact", "also-exact"]);
    }

    #[test]
    fn radius_includes_points_within_range_in_input_order() {
        // 0.04 degrees ~ 4.44 km, 0.1 degrees ~ 11.1 km
        let records = vec![
            at("far", 16.6, 80.648),
            at("near", 16.5462, 80.648),
            at("center", 16.5062, 80.648),
        ];
        let found = nearby(&records, 16.5062, 80.648, 5.0);
        assert_eq!(ids(&found), vec!["near", "center"]);
    }

    #[test]
    fn records_without_coordinates_are_skipped() {
        let mut record = at("none", 0.0, 0.0);
        record.coordinate = None;
        assert!(nearby(&[record], 0.0, 0.0, 1000.0).is_empty());
    }

    #[test]
    fn results_are_capped() {
        let records: Vec<CrimeRecord> = (0..30).map(|i| at(&i.to_string(), 15.0, 79.0)).collect();
        let found = nearby(&records, 15.0, 79.0, 1.0);
        assert_eq!(found.len(), MAX_RESULTS);
        assert_eq!(found[0].id, "0");
        assert_eq!(found[19].id, "19");
    }

    #[test]
    fn invalid_radius_matches_nothing() {
        let records = vec![at("a", 15.0, 79.0)];
        assert!(nearby(&records, 15.0, 79.0, -1.0).is_empty());
        assert!(nearby(&records, 15.0, 79.0, f64::NAN).is_empty());
    }
}
