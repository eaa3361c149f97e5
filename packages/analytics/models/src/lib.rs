#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types for crime statistics and trends.
//!
//! Category maps are [`BTreeMap`]s keyed by the category label. Categories
//! with no records are omitted rather than zero-filled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Location name reported when there is no data.
pub const NO_LOCATION: &str = "N/A";

/// Count of records per category label.
pub type CategoryCounts = BTreeMap<String, u64>;

/// The most frequent location and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLocation {
    /// Location name, or [`NO_LOCATION`].
    pub location: String,
    /// Number of records at that location.
    pub count: u64,
}

impl TopLocation {
    /// The `("N/A", 0)` sentinel returned for empty input.
    #[must_use]
    pub fn none() -> Self {
        Self {
            location: NO_LOCATION.to_string(),
            count: 0,
        }
    }
}

impl Default for TopLocation {
    fn default() -> Self {
        Self::none()
    }
}

/// Number of records of one crime type in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Records in that month.
    pub count: u64,
}

/// Monthly counts per crime type.
///
/// A type's series only contains the months in which it occurred; months
/// with no records of that type are absent, not zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// Crime type -> points in ascending month order.
    pub trend_data: BTreeMap<String, Vec<TrendPoint>>,
    /// Number of distinct months across all types.
    pub total_months: usize,
}

/// Distinct values for populating filter dropdowns, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Distinct location descriptions.
    pub locations: Vec<String>,
    /// Distinct crime types.
    pub crime_types: Vec<String>,
    /// Distinct severity labels, trimmed and lowercased.
    pub severities: Vec<String>,
}
