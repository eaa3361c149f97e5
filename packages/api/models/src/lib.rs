#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Response types for crime-atlas boundary operations.
//!
//! Every operation returns an [`ApiResponse`]: the payload is always
//! well-formed, and `error` says whether it is a real result or a fallback
//! value substituted after a failure. These types are serialized to JSON
//! for whatever route layer sits in front of them.

use chrono::NaiveDate;
use crime_atlas_analytics_models::{CategoryCounts, NO_LOCATION, TopLocation};
use crime_atlas_crime_models::CrimeRecord;
use serde::{Deserialize, Serialize};

/// Envelope pairing a payload with an optional failure description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// The result, or a fallback value when `error` is set.
    pub data: T,
    /// Why `data` is a fallback. `None` on success.
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful response.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    /// A fallback response carrying the failure text.
    #[must_use]
    pub fn fallback(data: T, error: impl std::fmt::Display) -> Self {
        Self {
            data,
            error: Some(error.to_string()),
        }
    }

    /// Returns `true` if no failure occurred.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A compact view of one incident for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSummary {
    /// Record identifier.
    pub id: String,
    /// Place name.
    pub location_description: Option<String>,
    /// Crime type.
    pub crime_type: Option<String>,
    /// Raw severity label.
    pub severity: Option<String>,
    /// Incident date.
    pub date: Option<NaiveDate>,
}

impl From<&CrimeRecord> for IncidentSummary {
    fn from(record: &CrimeRecord) -> Self {
        Self {
            id: record.id.clone(),
            location_description: record.location_description.clone(),
            crime_type: record.crime_type.clone(),
            severity: record.severity.clone(),
            date: record.date,
        }
    }
}

/// Dataset-wide summary statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeStatistics {
    /// Number of records.
    pub total_crimes: u64,
    /// Records per crime type.
    pub crime_by_type: CategoryCounts,
    /// Records per normalized severity.
    pub severity_counts: CategoryCounts,
    /// Most frequent location, or `"N/A"`.
    pub top_location: String,
    /// Records at [`Self::top_location`].
    pub top_location_count: u64,
    /// The most recent incidents, newest first.
    pub recent_crimes: Vec<IncidentSummary>,
}

impl CrimeStatistics {
    /// Assembles the statistics from their parts.
    #[must_use]
    pub fn new(
        total_crimes: u64,
        crime_by_type: CategoryCounts,
        severity_counts: CategoryCounts,
        top: TopLocation,
        recent_crimes: Vec<IncidentSummary>,
    ) -> Self {
        Self {
            total_crimes,
            crime_by_type,
            severity_counts,
            top_location: top.location,
            top_location_count: top.count,
            recent_crimes,
        }
    }
}

impl Default for CrimeStatistics {
    /// The zero-filled summary used when the dataset cannot be read.
    fn default() -> Self {
        Self {
            total_crimes: 0,
            crime_by_type: CategoryCounts::new(),
            severity_counts: CategoryCounts::new(),
            top_location: NO_LOCATION.to_string(),
            top_location_count: 0,
            recent_crimes: Vec::new(),
        }
    }
}

/// Result of a proximity search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResult {
    /// Human-readable summary, e.g. `"Found 3 crimes near (16.5, 80.6)"`.
    pub message: String,
    /// Matching records in dataset order.
    pub crimes: Vec<CrimeRecord>,
}

/// Result of exporting a filtered record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    /// Path of the written file, `None` if nothing was written.
    pub filename: Option<String>,
    /// Number of records written.
    pub count: u64,
}
