#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime incident record, severity, and filter criteria types.
//!
//! This crate defines the fixed-shape [`CrimeRecord`] shared by every
//! component of the crime-atlas system. Columns that may be missing or
//! unparseable in the source dataset are modeled as [`Option`] so that
//! "absent" is never confused with an empty string or a zero coordinate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel filter value meaning "do not filter on this field".
pub const ALL_SENTINEL: &str = "All";

/// Bucket name used when a record has no severity value.
pub const UNKNOWN_SEVERITY: &str = "unknown";

/// Marker color for severities outside [`SeverityLevel`].
pub const DEFAULT_MARKER_COLOR: &str = "blue";

/// Recognized severity levels.
///
/// Parsing is ASCII case-insensitive, so `"HIGH"`, `"High"` and `"high"`
/// all map to [`SeverityLevel::High`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SeverityLevel {
    /// Minor incidents.
    Low,
    /// Moderate incidents.
    Medium,
    /// Serious incidents.
    High,
}

impl SeverityLevel {
    /// Returns the marker color for this severity level.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "orange",
            Self::High => "red",
        }
    }

    /// Parses a free-text severity label, ignoring surrounding whitespace
    /// and case. Returns `None` for unrecognized labels.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        label.trim().parse().ok()
    }
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude, -90 to 90.
    pub latitude: f64,
    /// Longitude, -180 to 180.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without validating its range.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both components are finite and inside the valid
    /// latitude/longitude ranges.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns `[latitude, longitude]`, the ordering Leaflet expects.
    #[must_use]
    pub const fn to_lat_lng(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// One crime incident row from the dataset.
///
/// Records are never mutated after loading; every downstream component
/// works on borrowed or cloned values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeRecord {
    /// Opaque identifier from the `id` column. Empty when the row lacks one.
    pub id: String,
    /// Free-text place name.
    pub location_description: Option<String>,
    /// Categorical crime label, compared exactly.
    pub crime_type: Option<String>,
    /// Raw severity label as it appears in the dataset.
    pub severity: Option<String>,
    /// Incident date, `None` when missing or unparseable.
    pub date: Option<NaiveDate>,
    /// Incident location, `None` when either component is missing or invalid.
    pub coordinate: Option<Coordinate>,
}

impl CrimeRecord {
    /// Returns the recognized severity level, if any.
    #[must_use]
    pub fn severity_level(&self) -> Option<SeverityLevel> {
        self.severity.as_deref().and_then(SeverityLevel::from_label)
    }

    /// Returns the normalized severity bucket: the trimmed, lowercased label,
    /// or [`UNKNOWN_SEVERITY`] when the record has none.
    #[must_use]
    pub fn severity_key(&self) -> String {
        self.severity
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| UNKNOWN_SEVERITY.to_string(), str::to_lowercase)
    }

    /// Returns the marker color for this record's severity.
    #[must_use]
    pub fn marker_color(&self) -> &'static str {
        self.severity_level()
            .map_or(DEFAULT_MARKER_COLOR, SeverityLevel::color)
    }
}

/// A single filter query over a record set.
///
/// Each field is either inactive (empty or the `"All"` sentinel) or holds
/// the filter text. Location and severity are trimmed; crime type is kept
/// as given because it is compared exactly. Criteria are immutable once
/// constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    location: Option<String>,
    crime_type: Option<String>,
    severity: Option<String>,
}

impl FilterCriteria {
    /// Builds criteria from raw user input. Blank strings and the `"All"`
    /// sentinel disable the corresponding predicate. The sentinel is
    /// matched case-insensitively for location and severity, and exactly
    /// for crime type.
    #[must_use]
    pub fn new(location: &str, crime_type: &str, severity: &str) -> Self {
        Self {
            location: normalize_input(location, |s| s.eq_ignore_ascii_case(ALL_SENTINEL)),
            crime_type: (!crime_type.trim().is_empty() && crime_type != ALL_SENTINEL)
                .then(|| crime_type.to_string()),
            severity: normalize_input(severity, |s| s.eq_ignore_ascii_case(ALL_SENTINEL)),
        }
    }

    /// Criteria that match every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Active location substring filter.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Active crime type filter.
    #[must_use]
    pub fn crime_type(&self) -> Option<&str> {
        self.crime_type.as_deref()
    }

    /// Active severity filter.
    #[must_use]
    pub fn severity(&self) -> Option<&str> {
        self.severity.as_deref()
    }

    /// Returns `true` when no predicate is active.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.location.is_none() && self.crime_type.is_none() && self.severity.is_none()
    }
}

fn normalize_input(value: &str, is_sentinel: impl Fn(&str) -> bool) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_sentinel(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}
