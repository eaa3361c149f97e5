#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Renders crime records as a self-contained Leaflet map fragment.
//!
//! A rendered map has switchable base tiles, one clustered marker per
//! record with a coordinate (colored by severity), a heat layer over the
//! same points, a layer control, and optional fullscreen and measuring
//! controls. Records without a coordinate are left off the map but are
//! still counted by the caller's statistics.
//!
//! [`render`] never fails: an empty record set yields a placeholder map
//! and any rendering failure yields [`error_fragment`].

pub mod config;
pub mod markup;

use crime_atlas_crime_models::{Coordinate, CrimeRecord, DEFAULT_MARKER_COLOR};

use crate::config::MapConfig;
use crate::markup::{MapDocument, Marker, html_escape};

/// Text shown when a filter matched nothing.
pub const NO_RESULTS_MESSAGE: &str = "No crimes found matching the selected filters.";

/// Errors that can occur while rendering a map or loading its config.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// None of the records has a coordinate to place on the map.
    #[error("no coordinate data in {records} records")]
    NoCoordinates {
        /// Number of records that were offered.
        records: usize,
    },

    /// Encoding the map document failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// TOML parsing failed.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// The config parsed but is unusable.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of what is wrong.
        message: String,
    },

    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a rendered map is centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapCenter {
    /// Always center on this point.
    Fixed(Coordinate),
    /// Center on the arithmetic mean of the records' coordinates.
    Mean,
}

/// Per-map rendering choices layered over [`MapConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// View center.
    pub center: MapCenter,
    /// Initial zoom.
    pub zoom: u8,
    /// Label of the heat layer in the layer switcher.
    pub heat_layer_name: String,
    /// Whether to add the distance measuring control.
    pub measure: bool,
}

impl MapView {
    /// Whole-dataset view: fixed default center, overview zoom, measuring
    /// control as configured.
    #[must_use]
    pub fn overview(config: &MapConfig) -> Self {
        Self {
            center: MapCenter::Fixed(config.default_center),
            zoom: config.overview_zoom,
            heat_layer_name: "Crime Heat Map".to_string(),
            measure: config.measure_control,
        }
    }

    /// Filtered-results view: centered on the results' mean coordinate.
    #[must_use]
    pub fn filtered(config: &MapConfig) -> Self {
        Self {
            center: MapCenter::Mean,
            zoom: config.filtered_zoom,
            heat_layer_name: "Filtered Crime Heat Map".to_string(),
            measure: false,
        }
    }
}

/// Renders `records` as an embeddable map fragment.
///
/// Never fails: on error the fixed [`error_fragment`] is returned instead.
#[must_use]
pub fn render(records: &[CrimeRecord], view: &MapView, config: &MapConfig) -> String {
    try_render(records, view, config).unwrap_or_else(|e| {
        log::error!("Error generating map: {e}");
        error_fragment(&e.to_string())
    })
}

/// Renders `records` as an embeddable map fragment, reporting failures.
///
/// An empty record set renders the [`placeholder`] map.
///
/// # Errors
///
/// Returns [`MapError::NoCoordinates`] if there are records but none has a
/// coordinate, or [`MapError::Serialize`] if the document cannot be encoded.
pub fn try_render(
    records: &[CrimeRecord],
    view: &MapView,
    config: &MapConfig,
) -> Result<String, MapError> {
    if records.is_empty() {
        return placeholder(config);
    }

    record_document(records, view, config)?.to_html(&config.height)
}

/// Builds the document for a non-empty record set. Markers and heat points
/// come from the same located records.
fn record_document(
    records: &[CrimeRecord],
    view: &MapView,
    config: &MapConfig,
) -> Result<MapDocument, MapError> {
    let located: Vec<(&CrimeRecord, Coordinate)> = records
        .iter()
        .filter_map(|record| record.coordinate.map(|c| (record, c)))
        .collect();

    let Some(mean) = mean_coordinate(located.iter().map(|(_, c)| *c)) else {
        return Err(MapError::NoCoordinates {
            records: records.len(),
        });
    };

    let center = match view.center {
        MapCenter::Fixed(center) => center,
        MapCenter::Mean => mean,
    };

    let mut doc = MapDocument::new(config, center.to_lat_lng(), view.zoom);
    doc.cluster = true;
    doc.measure = view.measure;
    doc.heat_layer_name = Some(view.heat_layer_name.clone());
    doc.heat = located.iter().map(|(_, c)| c.to_lat_lng()).collect();
    doc.markers = located
        .iter()
        .map(|(record, c)| record_marker(record, *c, &config.region))
        .collect();

    log::info!(
        "Rendering map with {} markers ({} records without coordinates)",
        doc.markers.len(),
        records.len() - located.len()
    );

    Ok(doc)
}

/// Renders the placeholder shown for an empty result set: a map at the
/// default center with one informational marker, preceded by a visible
/// "No results" notice.
///
/// # Errors
///
/// Returns [`MapError::Serialize`] if the document cannot be encoded.
pub fn placeholder(config: &MapConfig) -> Result<String, MapError> {
    let center = config.default_center.to_lat_lng();
    let mut doc = MapDocument::new(config, center, config.overview_zoom);
    doc.markers.push(Marker {
        position: center,
        color: DEFAULT_MARKER_COLOR,
        tooltip: "No results".to_string(),
        popup: format!("<strong>No results</strong><br>{NO_RESULTS_MESSAGE}"),
    });

    Ok(format!(
        "<div class=\"crime-atlas-notice alert alert-warning\" data-results=\"0\">\
         No results: {NO_RESULTS_MESSAGE}</div>{}",
        doc.to_html(&config.height)?
    ))
}

/// Renders a route map from a start point to a destination.
///
/// With `user_location` the start marker sits there and is labelled
/// "Your Location"; otherwise it sits at the default center labelled with
/// `start`. The destination is not geocoded and always sits at the default
/// center.
///
/// # Errors
///
/// Returns [`MapError::Serialize`] if the document cannot be encoded.
pub fn try_render_route(
    start: &str,
    destination: &str,
    user_location: Option<Coordinate>,
    config: &MapConfig,
) -> Result<String, MapError> {
    let (start_point, start_label) = match user_location.filter(|c| c.is_valid()) {
        Some(location) => (location, "Your Location"),
        None => (config.default_center, start),
    };

    let mut doc = MapDocument::new(config, start_point.to_lat_lng(), config.route_zoom);
    doc.marker_layer_name = "Route".to_string();
    doc.markers = vec![
        Marker {
            position: start_point.to_lat_lng(),
            color: "green",
            tooltip: "Starting Point".to_string(),
            popup: format!("Start: {}", html_escape(start_label)),
        },
        Marker {
            position: config.default_center.to_lat_lng(),
            color: "red",
            tooltip: "Destination".to_string(),
            popup: format!("Destination: {}", html_escape(destination)),
        },
    ];

    doc.to_html(&config.height)
}

/// The fixed fragment returned when a map cannot be rendered.
#[must_use]
pub fn error_fragment(reason: &str) -> String {
    format!(
        "<div class=\"alert alert-danger\">Error loading map: {}</div>",
        html_escape(reason)
    )
}

/// Arithmetic mean of the given coordinates, or `None` if there are none.
#[must_use]
pub fn mean_coordinate(coordinates: impl IntoIterator<Item = Coordinate>) -> Option<Coordinate> {
    let (count, lat_sum, lng_sum) = coordinates
        .into_iter()
        .fold((0_usize, 0.0, 0.0), |(n, lat, lng), c| {
            (n + 1, lat + c.latitude, lng + c.longitude)
        });
    (count > 0).then(|| {
        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        Coordinate::new(lat_sum / n, lng_sum / n)
    })
}

/// Builds the marker for one located record. The popup lists type, date,
/// severity, location, and id, plus a button that hands the location to the
/// embedding page's `onMarkerClick(name, destination)` handler.
fn record_marker(record: &CrimeRecord, coordinate: Coordinate, region: &str) -> Marker {
    let location = record
        .location_description
        .as_deref()
        .unwrap_or("Unknown Location");
    let crime_type = record.crime_type.as_deref().unwrap_or("Unknown Crime");
    let severity = record
        .severity_level()
        .map_or_else(|| record.severity_key(), |level| title_case(level.as_ref()));
    let date = record
        .date
        .map_or_else(|| "Unknown Date".to_string(), |d| d.to_string());

    let location_attr = html_escape(location);
    let destination_attr = html_escape(&format!("{location}, {region}"));

    let popup = format!(
        "<div style=\"width: 250px;\">\
         <h5>{location_attr}</h5>\
         <p><strong>Crime Type:</strong> {crime_type}</p>\
         <p><strong>Severity:</strong> {severity}</p>\
         <p><strong>Date:</strong> {date}</p>\
         <p><strong>ID:</strong> {id}</p>\
         <button data-location=\"{location_attr}\" data-destination=\"{destination_attr}\" \
         onclick=\"parent.onMarkerClick(this.dataset.location, this.dataset.destination)\" \
         class=\"btn btn-sm btn-primary\">Select for Navigation</button>\
         </div>",
        crime_type = html_escape(crime_type),
        severity = html_escape(&severity),
        id = html_escape(&record.id),
    );

    Marker {
        position: coordinate.to_lat_lng(),
        color: record.marker_color(),
        tooltip: html_escape(&format!("{location} - {crime_type}")),
        popup,
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
