#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary operations for the crime atlas.
//!
//! Each method on [`CrimeAtlas`] reloads the dataset from disk, runs one
//! query, and returns an [`ApiResponse`]. Failures never escape: a missing
//! or unreadable dataset produces a well-formed fallback payload together
//! with the error text, so a route layer can serialize every response the
//! same way.

use std::path::{Path, PathBuf};

use crime_atlas_analytics::distinct::{distinct_crime_types, distinct_locations, filter_options};
use crime_atlas_analytics_models::{FilterOptions, MonthlyTrend};
use crime_atlas_api_models::{
    ApiResponse, CrimeStatistics, ExportSummary, IncidentSummary, NearbyResult,
};
use crime_atlas_crime_models::{Coordinate, CrimeRecord, FilterCriteria};
use crime_atlas_map::config::MapConfig;
use crime_atlas_map::{MapView, error_fragment};
use crime_atlas_source::SourceError;
use crime_atlas_source::export::export_to_dir;

/// Number of incidents listed under recent crimes in [`CrimeStatistics`].
pub const RECENT_CRIMES: usize = 5;

/// Handle to a dataset file plus the map settings used to render it.
///
/// Holds no records: every call reads the file again, so each caller sees
/// the file as it is at the moment of the call.
#[derive(Debug, Clone)]
pub struct CrimeAtlas {
    dataset: PathBuf,
    map_config: MapConfig,
}

impl CrimeAtlas {
    /// Creates a handle for the dataset at `dataset`.
    #[must_use]
    pub fn new(dataset: impl Into<PathBuf>, map_config: MapConfig) -> Self {
        Self {
            dataset: dataset.into(),
            map_config,
        }
    }

    /// Path of the dataset file.
    #[must_use]
    pub fn dataset(&self) -> &Path {
        &self.dataset
    }

    fn load(&self) -> Result<Vec<CrimeRecord>, SourceError> {
        crime_atlas_source::load(&self.dataset).inspect_err(|e| {
            log::error!("Failed to load dataset: {e}");
        })
    }

    /// Map of the full dataset at the default center.
    #[must_use]
    pub fn map_html(&self) -> ApiResponse<String> {
        self.map_response(&FilterCriteria::all(), &MapView::overview(&self.map_config))
    }

    /// Map of the records matching `criteria`, centered on the results.
    ///
    /// No matches render the placeholder map, which is not an error.
    #[must_use]
    pub fn filtered_map_html(&self, criteria: &FilterCriteria) -> ApiResponse<String> {
        self.map_response(criteria, &MapView::filtered(&self.map_config))
    }

    fn map_response(&self, criteria: &FilterCriteria, view: &MapView) -> ApiResponse<String> {
        let records = match self.load() {
            Ok(records) => crime_atlas_filter::apply(records, criteria),
            Err(e) => return ApiResponse::fallback(error_fragment(&e.to_string()), e),
        };

        match crime_atlas_map::try_render(&records, view, &self.map_config) {
            Ok(html) => ApiResponse::ok(html),
            Err(e) => {
                log::error!("Error generating map: {e}");
                ApiResponse::fallback(error_fragment(&e.to_string()), e)
            }
        }
    }

    /// Sorted distinct values for the filter dropdowns.
    #[must_use]
    pub fn filter_options(&self) -> ApiResponse<FilterOptions> {
        self.query(filter_options)
    }

    /// Distinct locations in dataset order.
    #[must_use]
    pub fn locations(&self) -> ApiResponse<Vec<String>> {
        self.query(distinct_locations)
    }

    /// Distinct crime types in dataset order.
    #[must_use]
    pub fn crime_types(&self) -> ApiResponse<Vec<String>> {
        self.query(distinct_crime_types)
    }

    /// Summary statistics over the whole dataset.
    #[must_use]
    pub fn statistics(&self) -> ApiResponse<CrimeStatistics> {
        self.query(|records| {
            CrimeStatistics::new(
                records.len() as u64,
                crime_atlas_analytics::count_by_type(records),
                crime_atlas_analytics::count_by_severity(records),
                crime_atlas_analytics::top_location(records),
                crime_atlas_analytics::recent_n(records, RECENT_CRIMES)
                    .iter()
                    .map(IncidentSummary::from)
                    .collect(),
            )
        })
    }

    /// Monthly counts per crime type.
    #[must_use]
    pub fn trend_data(&self) -> ApiResponse<MonthlyTrend> {
        self.query(crime_atlas_analytics::monthly_trend)
    }

    /// Records within `radius_km` of (`lat`, `lng`), using the approximate
    /// planar distance of [`crime_atlas_spatial`].
    #[must_use]
    pub fn search_nearby(&self, lat: f64, lng: f64, radius_km: f64) -> ApiResponse<NearbyResult> {
        let place = format!("({lat}, {lng})");
        match self.load() {
            Ok(records) => {
                let crimes = crime_atlas_spatial::nearby(&records, lat, lng, radius_km);
                let message = if crimes.is_empty() {
                    format!("No crimes found near {place}")
                } else {
                    format!("Found {} crimes near {place}", crimes.len())
                };
                ApiResponse::ok(NearbyResult { message, crimes })
            }
            Err(e) => ApiResponse::fallback(
                NearbyResult {
                    message: format!("Error searching near {place}"),
                    crimes: Vec::new(),
                },
                e,
            ),
        }
    }

    /// Writes the source rows matching `criteria` to a timestamped CSV file
    /// in `out_dir`. Rows are copied as read, including unparseable fields
    /// and columns the loader does not use.
    #[must_use]
    pub fn export_filtered(
        &self,
        criteria: &FilterCriteria,
        out_dir: &Path,
    ) -> ApiResponse<ExportSummary> {
        let result = crime_atlas_source::load_dataset(&self.dataset).and_then(|dataset| {
            let rows =
                dataset.raw_rows_where(|record| crime_atlas_filter::matches(record, criteria));
            let exported = export_to_dir(&dataset.headers, rows, out_dir)?;
            Ok(ExportSummary {
                filename: Some(exported.path.display().to_string()),
                count: exported.rows,
            })
        });

        match result {
            Ok(summary) => ApiResponse::ok(summary),
            Err(e) => {
                log::error!("Error exporting data: {e}");
                ApiResponse::fallback(ExportSummary::default(), e)
            }
        }
    }

    /// Route map from `start` (or the user's position) to `destination`.
    ///
    /// Does not read the dataset. Destinations are not geocoded.
    #[must_use]
    pub fn route_map(
        &self,
        start: &str,
        destination: &str,
        user_location: Option<Coordinate>,
    ) -> ApiResponse<String> {
        match crime_atlas_map::try_render_route(start, destination, user_location, &self.map_config)
        {
            Ok(html) => ApiResponse::ok(html),
            Err(e) => {
                log::error!("Error generating route map: {e}");
                ApiResponse::fallback(error_fragment(&e.to_string()), e)
            }
        }
    }

    /// Loads the dataset and runs `f`, substituting `T::default()` if the
    /// load fails.
    fn query<T: Default>(&self, f: impl FnOnce(&[CrimeRecord]) -> T) -> ApiResponse<T> {
        match self.load() {
            Ok(records) => ApiResponse::ok(f(&records)),
            Err(e) => ApiResponse::fallback(T::default(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    const HEADER: &str = "id,location_description,crime_type,severity,date,latitude,longitude";

    fn dataset(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn sample() -> tempfile::NamedTempFile {
        dataset(&[
            "1,Benz Circle Vijayawada,Theft,high,2024-03-15,16.4991,80.6560",
            "2,Guntur Bus Stand,Assault,medium,2024-03-02,16.3067,80.4365",
            "3,Benz Circle Vijayawada,Robbery,low,2024-02-11,16.4990,80.6561",
            "4,Tirupati,Theft,High,2024-01-20,13.6288,79.4192",
            "5,Nellore,Fraud,low,not-a-date,,",
        ])
    }

    fn atlas(file: &tempfile::NamedTempFile) -> CrimeAtlas {
        CrimeAtlas::new(file.path(), MapConfig::default())
    }

    fn missing() -> CrimeAtlas {
        CrimeAtlas::new("/nonexistent/crime_data.csv", MapConfig::default())
    }

    #[test]
    fn statistics_summarize_dataset() {
        let file = sample();
        let response = atlas(&file).statistics();
        assert!(response.is_ok());

        let stats = response.data;
        assert_eq!(stats.total_crimes, 5);
        assert_eq!(stats.crime_by_type["Theft"], 2);
        assert_eq!(stats.severity_counts["high"], 2);
        assert_eq!(stats.severity_counts["low"], 2);
        assert_eq!(stats.top_location, "Benz Circle Vijayawada");
        assert_eq!(stats.top_location_count, 2);

        let recent: Vec<&str> = stats.recent_crimes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(recent, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn statistics_fall_back_to_zero_filled_when_file_missing() {
        let response = missing().statistics();
        assert!(!response.is_ok());
        assert_eq!(response.data, CrimeStatistics::default());
        assert!(response.error.unwrap().contains("data unavailable"));
    }

    #[test]
    fn listings_fall_back_to_empty() {
        let atlas = missing();
        assert!(atlas.locations().data.is_empty());
        assert!(atlas.crime_types().data.is_empty());
        assert_eq!(atlas.filter_options().data, FilterOptions::default());
        assert_eq!(atlas.trend_data().data, MonthlyTrend::default());
    }

    #[test]
    fn filtered_map_with_single_match() {
        let file = sample();
        let criteria = FilterCriteria::new("vijayawada", "Theft", "high");
        let response = atlas(&file).filtered_map_html(&criteria);
        assert!(response.is_ok());
        assert!(response.data.contains("&quot;position&quot;:[16.4991,80.656]"));
        assert_eq!(response.data.matches("&quot;position&quot;").count(), 1);
    }

    #[test]
    fn filtered_map_without_matches_is_placeholder() {
        let file = sample();
        let criteria = FilterCriteria::new("Chennai", "", "");
        let response = atlas(&file).filtered_map_html(&criteria);
        assert!(response.is_ok());
        assert!(response.data.contains("No results"));
    }

    #[test]
    fn map_falls_back_to_error_fragment_when_file_missing() {
        let response = missing().map_html();
        assert!(!response.is_ok());
        assert!(response.data.contains("alert-danger"));
    }

    #[test]
    fn map_of_records_without_coordinates_reports_error() {
        let file = dataset(&["1,Guntur,Theft,low,2024-01-01,,"]);
        let response = atlas(&file).map_html();
        assert!(!response.is_ok());
        assert!(response.data.starts_with("<div class=\"alert alert-danger\">"));
    }

    #[test]
    fn nearby_reports_matches() {
        let file = sample();
        let response = atlas(&file).search_nearby(16.4991, 80.6560, 1.0);
        assert!(response.is_ok());
        let ids: Vec<&str> = response.data.crimes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(response.data.message, "Found 2 crimes near (16.4991, 80.656)");

        let response = atlas(&file).search_nearby(0.0, 0.0, 1.0);
        assert!(response.is_ok());
        assert!(response.data.crimes.is_empty());
        assert!(response.data.message.starts_with("No crimes found"));
    }

    #[test]
    fn nearby_falls_back_when_file_missing() {
        let response = missing().search_nearby(16.5, 80.6, 5.0);
        assert!(!response.is_ok());
        assert!(response.data.crimes.is_empty());
    }

    #[test]
    fn export_writes_filtered_rows() {
        let file = sample();
        let out = tempfile::tempdir().unwrap();
        let response = atlas(&file).export_filtered(&FilterCriteria::new("", "Theft", ""), out.path());
        assert!(response.is_ok());
        assert_eq!(response.data.count, 2);

        let path = PathBuf::from(response.data.filename.unwrap());
        let exported = crime_atlas_source::load(&path).unwrap();
        assert_eq!(exported.len(), 2);
    }

    #[test]
    fn export_copies_unparseable_fields_as_written() {
        let file = dataset(&["5,Nellore,Fraud,low,not-a-date,north,79.98"]);
        let out = tempfile::tempdir().unwrap();
        let response =
            atlas(&file).export_filtered(&FilterCriteria::new("", "Fraud", ""), out.path());
        assert!(response.is_ok());
        assert_eq!(response.data.count, 1);

        let text = std::fs::read_to_string(response.data.filename.unwrap()).unwrap();
        assert_eq!(text, format!("{HEADER}\n5,Nellore,Fraud,low,not-a-date,north,79.98\n"));
    }

    #[test]
    fn export_into_missing_directory_falls_back() {
        let file = sample();
        let response = atlas(&file).export_filtered(
            &FilterCriteria::all(),
            Path::new("/nonexistent/export/dir"),
        );
        assert!(!response.is_ok());
        assert_eq!(response.data, ExportSummary::default());
    }

    #[test]
    fn route_map_does_not_need_dataset() {
        let response = missing().route_map("Guntur", "Tirupati", None);
        assert!(response.is_ok());
        assert!(response.data.contains("Destination: Tirupati"));
    }

    #[test]
    fn each_call_sees_current_file_contents() {
        let file = sample();
        let atlas = atlas(&file);
        assert_eq!(atlas.statistics().data.total_crimes, 5);

        std::fs::write(file.path(), format!("{HEADER}\n9,Kurnool,Theft,low,2024-05-01,15.8,78.0\n"))
            .unwrap();
        assert_eq!(atlas.statistics().data.total_crimes, 1);
    }
}
