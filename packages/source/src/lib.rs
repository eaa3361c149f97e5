#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record store for the crime incident dataset.
//!
//! Loads a delimited file with the columns `id, location_description,
//! crime_type, severity, date, latitude, longitude` into
//! [`CrimeRecord`]s. The file is read in full on every call; nothing is
//! cached between loads.
//!
//! Malformed rows are kept. A field that cannot be parsed is marked absent
//! and reported as a [`MalformedField`]; only a failure to read the source
//! at all is an error.
//!
//! Field text is trimmed before parsing, except `crime_type`, which is kept
//! exactly as written. The untouched source row is kept next to each record
//! so that exports reproduce the file's own values.

pub mod export;
pub mod parsing;

use std::io::Read;
use std::path::{Path, PathBuf};

use crime_atlas_crime_models::{Coordinate, CrimeRecord};

use crate::parsing::{parse_date, parse_latitude, parse_longitude};

/// Dataset column names in canonical order.
pub const COLUMNS: [&str; 7] = [
    "id",
    "location_description",
    "crime_type",
    "severity",
    "date",
    "latitude",
    "longitude",
];

/// Errors that can occur while reading or writing the dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The dataset file is missing or could not be read.
    #[error("data unavailable at {}: {source}", path.display())]
    DataUnavailable {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file write, directory access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A field that could not be parsed and was marked absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedField {
    /// 1-based data row number (the header row is not counted).
    pub row: u64,
    /// Column the value came from.
    pub column: &'static str,
    /// The raw value that failed to parse.
    pub value: String,
}

/// Result of a single load: the records plus what was degraded on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    /// Header row as written in the source, including unknown columns.
    pub headers: Vec<String>,
    /// Every row of the source, in file order.
    pub records: Vec<CrimeRecord>,
    /// Raw fields of each row, index-aligned with `records`.
    pub raw_rows: Vec<Vec<String>>,
    /// Fields that were present but unparseable.
    pub malformed: Vec<MalformedField>,
    /// Rows whose column count differed from the header.
    pub ragged_rows: u64,
}

/// Header positions of the known columns. Unknown headers are ignored and
/// missing ones leave the field absent for every row.
#[derive(Debug, Default)]
struct ColumnIndex {
    id: Option<usize>,
    location_description: Option<usize>,
    crime_type: Option<usize>,
    severity: Option<usize>,
    date: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
}

impl LoadedDataset {
    /// Raw source rows whose record satisfies `keep`, in file order.
    pub fn raw_rows_where(
        &self,
        mut keep: impl FnMut(&CrimeRecord) -> bool,
    ) -> impl Iterator<Item = &[String]> {
        self.records
            .iter()
            .zip(&self.raw_rows)
            .filter(move |(record, _)| keep(*record))
            .map(|(_, raw)| raw.as_slice())
    }
}

impl ColumnIndex {
    fn from_headers(headers: &csv::ByteRecord) -> Self {
        let mut index = Self::default();
        for (i, raw) in headers.iter().enumerate() {
            let name = String::from_utf8_lossy(raw).trim().to_ascii_lowercase();
            let slot = match name.trim_start_matches('\u{feff}') {
                "id" => &mut index.id,
                "location_description" => &mut index.location_description,
                "crime_type" => &mut index.crime_type,
                "severity" => &mut index.severity,
                "date" => &mut index.date,
                "latitude" => &mut index.latitude,
                "longitude" => &mut index.longitude,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(i);
            }
        }
        index
    }

    fn missing(&self) -> Vec<&'static str> {
        let slots = [
            self.id,
            self.location_description,
            self.crime_type,
            self.severity,
            self.date,
            self.latitude,
            self.longitude,
        ];
        COLUMNS
            .iter()
            .zip(slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Loads every record from the CSV file at `path`.
///
/// # Errors
///
/// Returns [`SourceError::DataUnavailable`] if the file cannot be opened or
/// read.
pub fn load(path: &Path) -> Result<Vec<CrimeRecord>, SourceError> {
    load_dataset(path).map(|dataset| dataset.records)
}

/// Loads the CSV file at `path`, keeping the malformed-field report.
///
/// # Errors
///
/// Returns [`SourceError::DataUnavailable`] if the file cannot be opened or
/// read.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset, SourceError> {
    let unavailable = |source: std::io::Error| SourceError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(unavailable)?;

    let dataset = parse_reader(file).map_err(|e| match e {
        SourceError::Csv(e) => unavailable(e.into()),
        SourceError::Io(e) => unavailable(e),
        other => other,
    })?;

    log::info!(
        "Loaded {} records from {} ({} malformed fields, {} ragged rows)",
        dataset.records.len(),
        path.display(),
        dataset.malformed.len(),
        dataset.ragged_rows,
    );

    Ok(dataset)
}

/// Parses CSV data from any reader. The first row must be the header.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the underlying reader fails.
pub fn parse_reader<R: Read>(input: R) -> Result<LoadedDataset, SourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.byte_headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers);

    let missing = columns.missing();
    if !headers.is_empty() && !missing.is_empty() {
        log::warn!("Dataset is missing columns: {}", missing.join(", "));
    }

    let mut dataset = LoadedDataset {
        headers: raw_fields(&headers),
        ..LoadedDataset::default()
    };
    let mut row_number: u64 = 0;

    for result in reader.byte_records() {
        let row = result?;
        row_number += 1;

        if row.len() != headers.len() {
            log::debug!(
                "Row {row_number}: expected {} columns, found {}",
                headers.len(),
                row.len()
            );
            dataset.ragged_rows += 1;
        }

        let record = parse_row(&row, row_number, &columns, &mut dataset.malformed);
        dataset.records.push(record);
        dataset.raw_rows.push(raw_fields(&row));
    }

    Ok(dataset)
}

fn raw_fields(row: &csv::ByteRecord) -> Vec<String> {
    row.iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

fn parse_row(
    row: &csv::ByteRecord,
    row_number: u64,
    columns: &ColumnIndex,
    malformed: &mut Vec<MalformedField>,
) -> CrimeRecord {
    let raw = |slot: Option<usize>| -> Option<String> {
        let value = String::from_utf8_lossy(row.get(slot?)?).into_owned();
        (!value.trim().is_empty()).then_some(value)
    };
    let text = |slot: Option<usize>| raw(slot).map(|value| value.trim().to_string());

    let date = parse_field(row_number, "date", text(columns.date), parse_date, malformed);
    let latitude = parse_field(
        row_number,
        "latitude",
        text(columns.latitude),
        parse_latitude,
        malformed,
    );
    let longitude = parse_field(
        row_number,
        "longitude",
        text(columns.longitude),
        parse_longitude,
        malformed,
    );

    let coordinate = match (latitude, longitude) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    };

    CrimeRecord {
        id: text(columns.id).unwrap_or_default(),
        location_description: text(columns.location_description),
        crime_type: raw(columns.crime_type),
        severity: text(columns.severity),
        date,
        coordinate,
    }
}

/// Parses an optional raw value, recording a [`MalformedField`] when the
/// value is present but `parse` rejects it.
fn parse_field<T>(
    row: u64,
    column: &'static str,
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
    malformed: &mut Vec<MalformedField>,
) -> Option<T> {
    let value = value?;
    let result = parse(&value);
    if result.is_none() {
        log::debug!("Row {row}: unparseable {column} value '{value}'");
        malformed.push(MalformedField { row, column, value });
    }
    result
}
