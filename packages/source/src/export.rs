//! CSV export of source rows.
//!
//! Rows are written back exactly as they were read: the source header,
//! every column (including ones the loader does not know), and the raw
//! text of fields that failed to parse. Ragged rows keep their length.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{COLUMNS, SourceError};

/// A file written by [`export_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Path of the new file.
    pub path: PathBuf,
    /// Number of data rows written.
    pub rows: u64,
}

/// Writes `headers` and then `rows` as CSV to any writer. An empty header
/// is replaced by the canonical [`COLUMNS`].
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if writing fails.
pub fn write_rows<'a, W: Write>(
    headers: &[String],
    rows: impl IntoIterator<Item = &'a [String]>,
    output: W,
) -> Result<u64, SourceError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(output);

    if headers.is_empty() {
        writer.write_record(COLUMNS)?;
    } else {
        writer.write_record(headers)?;
    }

    let mut written = 0;
    for row in rows {
        writer.write_record(row)?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Returns the export file name for a given timestamp, e.g.
/// `filtered_crimes_20240315_142501.csv`.
#[must_use]
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("filtered_crimes_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Writes `rows` to a new timestamped CSV file inside `dir`.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be created, or
/// [`SourceError::Csv`] if writing fails.
pub fn export_to_dir<'a>(
    headers: &[String],
    rows: impl IntoIterator<Item = &'a [String]>,
    dir: &Path,
) -> Result<ExportedFile, SourceError> {
    let path = dir.join(export_file_name(Utc::now()));
    let file = std::fs::File::create(&path)?;
    let rows = write_rows(headers, rows, std::io::BufWriter::new(file))?;

    log::info!("Exported {rows} rows to {}", path.display());

    Ok(ExportedFile { path, rows })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::parse_reader;

    const SOURCE: &str = "\
id,location_description,crime_type,severity,date,latitude,longitude,officer
1,\"One Town, Vijayawada\",Theft,high,2024-03-15,16.51,80.62,Reddy
2,Guntur,Theft,high,15th March 2024,north,80.4,Rao
3,Nellore,Fraud,low,2024-01-02,14.44,79.98,Naidu
4,Kurnool,Theft
";

    fn export_all(source: &str) -> String {
        let dataset = parse_reader(source.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_rows(&dataset.headers, dataset.raw_rows_where(|_| true), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn rows_are_written_back_verbatim() {
        assert_eq!(export_all(SOURCE), SOURCE);
    }

    #[test]
    fn malformed_fields_and_extra_columns_survive() {
        let dataset = parse_reader(SOURCE.as_bytes()).unwrap();
        assert_eq!(dataset.records[1].date, None);
        assert_eq!(dataset.records[1].coordinate, None);

        let mut out = Vec::new();
        let rows = write_rows(
            &dataset.headers,
            dataset.raw_rows_where(|r| r.id == "2"),
            &mut out,
        )
        .unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with(",officer"));
        assert_eq!(lines[1], "2,Guntur,Theft,high,15th March 2024,north,80.4,Rao");
    }

    #[test]
    fn filtered_rows_keep_file_order() {
        let dataset = parse_reader(SOURCE.as_bytes()).unwrap();
        let ids: Vec<&str> = dataset
            .raw_rows_where(|r| r.crime_type.as_deref() == Some("Theft"))
            .map(|row| row[0].as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
    }

    #[test]
    fn missing_header_falls_back_to_canonical_columns() {
        let mut out = Vec::new();
        let rows = write_rows(&[], std::iter::empty(), &mut out).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,location_description,crime_type,severity,date,latitude,longitude\n"
        );
    }

    #[test]
    fn export_file_name_uses_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 14, 25, 1).unwrap();
        assert_eq!(export_file_name(at), "filtered_crimes_20240315_142501.csv");
    }

    #[test]
    fn export_to_dir_creates_loadable_file() {
        let dataset = parse_reader(SOURCE.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let exported =
            export_to_dir(&dataset.headers, dataset.raw_rows_where(|_| true), dir.path()).unwrap();
        assert!(exported.path.starts_with(dir.path()));
        assert_eq!(exported.rows, 4);

        let loaded = crate::load_dataset(&exported.path).unwrap();
        assert_eq!(loaded.records, dataset.records);
        assert_eq!(loaded.raw_rows, dataset.raw_rows);
    }
}
