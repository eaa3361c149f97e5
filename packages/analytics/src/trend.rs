//! Monthly trend buckets per crime type.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike as _;
use crime_atlas_analytics_models::{MonthlyTrend, TrendPoint};
use crime_atlas_crime_models::CrimeRecord;

/// Label used for records that have a date but no crime type.
pub const UNTYPED: &str = "Unknown";

/// Buckets records by (calendar month, crime type).
///
/// Records without a date are skipped. Each type's series lists only the
/// months in which that type occurred, in ascending order; there is no
/// zero-filling for months where the type is absent.
#[must_use]
pub fn monthly_trend(records: &[CrimeRecord]) -> MonthlyTrend {
    let mut buckets: BTreeMap<&str, BTreeMap<(i32, u32), u64>> = BTreeMap::new();
    let mut months: BTreeSet<(i32, u32)> = BTreeSet::new();
    let mut undated: usize = 0;

    for record in records {
        let Some(date) = record.date else {
            undated += 1;
            continue;
        };
        let month = (date.year(), date.month());
        months.insert(month);
        let crime_type = record.crime_type.as_deref().unwrap_or(UNTYPED);
        *buckets
            .entry(crime_type)
            .or_default()
            .entry(month)
            .or_default() += 1;
    }

    if undated > 0 {
        log::debug!("Monthly trend skipped {undated} records without a date");
    }

    let trend_data = buckets
        .into_iter()
        .map(|(crime_type, series)| {
            let points = series
                .into_iter()
                .map(|((year, month), count)| TrendPoint {
                    month: format!("{year:04}-{month:02}"),
                    count,
                })
                .collect();
            (crime_type.to_string(), points)
        })
        .collect();

    MonthlyTrend {
        trend_data,
        total_months: months.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn buckets_by_month_and_type() {
        let records = vec![
            record("1", None, Some("Theft"), None, Some((2024, 1, 3))),
            record("2", None, Some("Theft"), None, Some((2024, 1, 28))),
            record("3", None, Some("Theft"), None, Some((2024, 3, 1))),
            record("4", None, Some("Assault"), None, Some((2024, 2, 14))),
        ];
        let trend = monthly_trend(&records);

        assert_eq!(trend.total_months, 3);
        assert_eq!(
            trend.trend_data["Theft"],
            vec![
                TrendPoint {
                    month: "2024-01".to_string(),
                    count: 2
                },
                TrendPoint {
                    month: "2024-03".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(
            trend.trend_data["Assault"],
            vec![TrendPoint {
                month: "2024-02".to_string(),
                count: 1
            }]
        );
    }

    #[test]
    fn months_without_a_type_are_absent_from_its_series() {
        let records = vec![
            record("1", None, Some("Theft"), None, Some((2024, 1, 1))),
            record("2", None, Some("Fraud"), None, Some((2024, 2, 1))),
        ];
        let trend = monthly_trend(&records);
        let theft_months: Vec<&str> = trend.trend_data["Theft"]
            .iter()
            .map(|p| p.month.as_str())
            .collect();
        assert_eq!(theft_months, vec!["2024-01"]);
    }

    #[test]
    fn undated_records_are_excluded() {
        let records = vec![
            record("1", None, Some("Theft"), None, None),
            record("2", None, Some("Theft"), None, Some((2023, 12, 31))),
        ];
        let trend = monthly_trend(&records);
        assert_eq!(trend.total_months, 1);
        assert_eq!(trend.trend_data["Theft"][0].count, 1);
    }

    #[test]
    fn dated_records_without_type_use_placeholder() {
        let records = vec![record("1", None, None, None, Some((2024, 4, 1)))];
        let trend = monthly_trend(&records);
        assert!(trend.trend_data.contains_key(UNTYPED));
    }

    #[test]
    fn empty_input_has_no_months() {
        assert_eq!(monthly_trend(&[]), MonthlyTrend::default());
    }
}
