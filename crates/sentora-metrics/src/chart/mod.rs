//! Time-range bucketization behind the performance chart.
//!
//! Each [`TimeRange`] maps to one independent bucketing function (a plain
//! dispatch, no shared strategy trait). The engine works over snapshots
//! the caller already fetched for the range's query window, so every call
//! is a pure function of its inputs.

mod axis;
mod buckets;
mod ranges;

pub use axis::y_axis_max;

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sentora_db::models::Snapshot;
use sentora_db::types::TimeRange;

use crate::error::MetricsError;

use buckets::{month_start, shift_month};
use ranges::custom_window_hours;

/// Label granularity hint for the renderer; not used in any computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DisplayType {
    Hour,
    Date,
    FullDate,
}

/// One point of the performance chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataPoint {
    /// Bucket liquidity in integer millions; `None` marks a data gap
    pub value: Option<i64>,
    /// Bucket APR in percent, one decimal
    pub apr: f64,
    /// ISO 8601 timestamp with millisecond precision
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_type: Option<DisplayType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub time_range: TimeRange,
    /// Moving-average window, in hours, used for this range
    pub moving_average: u32,
    pub total_data_points: usize,
    pub y_axis_max: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartSeries {
    pub data: Vec<ChartDataPoint>,
    pub config: ChartConfig,
}

/// User-provided bounds of a custom chart range, `YYYY-MM-DD` on both ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomRange {
    pub from: String,
    pub to: String,
}

impl CustomRange {
    /// Validate and parse both bounds. Anything but a strict `YYYY-MM-DD`
    /// string is rejected, matching what the date picker sends.
    pub fn parse(&self) -> Result<(NaiveDate, NaiveDate), MetricsError> {
        Ok((parse_custom_date(&self.from)?, parse_custom_date(&self.to)?))
    }
}

fn parse_custom_date(input: &str) -> Result<NaiveDate, MetricsError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .filter(|date| date.format("%Y-%m-%d").to_string() == input)
        .ok_or_else(|| MetricsError::InvalidDateRange(input.to_string()))
}

/// The `[from, to]` interval of snapshots a range needs. The HTTP layer
/// uses this to fetch before handing the rows to [`chart_data`].
pub fn query_window(
    time_range: TimeRange,
    now: DateTime<Utc>,
    custom: Option<&CustomRange>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), MetricsError> {
    let window = match time_range {
        TimeRange::SevenDays | TimeRange::All => (now - Duration::days(7), now),
        TimeRange::OneMonth => (now - Duration::days(30), now),
        TimeRange::ThreeMonths => (months_back_start(now, 3), now),
        TimeRange::SixMonths => (months_back_start(now, 6), now),
        TimeRange::OneYear => (months_back_start(now, 12), now),
        TimeRange::YearToDate => {
            let jan_first = Utc
                .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
                .single()
                .expect("January 1st is a valid UTC instant");
            (jan_first, now)
        }
        TimeRange::Custom => {
            let range = custom.ok_or(MetricsError::MissingCustomRange)?;
            let (from, to) = range.parse()?;
            (buckets::at_midnight(from), buckets::at_midnight(to))
        }
    };
    Ok(window)
}

fn months_back_start(now: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    let (year, month) = shift_month(now.year(), now.month(), -months);
    month_start(year, month)
}

/// Bucketize `snapshots` (ascending, already restricted to the range's
/// query window) into the chart series for `time_range`.
///
/// The only failure modes are a malformed custom range and a `custom`
/// range without bounds; every other input, including an empty snapshot
/// set, resolves through the per-range fallback policy.
pub fn chart_data(
    time_range: TimeRange,
    snapshots: &[Snapshot],
    now: DateTime<Utc>,
    custom: Option<&CustomRange>,
) -> Result<ChartSeries, MetricsError> {
    let (data, moving_average, custom_bounds) = match time_range {
        TimeRange::SevenDays | TimeRange::All => (ranges::seven_days(snapshots, now), 1, None),
        TimeRange::OneMonth => (ranges::one_month(snapshots, now), 12, None),
        TimeRange::ThreeMonths => (ranges::monthly(snapshots, now, 3), 24, None),
        TimeRange::SixMonths => (ranges::monthly(snapshots, now, 6), 24, None),
        TimeRange::OneYear => (ranges::monthly(snapshots, now, 12), 24, None),
        TimeRange::YearToDate => (ranges::year_to_date(snapshots, now), 24, None),
        TimeRange::Custom => {
            let range = custom.ok_or(MetricsError::MissingCustomRange)?;
            let (from, to) = range.parse()?;
            let span_days = (to - from).num_days();
            (
                ranges::custom(snapshots, from, to),
                custom_window_hours(span_days),
                Some((range.from.clone(), range.to.clone())),
            )
        }
    };

    let (from, to) = match custom_bounds {
        Some((from, to)) => (Some(from), Some(to)),
        None => (None, None),
    };

    let config = ChartConfig {
        time_range,
        moving_average,
        total_data_points: data.len(),
        y_axis_max: y_axis_max(&data),
        from,
        to,
    };

    Ok(ChartSeries { data, config })
}

/// ISO 8601 with milliseconds, the timestamp format the chart renderer
/// consumes (`2025-01-15T12:00:00.000Z`)
pub(crate) fn iso_millis(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(timestamp: DateTime<Utc>, liquidity: f64, fees: f64) -> Snapshot {
        Snapshot {
            id: 0,
            pair_address: "0xpair".to_string(),
            timestamp,
            liquidity,
            volume: fees / 0.003,
            fees,
            created_at: None,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap()
    }

    #[test]
    fn test_seven_days_emits_two_points_per_day() {
        let now = at(2025, 6, 15, 12);
        let snapshots = vec![
            snap(at(2025, 6, 10, 0), 30_000_000.0, 9000.0),
            snap(at(2025, 6, 12, 0), 32_000_000.0, 9000.0),
        ];

        let series = chart_data(TimeRange::SevenDays, &snapshots, now, None).unwrap();
        assert_eq!(series.data.len(), 14);
        assert_eq!(series.config.moving_average, 1);
        assert_eq!(series.config.total_data_points, 14);

        // Midnight points carry the date hint, noon points the hour hint.
        assert_eq!(series.data[0].display_type, Some(DisplayType::Date));
        assert_eq!(series.data[1].display_type, Some(DisplayType::Hour));
        assert!(series.data[0].timestamp.ends_with("T00:00:00.000Z"));
        assert!(series.data[1].timestamp.ends_with("T12:00:00.000Z"));

        // June 10th has real data: 30M -> value 30.
        let june_10_midnight = &series.data[4];
        assert!(june_10_midnight.timestamp.starts_with("2025-06-10"));
        assert_eq!(june_10_midnight.value, Some(30));
    }

    #[test]
    fn test_seven_days_empty_day_uses_range_average() {
        let now = at(2025, 6, 15, 12);
        let snapshots = vec![
            snap(at(2025, 6, 10, 0), 30_000_000.0, 9000.0),
            snap(at(2025, 6, 12, 0), 50_000_000.0, 9000.0),
        ];

        let series = chart_data(TimeRange::SevenDays, &snapshots, now, None).unwrap();
        // June 9th is empty: falls back to the 40M range average.
        let june_9_noon = &series.data[3];
        assert!(june_9_noon.timestamp.starts_with("2025-06-09"));
        assert_eq!(june_9_noon.value, Some(40));
    }

    #[test]
    fn test_seven_days_empty_range_uses_placeholder() {
        let now = at(2025, 6, 15, 12);
        let series = chart_data(TimeRange::SevenDays, &[], now, None).unwrap();
        assert_eq!(series.data.len(), 14);
        for point in &series.data {
            assert_eq!(point.value, Some(24));
            assert_eq!(point.apr, 8.5);
        }
        assert_eq!(series.config.y_axis_max, 40);
    }

    #[test]
    fn test_all_matches_seven_days() {
        let now = at(2025, 6, 15, 12);
        let snapshots = vec![snap(at(2025, 6, 11, 0), 30_000_000.0, 9000.0)];

        let seven = chart_data(TimeRange::SevenDays, &snapshots, now, None).unwrap();
        let all = chart_data(TimeRange::All, &snapshots, now, None).unwrap();
        assert_eq!(seven.data, all.data);
        assert_eq!(all.config.moving_average, 1);
    }

    #[test]
    fn test_one_month_skips_empty_days() {
        let now = at(2025, 6, 15, 12);
        let snapshots = vec![
            snap(at(2025, 6, 1, 0), 26_000_000.0, 7800.0),
            snap(at(2025, 6, 10, 0), 28_000_000.0, 7800.0),
        ];

        let series = chart_data(TimeRange::OneMonth, &snapshots, now, None).unwrap();
        // Sparse output: only the two populated days appear.
        assert_eq!(series.data.len(), 2);
        assert_eq!(series.config.moving_average, 12);
        assert_eq!(series.data[0].value, Some(26));
        assert_eq!(series.data[1].value, Some(28));
        assert!(series.data[0].timestamp.ends_with("T12:00:00.000Z"));
    }

    #[test]
    fn test_ytd_fills_empty_months_with_placeholder() {
        let now = at(2025, 4, 20, 9);
        // Data only in February.
        let snapshots = vec![snap(at(2025, 2, 10, 0), 30_000_000.0, 9000.0)];

        let series = chart_data(TimeRange::YearToDate, &snapshots, now, None).unwrap();
        assert_eq!(series.data.len(), 4); // Jan..Apr

        // January is empty: placeholder instead of a gap.
        assert_eq!(series.data[0].value, Some(24));
        assert_eq!(series.data[0].apr, 8.5);
        assert_eq!(series.data[0].timestamp, "2025-01-15T12:00:00.000Z");

        // February carries the real value.
        assert_eq!(series.data[1].value, Some(30));
        assert_eq!(series.data[1].timestamp, "2025-02-15T12:00:00.000Z");
    }

    #[test]
    fn test_monthly_skips_empty_months() {
        let now = at(2025, 6, 15, 12);
        let snapshots = vec![
            snap(at(2025, 4, 2, 0), 26_000_000.0, 7800.0),
            snap(at(2025, 4, 3, 0), 30_000_000.0, 7800.0),
        ];

        let series = chart_data(TimeRange::ThreeMonths, &snapshots, now, None).unwrap();
        // March and May have no data and are omitted; only April emits.
        // The April 3rd window reaches back to April 2nd, so the bucket
        // averages the 26M point and the 28M smoothed point.
        assert_eq!(series.data.len(), 1);
        assert_eq!(series.data[0].value, Some(27));
        assert_eq!(series.data[0].timestamp, "2025-04-15T12:00:00.000Z");
        assert_eq!(series.config.moving_average, 24);
    }

    #[test]
    fn test_custom_requires_range() {
        let now = at(2025, 6, 15, 12);
        let err = chart_data(TimeRange::Custom, &[], now, None).unwrap_err();
        assert_eq!(err, MetricsError::MissingCustomRange);
    }

    #[test]
    fn test_custom_rejects_malformed_dates() {
        let now = at(2025, 6, 15, 12);
        for bad in ["2025/01/01", "01-01-2025", "2025-1-1", "not-a-date"] {
            let range = CustomRange {
                from: bad.to_string(),
                to: "2025-02-01".to_string(),
            };
            let err = chart_data(TimeRange::Custom, &[], now, Some(&range)).unwrap_err();
            assert_eq!(err, MetricsError::InvalidDateRange(bad.to_string()));
        }
    }

    #[test]
    fn test_custom_short_span_buckets_daily() {
        let now = at(2025, 6, 15, 12);
        let range = CustomRange {
            from: "2025-06-01".to_string(),
            to: "2025-06-05".to_string(),
        };
        let snapshots = vec![snap(at(2025, 6, 3, 0), 30_000_000.0, 9000.0)];

        let series = chart_data(TimeRange::Custom, &snapshots, now, Some(&range)).unwrap();
        // Inclusive bounds: 5 daily buckets, empty ones filled with the
        // placeholder.
        assert_eq!(series.data.len(), 5);
        assert_eq!(series.config.moving_average, 1);
        assert_eq!(series.data[0].value, Some(24));
        assert_eq!(series.data[2].value, Some(30));
        assert_eq!(series.config.from.as_deref(), Some("2025-06-01"));
        assert_eq!(series.config.to.as_deref(), Some("2025-06-05"));
    }

    #[test]
    fn test_custom_long_span_buckets_monthly() {
        let now = at(2025, 6, 15, 12);
        let range = CustomRange {
            from: "2025-01-01".to_string(),
            to: "2025-04-10".to_string(),
        };
        let snapshots = vec![snap(at(2025, 3, 10, 0), 30_000_000.0, 9000.0)];

        let series = chart_data(TimeRange::Custom, &snapshots, now, Some(&range)).unwrap();
        // Jan..Apr inclusive, one mid-month point each.
        assert_eq!(series.data.len(), 4);
        assert_eq!(series.config.moving_average, 24);
        assert_eq!(series.data[2].value, Some(30));
        assert_eq!(series.data[0].timestamp, "2025-01-15T12:00:00.000Z");
    }

    #[test]
    fn test_custom_window_hours_boundaries() {
        // 15 days is still hourly smoothing, 16 switches to 12h, 45 holds,
        // 46 switches to daily.
        let cases = [
            ("2025-06-01", "2025-06-16", 1),
            ("2025-06-01", "2025-06-17", 12),
            ("2025-05-01", "2025-06-15", 12),
            ("2025-05-01", "2025-06-16", 24),
        ];
        let now = at(2025, 7, 1, 0);
        for (from, to, expected_hours) in cases {
            let range = CustomRange {
                from: from.to_string(),
                to: to.to_string(),
            };
            let series = chart_data(TimeRange::Custom, &[], now, Some(&range)).unwrap();
            assert_eq!(
                series.config.moving_average, expected_hours,
                "span {from}..{to}"
            );
        }
    }

    #[test]
    fn test_query_window_bounds() {
        let now = at(2025, 6, 15, 12);

        let (from, to) = query_window(TimeRange::SevenDays, now, None).unwrap();
        assert_eq!(from, now - Duration::days(7));
        assert_eq!(to, now);

        let (from, _) = query_window(TimeRange::YearToDate, now, None).unwrap();
        assert_eq!(from, at(2025, 1, 1, 0));

        let (from, _) = query_window(TimeRange::ThreeMonths, now, None).unwrap();
        assert_eq!(from, at(2025, 3, 1, 0));

        let (from, _) = query_window(TimeRange::OneYear, now, None).unwrap();
        assert_eq!(from, at(2024, 6, 1, 0));

        let range = CustomRange {
            from: "2025-02-01".to_string(),
            to: "2025-02-20".to_string(),
        };
        let (from, to) = query_window(TimeRange::Custom, now, Some(&range)).unwrap();
        assert_eq!(from, at(2025, 2, 1, 0));
        assert_eq!(to, at(2025, 2, 20, 0));

        assert_eq!(
            query_window(TimeRange::Custom, now, None).unwrap_err(),
            MetricsError::MissingCustomRange
        );
    }

    #[test]
    fn test_y_axis_reflects_tallest_bucket() {
        let now = at(2025, 6, 15, 12);
        let snapshots = vec![snap(at(2025, 6, 12, 0), 80_000_000.0, 9000.0)];

        let series = chart_data(TimeRange::SevenDays, &snapshots, now, None).unwrap();
        // 80 * 1.15 = 92 -> next multiple of five is 95.
        assert_eq!(series.config.y_axis_max, 95);
    }
}
