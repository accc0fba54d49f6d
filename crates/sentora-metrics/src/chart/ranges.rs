use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use sentora_db::models::Snapshot;

use super::buckets::{
    BucketStats, FALLBACK_STATS, at_midnight, at_noon, bucket_stats, group_by_day,
    group_by_month, mid_month_noon, shift_month,
};
use super::{ChartDataPoint, DisplayType};
use crate::round_to;

/// Seven daily buckets ending yesterday, two points per day (midnight and
/// noon). A day without data falls back to the whole-range average, and a
/// fully empty range falls back to the dashboard placeholder. Also serves
/// the `All` range.
pub(super) fn seven_days(snapshots: &[Snapshot], now: DateTime<Utc>) -> Vec<ChartDataPoint> {
    let moving_hours = 1;
    let by_day = group_by_day(snapshots);
    let range_average = bucket_stats(snapshots, moving_hours);

    let start = now - Duration::days(7);
    let mut data = Vec::with_capacity(14);
    for i in 0..7 {
        let day = (start + Duration::days(i)).date_naive();
        let stats = by_day
            .get(&day)
            .and_then(|bucket| bucket_stats(bucket, moving_hours))
            .or(range_average)
            .unwrap_or(FALLBACK_STATS);

        data.push(chart_point(&stats, at_midnight(day), Some(DisplayType::Date)));
        data.push(chart_point(&stats, at_noon(day), Some(DisplayType::Hour)));
    }
    data
}

/// Thirty daily buckets, one noon point each. Days without data are
/// omitted entirely (sparse output, unlike the YTD fallback behavior).
pub(super) fn one_month(snapshots: &[Snapshot], now: DateTime<Utc>) -> Vec<ChartDataPoint> {
    let moving_hours = 12;
    let by_day = group_by_day(snapshots);

    let start = now - Duration::days(30);
    let mut data = Vec::with_capacity(30);
    for i in 0..30 {
        let day = (start + Duration::days(i)).date_naive();
        if let Some(stats) = by_day
            .get(&day)
            .and_then(|bucket| bucket_stats(bucket, moving_hours))
        {
            data.push(chart_point(&stats, at_noon(day), None));
        }
    }
    data
}

/// One mid-month point per calendar month over the last `months` months.
/// Months without data are omitted. Serves the 3m, 6m and 1y ranges.
pub(super) fn monthly(
    snapshots: &[Snapshot],
    now: DateTime<Utc>,
    months: i32,
) -> Vec<ChartDataPoint> {
    let moving_hours = 24;
    let by_month = group_by_month(snapshots);

    let (start_year, start_month) = shift_month(now.year(), now.month(), -months);
    let mut data = Vec::with_capacity(months as usize);
    for i in 0..months {
        let (year, month) = shift_month(start_year, start_month, i);
        if let Some(stats) = by_month
            .get(&(year, month))
            .and_then(|bucket| bucket_stats(bucket, moving_hours))
        {
            data.push(chart_point(&stats, mid_month_noon(year, month), None));
        }
    }
    data
}

/// One mid-month point per month from January through the current month.
/// Months without data emit the dashboard placeholder instead of a gap.
pub(super) fn year_to_date(snapshots: &[Snapshot], now: DateTime<Utc>) -> Vec<ChartDataPoint> {
    let moving_hours = 24;
    let by_month = group_by_month(snapshots);

    let mut data = Vec::with_capacity(now.month() as usize);
    for month in 1..=now.month() {
        let stats = by_month
            .get(&(now.year(), month))
            .and_then(|bucket| bucket_stats(bucket, moving_hours))
            .unwrap_or(FALLBACK_STATS);
        data.push(chart_point(&stats, mid_month_noon(now.year(), month), None));
    }
    data
}

/// Custom date span: daily noon buckets up to 30 days, mid-month buckets
/// beyond that. Empty buckets emit the dashboard placeholder. The window
/// is derived from the span: 1h up to 15 days, 12h up to 45, 24h after.
pub(super) fn custom(snapshots: &[Snapshot], from: NaiveDate, to: NaiveDate) -> Vec<ChartDataPoint> {
    let span_days = (to - from).num_days();
    let moving_hours = custom_window_hours(span_days);

    if span_days <= 30 {
        let by_day = group_by_day(snapshots);
        let mut data = Vec::new();
        for i in 0..=span_days {
            let day = from + Duration::days(i);
            let stats = by_day
                .get(&day)
                .and_then(|bucket| bucket_stats(bucket, moving_hours))
                .unwrap_or(FALLBACK_STATS);
            data.push(chart_point(&stats, at_noon(day), None));
        }
        data
    } else {
        let by_month = group_by_month(snapshots);
        let mut data = Vec::new();
        let mut cursor = (from.year(), from.month());
        let end = (to.year(), to.month());
        while cursor <= end {
            let stats = by_month
                .get(&cursor)
                .and_then(|bucket| bucket_stats(bucket, moving_hours))
                .unwrap_or(FALLBACK_STATS);
            data.push(chart_point(&stats, mid_month_noon(cursor.0, cursor.1), None));
            cursor = shift_month(cursor.0, cursor.1, 1);
        }
        data
    }
}

pub(super) const fn custom_window_hours(span_days: i64) -> u32 {
    if span_days <= 15 {
        1
    } else if span_days <= 45 {
        12
    } else {
        24
    }
}

fn chart_point(
    stats: &BucketStats,
    timestamp: DateTime<Utc>,
    display_type: Option<DisplayType>,
) -> ChartDataPoint {
    ChartDataPoint {
        value: Some((stats.liquidity / 1_000_000.0).round() as i64),
        apr: round_to(stats.apr, 1),
        timestamp: super::iso_millis(timestamp),
        display_type,
    }
}
