use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use sentora_db::models::Snapshot;

use crate::apr::apr_with_moving_average;

/// Liquidity/APR pair summarizing one bucket of snapshots
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BucketStats {
    pub liquidity: f64,
    pub apr: f64,
}

/// Dashboard placeholder shown when a bucket has no observations at all
pub(crate) const FALLBACK_STATS: BucketStats = BucketStats {
    liquidity: 24_000_000.0,
    apr: 8.5,
};

/// Summarize a bucket by running the moving-average APR over its
/// snapshots and averaging the resulting points. `None` when the bucket
/// is empty, so callers can pick their own fallback policy.
pub(crate) fn bucket_stats(snapshots: &[Snapshot], moving_hours: u32) -> Option<BucketStats> {
    let apr_points = apr_with_moving_average(snapshots, moving_hours);
    if apr_points.is_empty() {
        return None;
    }

    let liquidity =
        apr_points.iter().map(|p| p.liquidity).sum::<f64>() / apr_points.len() as f64;
    let apr = apr_points.iter().map(|p| p.apr).sum::<f64>() / apr_points.len() as f64;
    Some(BucketStats { liquidity, apr })
}

pub(crate) fn group_by_day(snapshots: &[Snapshot]) -> BTreeMap<NaiveDate, Vec<Snapshot>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<Snapshot>> = BTreeMap::new();
    for snapshot in snapshots {
        grouped
            .entry(snapshot.timestamp.date_naive())
            .or_default()
            .push(snapshot.clone());
    }
    grouped
}

pub(crate) fn group_by_month(snapshots: &[Snapshot]) -> BTreeMap<(i32, u32), Vec<Snapshot>> {
    let mut grouped: BTreeMap<(i32, u32), Vec<Snapshot>> = BTreeMap::new();
    for snapshot in snapshots {
        let key = (snapshot.timestamp.year(), snapshot.timestamp.month());
        grouped.entry(key).or_default().push(snapshot.clone());
    }
    grouped
}

/// Shift `(year, month)` by `delta` calendar months, normalizing across
/// year boundaries (delta may be negative).
pub(crate) const fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 + delta;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

pub(crate) fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("first of month is a valid UTC instant")
}

/// Mid-month noon, the canonical timestamp for monthly chart points
pub(crate) fn mid_month_noon(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0)
        .single()
        .expect("mid-month noon is a valid UTC instant")
}

pub(crate) fn at_midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

pub(crate) fn at_noon(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(12, 0, 0)
        .expect("noon is a valid time")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_month_across_year_boundaries() {
        assert_eq!(shift_month(2025, 6, -3), (2025, 3));
        assert_eq!(shift_month(2025, 2, -6), (2024, 8));
        assert_eq!(shift_month(2025, 1, -12), (2024, 1));
        assert_eq!(shift_month(2024, 11, 3), (2025, 2));
        assert_eq!(shift_month(2025, 12, 1), (2026, 1));
    }

    #[test]
    fn test_group_by_day_uses_utc_dates() {
        let snapshots = vec![
            Snapshot {
                id: 0,
                pair_address: "0xpair".to_string(),
                timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 23, 59, 59).single().unwrap(),
                liquidity: 1.0,
                volume: 0.0,
                fees: 0.0,
                created_at: None,
            },
            Snapshot {
                id: 0,
                pair_address: "0xpair".to_string(),
                timestamp: Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).single().unwrap(),
                liquidity: 2.0,
                volume: 0.0,
                fees: 0.0,
                created_at: None,
            },
        ];

        let grouped = group_by_day(&snapshots);
        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped[&NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()].len(),
            1
        );
    }
}
