use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sentora_db::models::Snapshot;

use crate::apr::apr_with_moving_average;

/// Absolute and relative change of a metric against a reference value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChangeMetric {
    pub value: f64,
    pub percentage: f64,
}

/// Dashboard summary derived from the most recent snapshots across all
/// monitored pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMetrics {
    pub total_allocation: f64,
    pub day_change: ChangeMetric,
    pub ytd_change: ChangeMetric,
    pub average_annualized_yield: f64,
    pub total_deployed: f64,
}

/// How many of the newest snapshots form the "current" allocation
const ALLOCATION_WINDOW: usize = 5;
/// How many of the newest snapshots feed the average yield estimate
const YIELD_WINDOW: usize = 10;
/// Safety multiplier applied on top of the historical liquidity peak
const DEPLOYED_BUFFER: f64 = 1.2;

/// Derive the dashboard summary from `recent`, the most recent snapshots
/// across all pairs ordered newest first (the caller fetches that slice,
/// typically 50 rows).
///
/// Empty input yields an all-zero summary, never an error.
pub fn global_metrics(recent: &[Snapshot], now: DateTime<Utc>) -> GlobalMetrics {
    if recent.is_empty() {
        return GlobalMetrics::default();
    }

    let head = &recent[..recent.len().min(ALLOCATION_WINDOW)];
    let total_allocation = mean_liquidity(head);

    // Day change: current allocation vs the average over the last 24h.
    let yesterday = now - Duration::hours(24);
    let yesterday_snapshots: Vec<Snapshot> = recent
        .iter()
        .filter(|s| s.timestamp >= yesterday && s.timestamp < now)
        .cloned()
        .collect();
    let yesterday_avg = if yesterday_snapshots.is_empty() {
        total_allocation
    } else {
        mean_liquidity(&yesterday_snapshots)
    };
    let day_change = change_against(total_allocation, yesterday_avg);

    // YTD change: current allocation vs the oldest observation of the
    // current year. Without any observation this year, half the current
    // allocation stands in as the year-start estimate.
    let year_start = Utc
        .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .single()
        .expect("January 1st is a valid UTC instant");
    let ytd_start_value = recent
        .iter()
        .filter(|s| s.timestamp >= year_start)
        .last()
        .map_or(total_allocation * 0.5, |s| s.liquidity);
    let ytd_change = change_against(total_allocation, ytd_start_value);

    // Average yield over the newest snapshots, smoothed with a 24h window.
    let yield_slice = &recent[..recent.len().min(YIELD_WINDOW)];
    let apr_points = apr_with_moving_average(yield_slice, 24);
    let average_annualized_yield = if apr_points.is_empty() {
        0.0
    } else {
        apr_points.iter().map(|p| p.apr).sum::<f64>() / apr_points.len() as f64
    };

    let max_liquidity = recent.iter().map(|s| s.liquidity).fold(0.0_f64, f64::max);
    let total_deployed = max_liquidity * DEPLOYED_BUFFER;

    GlobalMetrics {
        total_allocation,
        day_change,
        ytd_change,
        average_annualized_yield,
        total_deployed,
    }
}

fn mean_liquidity(snapshots: &[Snapshot]) -> f64 {
    snapshots.iter().map(|s| s.liquidity).sum::<f64>() / snapshots.len() as f64
}

fn change_against(current: f64, reference: f64) -> ChangeMetric {
    let value = current - reference;
    let percentage = if reference > 0.0 {
        value / reference * 100.0
    } else {
        0.0
    };
    ChangeMetric { value, percentage }
}
