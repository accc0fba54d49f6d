use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sentora_db::models::Snapshot;

/// Compounded annual return per lookback period, each clamped to
/// `[0, 100]` percent. The clamp is a product decision: the dashboard
/// never shows negative or triple-digit annualized returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualizedReturns {
    pub all_time: f64,
    pub thirty_day: f64,
    pub seven_day: f64,
    pub twenty_four_hour: f64,
}

const HOURS_PER_YEAR: f64 = 365.0 * 24.0;

/// Annualize the liquidity growth observed over each of the four
/// lookback periods (24h, 7d, 30d, and 365d as the all-time ceiling).
///
/// A period with fewer than two snapshots, or whose starting liquidity is
/// not positive, contributes 0.
pub fn annualized_returns(snapshots: &[Snapshot], now: DateTime<Utc>) -> AnnualizedReturns {
    AnnualizedReturns {
        all_time: period_return(snapshots, now, 24 * 365),
        thirty_day: period_return(snapshots, now, 24 * 30),
        seven_day: period_return(snapshots, now, 24 * 7),
        twenty_four_hour: period_return(snapshots, now, 24),
    }
}

fn period_return(snapshots: &[Snapshot], now: DateTime<Utc>, period_hours: i64) -> f64 {
    let cutoff = now - Duration::hours(period_hours);

    let mut in_period: Vec<&Snapshot> = snapshots
        .iter()
        .filter(|s| s.timestamp >= cutoff)
        .collect();
    if in_period.len() < 2 {
        return 0.0;
    }
    in_period.sort_by_key(|s| s.timestamp);

    let initial_value = in_period[0].liquidity;
    let final_value = in_period[in_period.len() - 1].liquidity;
    if initial_value <= 0.0 {
        return 0.0;
    }

    let period_return = (final_value - initial_value) / initial_value;
    let periods_per_year = HOURS_PER_YEAR / period_hours as f64;
    let annualized = ((1.0 + period_return).powf(periods_per_year) - 1.0) * 100.0;

    annualized.clamp(0.0, 100.0)
}
