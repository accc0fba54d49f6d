use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sentora_db::models::Snapshot;

use crate::round_to;

/// One smoothed APR observation: fee yield averaged over the snapshots
/// inside a backward-looking moving-average window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AprPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_address: Option<String>,
    /// Annualized fee yield in percent, rounded to 4 decimals
    pub apr: f64,
    /// Liquidity averaged over the window, in USD
    pub liquidity: f64,
    pub moving_average_hours: u32,
    pub snapshots_in_window: usize,
}

/// Compute the smoothed APR series for `snapshots` with a moving average
/// of `moving_hours`.
///
/// The window for snapshot `i` is `[t_i - moving_hours, t_i]`, inclusive
/// on both ends and never looking forward. `snapshots` must already be
/// sorted ascending by timestamp; this function never re-sorts. Every
/// input snapshot yields exactly one point since its own window always
/// contains at least itself, and a zero-liquidity window yields an APR of
/// exactly 0 rather than a division error.
pub fn apr_with_moving_average(snapshots: &[Snapshot], moving_hours: u32) -> Vec<AprPoint> {
    let mut apr_data = Vec::with_capacity(snapshots.len());

    for current in snapshots {
        let window_start = current.timestamp - Duration::hours(i64::from(moving_hours));

        let window: Vec<&Snapshot> = snapshots
            .iter()
            .filter(|s| s.timestamp >= window_start && s.timestamp <= current.timestamp)
            .collect();

        if window.is_empty() {
            continue;
        }

        let avg_fees = window.iter().map(|s| s.fees).sum::<f64>() / window.len() as f64;
        let avg_liquidity = window.iter().map(|s| s.liquidity).sum::<f64>() / window.len() as f64;

        let daily_rate = if avg_liquidity > 0.0 {
            avg_fees / avg_liquidity
        } else {
            0.0
        };
        let apr = daily_rate * 365.0 * 100.0;

        apr_data.push(AprPoint {
            timestamp: current.timestamp,
            pair_address: Some(current.pair_address.clone()),
            apr: round_to(apr, 4),
            liquidity: avg_liquidity,
            moving_average_hours: moving_hours,
            snapshots_in_window: window.len(),
        });
    }

    apr_data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(unix_secs: i64, liquidity: f64, fees: f64) -> Snapshot {
        Snapshot {
            id: 0,
            pair_address: "0xpair".to_string(),
            timestamp: DateTime::from_timestamp(unix_secs, 0).unwrap(),
            liquidity,
            volume: fees / 0.003,
            fees,
            created_at: None,
        }
    }

    #[test]
    fn test_two_snapshot_window() {
        let snapshots = vec![snap(0, 1000.0, 10.0), snap(3600, 1000.0, 20.0)];

        let points = apr_with_moving_average(&snapshots, 1);
        assert_eq!(points.len(), 2);

        // First point only sees itself: 10/1000 * 365 * 100 = 365%
        assert_eq!(points[0].apr, 365.0);
        assert_eq!(points[0].snapshots_in_window, 1);

        // Second window spans both snapshots: avg fees 15, avg liquidity
        // 1000, daily rate 0.015 -> 547.5%
        assert_eq!(points[1].apr, 547.5);
        assert_eq!(points[1].liquidity, 1000.0);
        assert_eq!(points[1].snapshots_in_window, 2);
    }

    #[test]
    fn test_one_point_per_snapshot() {
        let snapshots: Vec<Snapshot> = (0..10)
            .map(|i| snap(i64::from(i) * 86_400, 1_000_000.0, 300.0))
            .collect();

        let points = apr_with_moving_average(&snapshots, 24);
        assert_eq!(points.len(), snapshots.len());
        for (point, snapshot) in points.iter().zip(&snapshots) {
            assert_eq!(point.timestamp, snapshot.timestamp);
        }
    }

    #[test]
    fn test_zero_liquidity_yields_zero_apr() {
        let snapshots = vec![snap(0, 0.0, 50.0), snap(3600, 0.0, 70.0)];

        let points = apr_with_moving_average(&snapshots, 1);
        assert_eq!(points.len(), 2);
        for point in &points {
            assert_eq!(point.apr, 0.0);
            assert!(point.apr.is_finite());
        }
    }

    #[test]
    fn test_window_grows_backward_only() {
        // Three hourly snapshots; the 1h window of the middle one must not
        // include the future snapshot.
        let snapshots = vec![
            snap(0, 1000.0, 10.0),
            snap(3600, 1000.0, 10.0),
            snap(7200, 1000.0, 10.0),
        ];

        let points = apr_with_moving_average(&snapshots, 1);
        assert_eq!(points[1].snapshots_in_window, 2);
        assert_eq!(points[2].snapshots_in_window, 2);
    }

    #[test]
    fn test_window_count_monotonic_in_hours() {
        let snapshots: Vec<Snapshot> = (0..24)
            .map(|i| snap(i64::from(i) * 3600, 500_000.0 + f64::from(i), 150.0))
            .collect();

        let mut previous: Option<Vec<usize>> = None;
        for hours in [1, 6, 12, 24, 48] {
            let counts: Vec<usize> = apr_with_moving_average(&snapshots, hours)
                .iter()
                .map(|p| p.snapshots_in_window)
                .collect();
            if let Some(prev) = &previous {
                for (wide, narrow) in counts.iter().zip(prev) {
                    assert!(wide >= narrow);
                }
            }
            previous = Some(counts);
        }
    }

    #[test]
    fn test_pure_and_deterministic() {
        let snapshots: Vec<Snapshot> = (0..50)
            .map(|i| snap(i64::from(i) * 43_200, 2_000_000.0 + f64::from(i) * 10.0, 600.0))
            .collect();

        let first = apr_with_moving_average(&snapshots, 24);
        let second = apr_with_moving_average(&snapshots, 24);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_apr_rounded_to_four_decimals() {
        // 7/300000 * 36500 = 0.8516666... -> 0.8517
        let snapshots = vec![snap(0, 300_000.0, 7.0)];
        let points = apr_with_moving_average(&snapshots, 24);
        assert_eq!(points[0].apr, 0.8517);
    }
}
