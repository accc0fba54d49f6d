//! Pure, clock-free computations behind the dashboard endpoints.
//!
//! Every function here takes already-fetched snapshots plus an explicit
//! `now` and returns plain data. Nothing in this crate touches the
//! database, the wall clock, or a logger; concurrency safety comes for
//! free from the absence of shared state.

pub mod apr;
pub mod chart;
pub mod error;
pub mod global;
pub mod returns;

pub use apr::{AprPoint, apr_with_moving_average};
pub use chart::{
    ChartConfig, ChartDataPoint, ChartSeries, CustomRange, DisplayType, chart_data, query_window,
    y_axis_max,
};
pub use error::MetricsError;
pub use global::{ChangeMetric, GlobalMetrics, global_metrics};
pub use returns::{AnnualizedReturns, annualized_returns};

/// Round to a fixed number of decimal places, the way the wire format
/// expects APR values (4 decimals for raw series, 1 for chart points).
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
