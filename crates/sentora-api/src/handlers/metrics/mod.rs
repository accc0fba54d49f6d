pub mod apr;
pub mod chart;
pub mod global;
pub mod pairs;
pub mod returns;
pub mod snapshots;
pub mod stats;

pub use apr::{get_all_pairs_apr, get_apr};
pub use chart::get_chart;
pub use global::get_global_metrics;
pub use pairs::get_pairs;
pub use returns::get_annualized_returns;
pub use snapshots::get_snapshots;
pub use stats::get_service_stats;

/// Hard cap on rows loaded for snapshot and APR queries
pub(crate) const SNAPSHOT_QUERY_LIMIT: i64 = 1000;
