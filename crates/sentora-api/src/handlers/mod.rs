pub mod metrics;

pub use metrics::{
    get_all_pairs_apr, get_annualized_returns, get_apr, get_chart, get_global_metrics, get_pairs,
    get_service_stats, get_snapshots,
};
