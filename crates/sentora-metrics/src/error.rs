use thiserror::Error;

/// Validation failures of the chart inputs. These are the only hard
/// errors the computation layer can produce; empty inputs always resolve
/// to zeroed or defaulted outputs instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateRange(String),

    #[error("custom time range requires both 'from' and 'to' dates")]
    MissingCustomRange,
}
