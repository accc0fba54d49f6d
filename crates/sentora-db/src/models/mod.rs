pub mod snapshot;

pub use snapshot::{NewSnapshot, PairSummaryRow, Snapshot};
