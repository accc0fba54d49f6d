use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sentora_db::models::{PairSummaryRow, Snapshot};
use sentora_metrics::AprPoint;

/// Snapshot listing plus its row count
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SnapshotListDTO {
    pub snapshots: Vec<Snapshot>,
    pub count: usize,
}

/// Smoothed APR series for one pair
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AprSeriesDTO {
    pub points: Vec<AprPoint>,
    pub count: usize,
    pub moving_average_hours: u32,
}

/// APR series of one pair inside the all-pairs response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PairAprDTO {
    pub pair_address: String,
    pub apr_data: Vec<AprPoint>,
    pub snapshot_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllPairsAprDTO {
    pub pairs: Vec<PairAprDTO>,
    pub moving_average_hours: u32,
    pub total_pairs: usize,
}

/// Per-pair ingestion coverage shown in the pairs listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PairSummaryDTO {
    pub pair_address: String,
    pub snapshot_count: i64,
    pub first_snapshot: Option<DateTime<Utc>>,
    pub last_snapshot: Option<DateTime<Utc>>,
}

impl From<PairSummaryRow> for PairSummaryDTO {
    fn from(row: PairSummaryRow) -> Self {
        let (pair_address, snapshot_count, first_snapshot, last_snapshot) = row;
        Self {
            pair_address,
            snapshot_count,
            first_snapshot,
            last_snapshot,
        }
    }
}

/// Health of the snapshot ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatsDTO {
    pub total_snapshots: i64,
    pub unique_pairs: usize,
    pub last_snapshot_at: Option<DateTime<Utc>>,
    pub configured_pairs: usize,
}
