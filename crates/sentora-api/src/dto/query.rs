use serde::Deserialize;
use utoipa::ToSchema;

use sentora_db::types::TimeRange;

/// Query parameters for the snapshots listing endpoint. Dates accept
/// RFC 3339 or plain `YYYY-MM-DD`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotsQuery {
    pub pair_address: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Query parameters for the single-pair APR series endpoint
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AprQuery {
    pub pair_address: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Moving-average window in hours
    pub moving_average: Option<u32>,
}

/// Query parameters for the all-pairs APR endpoint
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AprAllQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub moving_average: Option<u32>,
}

/// Query parameters for the annualized-returns endpoint
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsQuery {
    pub pair_address: Option<String>,
}

/// Query parameters for the chart endpoint. `from`/`to` are only
/// meaningful (and required) for the `custom` time range.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    pub time_range: TimeRange,
    pub from: Option<String>,
    pub to: Option<String>,
}
