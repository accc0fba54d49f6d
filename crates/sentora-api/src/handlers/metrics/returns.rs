use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;

use sentora_db::{SentoraPool, models::Snapshot};
use sentora_metrics::{AnnualizedReturns, annualized_returns};

use crate::{
    AppState,
    dto::{ApiResponse, ReturnsQuery},
    errors::ApiError,
};

/// Enough history to cover every lookback period
const RETURNS_SNAPSHOT_COUNT: i64 = 200;

#[utoipa::path(
    get,
    path = "/metrics/annualized-returns",
    tag = "Metrics",
    params(
        ("pairAddress" = Option<String>, Query, description = "Restrict to one pair; all monitored pairs otherwise")
    ),
    responses(
        (status = 200, description = "Annualized returns per lookback period", body = AnnualizedReturns),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_annualized_returns(
    State(state): State<AppState>,
    Query(params): Query<ReturnsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let monitored = state.pairs.clone();
    let snapshots = state
        .pool
        .interact_with_context("load snapshots for returns".to_string(), move |conn| {
            match params.pair_address {
                Some(pair) => Snapshot::find_filtered(
                    Some(pair.as_str()),
                    None,
                    None,
                    RETURNS_SNAPSHOT_COUNT,
                    conn,
                ),
                None => Snapshot::find_latest_for_pairs(&monitored, RETURNS_SNAPSHOT_COUNT, conn),
            }
        })
        .await?;

    let returns = annualized_returns(&snapshots, Utc::now());
    Ok(Json(ApiResponse::ok(returns)))
}
