use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;

use sentora_db::{SentoraPool, models::Snapshot};
use sentora_metrics::{GlobalMetrics, global_metrics};

use crate::{AppState, dto::ApiResponse, errors::ApiError};

/// How many recent snapshots feed the dashboard summary
const RECENT_SNAPSHOT_COUNT: i64 = 50;

#[utoipa::path(
    get,
    path = "/metrics/global",
    tag = "Metrics",
    responses(
        (status = 200, description = "Dashboard summary metrics", body = GlobalMetrics),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_global_metrics(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshots = state
        .pool
        .interact_with_context("load recent snapshots".to_string(), move |conn| {
            Snapshot::find_latest(RECENT_SNAPSHOT_COUNT, conn)
        })
        .await?;

    let metrics = global_metrics(&snapshots, Utc::now());
    Ok(Json(ApiResponse::ok(metrics)))
}
