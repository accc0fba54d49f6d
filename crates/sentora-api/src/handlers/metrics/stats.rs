use axum::{Json, extract::State, response::IntoResponse};

use sentora_db::{SentoraPool, models::Snapshot};

use crate::{
    AppState,
    dto::{ApiResponse, ServiceStatsDTO},
    errors::ApiError,
};

#[utoipa::path(
    get,
    path = "/metrics/stats",
    tag = "Metrics",
    responses(
        (status = 200, description = "Snapshot ingestion statistics", body = ServiceStatsDTO),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_service_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let (total_snapshots, unique_pairs, last_snapshot_at) = state
        .pool
        .interact_with_context("load service stats".to_string(), |conn| {
            let total = Snapshot::count_all(conn)?;
            let pairs = Snapshot::pair_summaries(conn)?;
            let last = Snapshot::latest_timestamp(conn)?;
            diesel::QueryResult::Ok((total, pairs.len(), last))
        })
        .await?;

    Ok(Json(ApiResponse::ok(ServiceStatsDTO {
        total_snapshots,
        unique_pairs,
        last_snapshot_at,
        configured_pairs: state.pairs.len(),
    })))
}
