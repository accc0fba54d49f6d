use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use sentora_db::{SentoraPool, models::Snapshot};

use crate::{
    AppState,
    dto::{ApiResponse, SnapshotListDTO, SnapshotsQuery},
    errors::ApiError,
    helpers::parse_time_bound,
};

use super::SNAPSHOT_QUERY_LIMIT;

#[utoipa::path(
    get,
    path = "/metrics/snapshots",
    tag = "Metrics",
    params(
        ("pairAddress" = Option<String>, Query, description = "Restrict to one pair"),
        ("from" = Option<String>, Query, description = "Lower time bound (RFC 3339 or YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Upper time bound (RFC 3339 or YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Latest snapshots, newest first", body = SnapshotListDTO),
        (status = 400, description = "Invalid date bound"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_snapshots(
    State(state): State<AppState>,
    Query(params): Query<SnapshotsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let from = parse_time_bound(params.from.as_deref())?;
    let to = parse_time_bound(params.to.as_deref())?;
    let pair_address = params.pair_address;

    let snapshots = state
        .pool
        .interact_with_context("list snapshots".to_string(), move |conn| {
            Snapshot::find_filtered(
                pair_address.as_deref(),
                from,
                to,
                SNAPSHOT_QUERY_LIMIT,
                conn,
            )
        })
        .await?;

    let count = snapshots.len();
    Ok(Json(ApiResponse::ok(SnapshotListDTO { snapshots, count })))
}
