use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;

use sentora_db::{SentoraPool, models::Snapshot, types::TimeRange};
use sentora_metrics::{ChartSeries, CustomRange, chart_data, query_window};

use crate::{
    AppState,
    dto::{ApiResponse, ChartQuery},
    errors::ApiError,
};

#[utoipa::path(
    get,
    path = "/metrics/chart",
    tag = "Metrics",
    params(
        ("timeRange" = TimeRange, Query, description = "Bucketing strategy", example = "7d"),
        ("from" = Option<String>, Query, description = "Custom range start (YYYY-MM-DD), custom only"),
        ("to" = Option<String>, Query, description = "Custom range end (YYYY-MM-DD), custom only")
    ),
    responses(
        (status = 200, description = "Bucketized chart series", body = ChartSeries),
        (status = 400, description = "Invalid time range or custom dates"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_chart(
    State(state): State<AppState>,
    Query(params): Query<ChartQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Utc::now();

    let custom = if params.time_range == TimeRange::Custom {
        match (params.from, params.to) {
            (Some(from), Some(to)) => Some(CustomRange { from, to }),
            _ => {
                return Err(ApiError::BadRequest(
                    "custom time range requires both 'from' and 'to' (YYYY-MM-DD)".to_string(),
                ));
            }
        }
    } else {
        None
    };

    let (from, to) = query_window(params.time_range, now, custom.as_ref())?;

    let pairs = state.pairs.as_ref().clone();
    let snapshots = state
        .pool
        .interact_with_context("load chart snapshots".to_string(), move |conn| {
            Snapshot::find_range_asc(&pairs, from, to, conn)
        })
        .await?;

    let series = chart_data(params.time_range, &snapshots, now, custom.as_ref())?;
    Ok(Json(ApiResponse::ok(series)))
}
