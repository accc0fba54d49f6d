use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use sentora_db::{SentoraPool, models::Snapshot};
use sentora_metrics::apr_with_moving_average;

use crate::{
    AppState,
    dto::{AllPairsAprDTO, ApiResponse, AprAllQuery, AprQuery, AprSeriesDTO, PairAprDTO},
    errors::ApiError,
    helpers::parse_time_bound,
};

use super::SNAPSHOT_QUERY_LIMIT;

/// Window used when the client does not pass `movingAverage`
const DEFAULT_MOVING_AVERAGE_HOURS: u32 = 24;

#[utoipa::path(
    get,
    path = "/metrics/apr",
    tag = "Metrics",
    params(
        ("pairAddress" = String, Query, description = "Pair to compute the series for"),
        ("from" = Option<String>, Query, description = "Lower time bound (RFC 3339 or YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Upper time bound (RFC 3339 or YYYY-MM-DD)"),
        ("movingAverage" = Option<u32>, Query, description = "Moving-average window in hours", example = 24)
    ),
    responses(
        (status = 200, description = "Smoothed APR series", body = AprSeriesDTO),
        (status = 400, description = "Missing pair or invalid date bound"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_apr(
    State(state): State<AppState>,
    Query(params): Query<AprQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(pair_address) = params.pair_address else {
        return Err(ApiError::BadRequest("pairAddress is required".to_string()));
    };
    let from = parse_time_bound(params.from.as_deref())?;
    let to = parse_time_bound(params.to.as_deref())?;
    let moving_hours = params
        .moving_average
        .unwrap_or(DEFAULT_MOVING_AVERAGE_HOURS);

    let pair = pair_address.clone();
    let snapshots = state
        .pool
        .interact_with_context(
            format!("load APR snapshots for pair: {pair_address}"),
            move |conn| Snapshot::find_for_pair_asc(&pair, from, to, SNAPSHOT_QUERY_LIMIT, conn),
        )
        .await?;

    let points = apr_with_moving_average(&snapshots, moving_hours);
    Ok(Json(ApiResponse::ok(AprSeriesDTO {
        count: points.len(),
        points,
        moving_average_hours: moving_hours,
    })))
}

#[utoipa::path(
    get,
    path = "/metrics/apr/all",
    tag = "Metrics",
    params(
        ("from" = Option<String>, Query, description = "Lower time bound (RFC 3339 or YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Upper time bound (RFC 3339 or YYYY-MM-DD)"),
        ("movingAverage" = Option<u32>, Query, description = "Moving-average window in hours", example = 24)
    ),
    responses(
        (status = 200, description = "APR series per monitored pair", body = AllPairsAprDTO),
        (status = 400, description = "Invalid date bound"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_all_pairs_apr(
    State(state): State<AppState>,
    Query(params): Query<AprAllQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let from = parse_time_bound(params.from.as_deref())?;
    let to = parse_time_bound(params.to.as_deref())?;
    let moving_hours = params
        .moving_average
        .unwrap_or(DEFAULT_MOVING_AVERAGE_HOURS);

    let mut pairs = Vec::with_capacity(state.pairs.len());
    for pair_address in state.pairs.iter() {
        let pair = pair_address.clone();
        let snapshots = state
            .pool
            .interact_with_context(
                format!("load APR snapshots for pair: {pair_address}"),
                move |conn| {
                    Snapshot::find_for_pair_asc(&pair, from, to, SNAPSHOT_QUERY_LIMIT, conn)
                },
            )
            .await?;

        // Pairs with no observations yet are omitted from the response.
        if snapshots.is_empty() {
            continue;
        }

        pairs.push(PairAprDTO {
            pair_address: pair_address.clone(),
            apr_data: apr_with_moving_average(&snapshots, moving_hours),
            snapshot_count: snapshots.len(),
        });
    }

    Ok(Json(ApiResponse::ok(AllPairsAprDTO {
        total_pairs: pairs.len(),
        pairs,
        moving_average_hours: moving_hours,
    })))
}
