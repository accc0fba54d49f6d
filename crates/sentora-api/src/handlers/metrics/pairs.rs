use axum::{Json, extract::State, response::IntoResponse};

use sentora_db::{SentoraPool, models::Snapshot};

use crate::{
    AppState,
    dto::{ApiResponse, PairSummaryDTO},
    errors::ApiError,
};

#[utoipa::path(
    get,
    path = "/metrics/pairs",
    tag = "Metrics",
    responses(
        (status = 200, description = "Monitored pairs with ingestion coverage", body = Vec<PairSummaryDTO>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_pairs(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .pool
        .interact_with_context("list pair summaries".to_string(), Snapshot::pair_summaries)
        .await?;

    let pairs: Vec<PairSummaryDTO> = rows.into_iter().map(PairSummaryDTO::from).collect();
    Ok(Json(ApiResponse::ok(pairs)))
}
