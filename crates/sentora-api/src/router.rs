use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;

use utoipa::OpenApi as OpenApiT;
use utoipa_swagger_ui::SwaggerUi;

use crate::{AppState, handlers};

pub fn api_router<T: OpenApiT>(_state: AppState) -> Router<AppState> {
    let open_api = T::openapi();

    // All dashboard endpoints live under a dedicated "/metrics" router
    let metrics_router = Router::new()
        .route("/snapshots", get(handlers::get_snapshots))
        .route("/pairs", get(handlers::get_pairs))
        .route("/apr", get(handlers::get_apr))
        .route("/apr/all", get(handlers::get_all_pairs_apr))
        .route("/global", get(handlers::get_global_metrics))
        .route("/annualized-returns", get(handlers::get_annualized_returns))
        .route("/chart", get(handlers::get_chart))
        .route("/stats", get(handlers::get_service_stats));

    Router::new()
        .route("/health", get(health))
        .nest("/v1/metrics", metrics_router)
        .merge(SwaggerUi::new("/v1/docs").url("/v1/docs/openapi.json", open_api))
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
