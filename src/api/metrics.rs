//! Aggregation endpoints.

use crate::{api::AppState, api::error::ApiError, core::aggregation::MetricResponse};
use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::error;

/// Creates the `/metrics` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics/assets/count-by-type", get(hardware_by_type))
        .route(
            "/metrics/assets/type-distribution-chart",
            get(hardware_type_chart),
        )
        .route(
            "/metrics/employees/count-by-department",
            get(employees_by_department),
        )
        .route(
            "/metrics/licenses/count-by-software",
            get(licenses_by_software),
        )
}

async fn hardware_by_type(State(state): State<AppState>) -> Json<MetricResponse> {
    Json(state.service.hardware_by_type().await)
}

async fn employees_by_department(State(state): State<AppState>) -> Json<MetricResponse> {
    Json(state.service.employees_by_department().await)
}

async fn licenses_by_software(State(state): State<AppState>) -> Json<MetricResponse> {
    Json(state.service.licenses_by_software().await)
}

async fn hardware_type_chart(State(state): State<AppState>) -> Result<Response, ApiError> {
    let png = state
        .service
        .hardware_type_chart()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to render hardware type chart"))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
