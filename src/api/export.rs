//! Document download endpoints.

use crate::{
    api::{AppState, error::ApiError},
    core::service::Attachment,
    errors::ErrorKind,
};
use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{error, info};

/// Media type of `.docx` files.
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// Media type of `.xlsx` files.
pub const XLSX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Creates the `/export` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/export/acta/word/:employee_id", get(employee_acta))
        .route("/export/report/excel", get(full_report))
}

fn attachment(media_type: &'static str, file: Attachment) -> Response {
    let disposition = format!("attachment; filename={}", file.filename);
    (
        [
            (header::CONTENT_TYPE, media_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

async fn employee_acta(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Result<Response, ApiError> {
    let acta = state
        .service
        .employee_acta(employee_id)
        .await
        .inspect_err(|e| match e.kind() {
            ErrorKind::NotFound => info!(employee_id, "Acta requested for unknown employee"),
            _ => error!(employee_id, error = %e, "Failed to generate acta"),
        })?;

    Ok(attachment(DOCX_MEDIA_TYPE, acta))
}

async fn full_report(State(state): State<AppState>) -> Result<Response, ApiError> {
    let export = state
        .service
        .full_export()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to generate full export"))?;

    Ok(attachment(XLSX_MEDIA_TYPE, export))
}
