//! Welcome and health check endpoints.

use crate::api::AppState;
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};

/// Greeting returned by `/`.
pub const WELCOME_MESSAGE: &str = "Bienvenido al API de Analítica de ActivosTIC";

/// Body of `/`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Greeting text
    pub message: String,
}

/// Body of `/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Creates the welcome and health routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
