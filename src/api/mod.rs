//! HTTP request layer.
//!
//! Maps routes onto [`ReportService`] operations. Handlers stay thin: they call
//! the service, log failures with context and convert errors into [`ApiError`]
//! responses.

use crate::core::service::ReportService;
use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod export;
pub mod health;
pub mod metrics;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Report operations over the cached tables
    pub service: Arc<ReportService>,
}

impl AppState {
    /// Wraps a service for sharing across handlers.
    #[must_use]
    pub fn new(service: ReportService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Builds the application router with tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(metrics::routes())
        .merge(export::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
