/// Per-employee assignment record
pub mod acta;
/// Group-by counts over cached tables
pub mod aggregation;
/// Lazily loaded, process-lifetime table cache
pub mod cache;
/// Bar chart rendering to PNG
pub mod chart;
/// Document model and `.docx` writer
pub mod document;
/// Multi-sheet `.xlsx` export
pub mod export;
/// Typed records and tables
pub mod records;
/// Report operations used by the HTTP layer
pub mod service;
/// CSV and database table sources
pub mod source;

use crate::errors::{Error, Result};

/// Runs blocking file I/O or CPU-bound rendering off the async workers.
pub(crate) async fn blocking<T, F>(task: &'static str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::render(format!("{task} task failed: {e}")))?
}
