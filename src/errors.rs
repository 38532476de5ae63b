//! Unified error types for the analytics service.
//!
//! Every fallible operation returns [`Result`]. Errors are grouped into a small
//! set of [`ErrorKind`]s so the request layer can map them to response codes
//! without inspecting individual variants.

use thiserror::Error;

/// Coarse classification used at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A tabular source could not be read.
    SourceUnavailable,
    /// A requested entity does not exist.
    NotFound,
    /// Chart or document assembly failed.
    RenderFailure,
    /// Invalid startup configuration.
    Config,
}

/// Application error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Source for table '{table}' unavailable: {message}")]
    SourceUnavailable { table: &'static str, message: String },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Render failure: {message}")]
    RenderFailure { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("DOCX package error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("PNG encoding error: {0}")]
    Png(String),

    #[error("SVG error: {0}")]
    Svg(#[from] usvg::Error),
}

impl Error {
    /// Classifies this error for the request layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::SourceUnavailable { .. } | Self::Io(_) | Self::Database(_) | Self::Csv(_) => {
                ErrorKind::SourceUnavailable
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RenderFailure { .. }
            | Self::Xlsx(_)
            | Self::Zip(_)
            | Self::Png(_)
            | Self::Svg(_) => ErrorKind::RenderFailure,
        }
    }

    /// Shorthand for a [`Error::RenderFailure`] with a formatted message.
    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderFailure {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
