/// Database connection and table creation
pub mod database;

/// Application settings from config.toml and environment variables
pub mod settings;

pub use settings::{AppConfig, ChartConfig, SourceConfig, load_app_configuration};
