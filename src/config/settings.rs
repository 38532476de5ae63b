//! Application settings.
//!
//! Settings come from an optional `config.toml`, then environment variables
//! override individual values. A missing file means defaults; a malformed file
//! or an unparsable bind address is a fatal [`Error::Config`].

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file read when `ANALYTICS_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Listen address when none is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
/// CSV directory when none is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Environment variable names.
pub mod env {
    /// Overrides `bind_address`
    pub const BIND_ADDRESS: &str = "ANALYTICS_BIND_ADDRESS";
    /// Switches to a CSV source in this directory
    pub const DATA_DIR: &str = "ANALYTICS_DATA_DIR";
    /// Switches to a database source at this URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Overrides `chart.font_dir`
    pub const FONT_DIR: &str = "ANALYTICS_FONT_DIR";
    /// Path of the config file
    pub const CONFIG: &str = "ANALYTICS_CONFIG";
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `host:port` the HTTP server listens on
    pub bind_address: String,
    /// Where tables are read from
    pub source: SourceConfig,
    /// Chart rendering options
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            source: SourceConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses `bind_address`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| Error::Config {
            message: format!("Invalid bind address '{}': {e}", self.bind_address),
        })
    }
}

/// Table source selection, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// One CSV file per table
    Csv {
        /// Directory holding `employees.csv` and friends
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,
    },
    /// A SQLite database owned by the system of record
    Database {
        /// Connection URL, e.g. `sqlite://assets.sqlite?mode=ro`
        url: String,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Csv {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Chart rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Extra directory of fonts loaded on top of the system fonts
    pub font_dir: Option<PathBuf>,
}

/// Parses a TOML configuration document.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Reads and parses the configuration file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Applies environment overrides to `config`.
///
/// `lookup` returns the value of a variable; empty values are ignored. When
/// both `ANALYTICS_DATA_DIR` and `DATABASE_URL` are set the database wins.
#[must_use]
pub fn apply_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(bind_address) = var(env::BIND_ADDRESS) {
        config.bind_address = bind_address;
    }
    if let Some(data_dir) = var(env::DATA_DIR) {
        config.source = SourceConfig::Csv {
            data_dir: PathBuf::from(data_dir),
        };
    }
    if let Some(url) = var(env::DATABASE_URL) {
        config.source = SourceConfig::Database { url };
    }
    if let Some(font_dir) = var(env::FONT_DIR) {
        config.chart.font_dir = Some(PathBuf::from(font_dir));
    }
    config
}

/// Loads the application configuration from the config file and process
/// environment, validating the bind address.
pub fn load_app_configuration() -> Result<AppConfig> {
    resolve(|name| std::env::var(name).ok())
}

fn resolve<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let path = lookup(env::CONFIG).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let file_config = if Path::new(&path).exists() {
        info!("Loading configuration from {}", path);
        load_config(&path)?
    } else {
        info!("No configuration file at {}; using defaults", path);
        AppConfig::default()
    };

    let config = apply_overrides(file_config, lookup);
    config.socket_addr()?;
    Ok(config)
}
