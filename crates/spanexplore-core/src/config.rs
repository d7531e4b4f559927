//! Configuration management for SpanExplore

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::query::OrganizationFeatures;

/// Environment variable prefix; nested keys use `__`, e.g. `SPANEXPLORE__SERVER__HTTP_PORT`
pub const ENV_PREFIX: &str = "SPANEXPLORE";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Explore view configuration
    pub explore: ExploreConfig,
}

impl Config {
    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// With no explicit `path`, `config.toml` in the platform config
    /// directory is used when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Self::default())?);

        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                builder = builder.add_source(::config::File::from(path));
            }
            None => {
                if let Some(path) = default_config_path().filter(|p| p.exists()) {
                    debug!(path = %path.display(), "Loading default configuration file");
                    builder = builder.add_source(::config::File::from(path));
                }
            }
        }

        let config = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("explore.organization_features")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }
}

/// `config.toml` in the platform config directory, if one can be determined
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "spanexplore", "spanexplore")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8080,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Explore view configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    /// Features enabled for the organization served by this instance
    pub organization_features: Vec<String>,
}

impl ExploreConfig {
    /// Feature set built from the configured flags
    pub fn features(&self) -> OrganizationFeatures {
        self.organization_features.iter().cloned().collect()
    }
}
