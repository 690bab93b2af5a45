#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for infraprov
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/infraprov/config.toml)
//! - Environment variables

pub mod core;
pub mod pipeline;

pub use crate::core::{NamingConfig, RestartConfig, RouteConfig, StorageConfig};
pub use pipeline::{PipelineConfig, StageKind};

use infraprov_errors::{ConfigError, Error};
use infraprov_types::RestartPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub restart: RestartConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub routes: RouteConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("infraprov").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// lists pipeline stages in an order that breaks their dependencies.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the stage order is unsound.
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Serialize configuration to a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError {
                error: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // INFRAPROV_RESTART_POLICY
        if let Ok(policy) = std::env::var("INFRAPROV_RESTART_POLICY") {
            self.restart.policy = match policy.as_str() {
                "always" => RestartPolicy::Always,
                "on_failure" => RestartPolicy::OnFailure,
                "never" => RestartPolicy::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "INFRAPROV_RESTART_POLICY".to_string(),
                        value: policy,
                    }
                    .into())
                }
            };
        }

        // INFRAPROV_STORAGE_ENABLED
        if let Ok(enabled) = std::env::var("INFRAPROV_STORAGE_ENABLED") {
            self.storage.enabled = parse_bool("INFRAPROV_STORAGE_ENABLED", enabled)?;
        }

        // INFRAPROV_ROUTE_DOMAIN
        if let Ok(domain) = std::env::var("INFRAPROV_ROUTE_DOMAIN") {
            if domain.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "INFRAPROV_ROUTE_DOMAIN".to_string(),
                    value: domain,
                }
                .into());
            }
            self.routes.domain = domain;
        }

        // INFRAPROV_ROUTE_TLS
        if let Ok(tls) = std::env::var("INFRAPROV_ROUTE_TLS") {
            self.routes.tls_enabled = parse_bool("INFRAPROV_ROUTE_TLS", tls)?;
        }

        Ok(())
    }
}

fn parse_bool(field: &str, value: String) -> Result<bool, Error> {
    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()),
    }
}
