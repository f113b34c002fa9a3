//! Configuration module for Pricecast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Database and Training.

mod database_config;
mod server_config;
mod training_config;

pub use database_config::DatabaseEnvConfig;
pub use server_config::ServerEnvConfig;
pub use training_config::TrainingEnvConfig;

use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub database: DatabaseEnvConfig,
    pub training: TrainingEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::load(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            server: ServerEnvConfig::load(&var).context("Failed to load server config")?,
            database: DatabaseEnvConfig::load(&var).context("Failed to load database config")?,
            training: TrainingEnvConfig::load(&var).context("Failed to load training config")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::load(|_| None).unwrap();
        assert_eq!(config.server, ServerEnvConfig::default());
        assert_eq!(config.database, DatabaseEnvConfig::default());
        assert_eq!(config.training, TrainingEnvConfig::default());
    }

    #[test]
    fn test_config_error_names_the_section() {
        let err = Config::load(|key| (key == "LOOK_AHEAD").then(|| "0".to_string())).unwrap_err();
        assert!(format!("{:#}", err).contains("training config"));
    }
}
