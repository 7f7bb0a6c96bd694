//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments (applied on top by the CLI)
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Naming and output settings for generated artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Output directory, resolved under the project root
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Suffix appended to the entity name for the root state
    #[serde(default = "default_initial_state_name")]
    pub initial_state_name: String,

    /// Suffix used for the generated class and its namespace segment
    #[serde(default = "default_config_name")]
    pub config_name: String,
}

/// Source tree scanning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Interface implemented by query-object classes
    #[serde(default = "default_interface_name")]
    pub interface_name: String,

    /// Directories whose name contains this marker are searched first
    #[serde(default = "default_preferred_dir_marker")]
    pub preferred_dir_marker: String,

    /// Source file extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

// Default value functions

fn default_output_dir() -> String {
    "IncludeConfig".to_string()
}

fn default_initial_state_name() -> String {
    "InitialState".to_string()
}

fn default_config_name() -> String {
    "RelationsConfig".to_string()
}

fn default_interface_name() -> String {
    "IQueryObject".to_string()
}

fn default_preferred_dir_marker() -> String {
    "DAL".to_string()
}

fn default_extension() -> String {
    "cs".to_string()
}

// Default implementations

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            initial_state_name: default_initial_state_name(),
            config_name: default_config_name(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            interface_name: default_interface_name(),
            preferred_dir_marker: default_preferred_dir_marker(),
            extension: default_extension(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
            file: path.clone(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./relation-config-gen.toml
    /// 2. ~/.relation-config-gen/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("relation-config-gen.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".relation-config-gen").join("config.toml"));
        }

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Reject values that would produce unusable identifiers or paths
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("generator.output_dir", &self.generator.output_dir),
            ("generator.config_name", &self.generator.config_name),
            ("discovery.interface_name", &self.discovery.interface_name),
            ("discovery.extension", &self.discovery.extension),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", key)));
            }
        }

        Ok(())
    }
}
