use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::database::Database;

/// Application configuration module
/// This module handles loading, validating and saving the settings the
/// dictionary store is opened with.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Store settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Database settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Database file; the user's data directory is used when absent
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How long a writer waits for a locked database, in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Busy timeout as a duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Resolve the database file location
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Database::default_database_path()
                .context("Failed to determine default database location"),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.database.busy_timeout_ms == 0 {
            return Err(anyhow!("database.busy_timeout_ms must be greater than zero"));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("database.path must not be empty when set"));
            }
            if path.is_dir() {
                return Err(anyhow!("database.path points to a directory: {:?}", path));
            }
        }

        Ok(())
    }

    /// Load the configuration file, writing a default one if it is missing
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let file = File::open(config_path)
                .with_context(|| format!("Failed to open config file: {:?}", config_path))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", config_path))?;

        Ok(config)
    }
}
