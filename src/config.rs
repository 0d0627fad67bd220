//! Configuration management with YAML support

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log spec, e.g. "info" or "warn,habit_tracker=debug"; RUST_LOG wins
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to files in this directory instead of stderr
    #[serde(default)]
    pub directory: Option<String>,
}

// Default value functions
fn default_database_path() -> String {
    "~/.local/share/habit-tracker/habits.db".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./habit-tracker.yaml (current directory)
    /// 3. ~/.config/habit-tracker/habit-tracker.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "habit-tracker.yaml".to_string(),
            shellexpand::tilde("~/.config/habit-tracker/habit-tracker.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)
                    .with_context(|| format!("Failed to read config {}", search_path))?;
                let config: Config = serde_yaml::from_str(&content)
                    .with_context(|| format!("Invalid config {}", search_path))?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database.path).to_string())
    }

    /// Get the log directory, if file logging is configured
    pub fn log_directory(&self) -> Option<PathBuf> {
        self.logging
            .directory
            .as_ref()
            .map(|d| PathBuf::from(shellexpand::tilde(d).to_string()))
    }
}
