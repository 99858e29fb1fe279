//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/habitrail/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/habitrail/` (~/.config/habitrail/)
//! - Data: `$XDG_DATA_HOME/habitrail/` (~/.local/share/habitrail/)
//! - State/Logs: `$XDG_STATE_HOME/habitrail/` (~/.local/state/habitrail/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analytics window defaults
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Sharing configuration
    #[serde(default)]
    pub sharing: SharingConfig,

    /// Identity used when creating shares
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Window sizes used by the stats views
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Completion-rate window in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Weekly heatmap lookback in days
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Number of months in the trend series
    #[serde(default = "default_trend_months")]
    pub trend_months: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            lookback_days: default_lookback_days(),
            trend_months: default_trend_months(),
        }
    }
}

fn default_window_days() -> u32 {
    30
}

fn default_lookback_days() -> u32 {
    70
}

fn default_trend_months() -> u32 {
    6
}

/// Share-code behavior
#[derive(Debug, Deserialize)]
pub struct SharingConfig {
    /// Days before a share code expires
    #[serde(default = "default_expiry_days")]
    pub expiry_days: u32,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            expiry_days: default_expiry_days(),
        }
    }
}

fn default_expiry_days() -> u32 {
    7
}

/// Identity attached to outgoing shares
#[derive(Debug, Deserialize, Default)]
pub struct ProfileConfig {
    /// Email or display identity; falls back to the OS username
    pub identity: Option<String>,
}

impl ProfileConfig {
    /// The identity to stamp on shares.
    pub fn identity_or_default(&self) -> String {
        self.identity.clone().unwrap_or_else(|| {
            std::env::var("USER").unwrap_or_else(|_| "anonymous".to_string())
        })
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/habitrail/config.toml` (~/.config/habitrail/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("habitrail").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database)
    ///
    /// `$XDG_DATA_HOME/habitrail/` (~/.local/share/habitrail/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("habitrail")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/habitrail/` (~/.local/state/habitrail/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("habitrail")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/habitrail/habits.db` (~/.local/share/habitrail/habits.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("habits.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/habitrail/habitrail.log` (~/.local/state/habitrail/habitrail.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("habitrail.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analytics.window_days, 30);
        assert_eq!(config.analytics.lookback_days, 70);
        assert_eq!(config.analytics.trend_months, 6);
        assert_eq!(config.sharing.expiry_days, 7);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analytics]
window_days = 14
trend_months = 12

[sharing]
expiry_days = 30

[profile]
identity = "ann@example.com"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.analytics.window_days, 14);
        assert_eq!(config.analytics.trend_months, 12);
        // Unset fields keep their defaults
        assert_eq!(config.analytics.lookback_days, 70);
        assert_eq!(config.sharing.expiry_days, 30);
        assert_eq!(config.profile.identity.as_deref(), Some("ann@example.com"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_identity_fallback() {
        let profile = ProfileConfig {
            identity: Some("ann@example.com".to_string()),
        };
        assert_eq!(profile.identity_or_default(), "ann@example.com");

        let empty = ProfileConfig::default();
        assert!(!empty.identity_or_default().is_empty());
    }
}
