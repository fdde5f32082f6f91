//! Configuration management for Pagelens.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// Loaded from `~/.config/pagelens/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scan loop behavior
    pub scan: ScanConfig,
    /// Pattern family tuning
    pub patterns: PatternConfig,
    /// Coordinator aggregation settings
    pub aggregate: AggregateConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PAGELENS_PROGRESS_SAMPLE_INTERVAL`: Override progress sampling rate
    /// - `PAGELENS_MIN_PHONE_DIGITS`: Override the phone digit threshold
    /// - `PAGELENS_HISTORY_MAX_ENTRIES`: Override the history cap
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("PAGELENS_PROGRESS_SAMPLE_INTERVAL") {
            if let Ok(interval) = val.parse() {
                config.scan.progress_sample_interval = interval;
                tracing::debug!("Override progress_sample_interval from env: {}", interval);
            }
        }

        if let Ok(val) = std::env::var("PAGELENS_MIN_PHONE_DIGITS") {
            if let Ok(digits) = val.parse() {
                config.patterns.min_phone_digits = digits;
                tracing::debug!("Override min_phone_digits from env: {}", digits);
            }
        }

        if let Ok(val) = std::env::var("PAGELENS_HISTORY_MAX_ENTRIES") {
            if let Ok(max) = val.parse() {
                config.aggregate.history_max_entries = max;
                tracing::debug!("Override history_max_entries from env: {}", max);
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/pagelens/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("io", "pagelens", "pagelens").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/pagelens`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("io", "pagelens", "pagelens").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Scan loop behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Emit a progress event every N processed nodes (plus first and last)
    pub progress_sample_interval: usize,
    /// Yield control back to the runtime every N processed nodes
    pub yield_every_nodes: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            progress_sample_interval: 10,
            yield_every_nodes: 32,
        }
    }
}

/// Pattern family tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Minimum raw digit count for a phone candidate to be kept.
    ///
    /// Heuristic threshold that suppresses dates and version strings; there is
    /// no principled derivation, so it is tunable rather than fixed.
    pub min_phone_digits: usize,
    /// Hostnames accepted by the social-link pattern (without `.com`)
    pub social_hosts: Vec<String>,
}

impl PatternConfig {
    /// The default social host allow-list.
    #[must_use]
    pub fn default_social_hosts() -> Vec<String> {
        [
            "facebook",
            "instagram",
            "linkedin",
            "twitter",
            "x",
            "youtube",
            "tiktok",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_phone_digits: 8,
            social_hosts: Self::default_social_hosts(),
        }
    }
}

/// Coordinator aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Maximum number of history entries kept (oldest evicted first)
    pub history_max_entries: usize,
    /// Whether to announce newly recorded values via the notification hook
    pub notify_on_new_values: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            history_max_entries: 10,
            notify_on_new_values: true,
        }
    }
}
