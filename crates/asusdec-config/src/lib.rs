//! Configuration management for the asusdec dock bridge
//!
//! Handles where the power-supply tree and dock device live, the host's
//! status codes, polling cadence, and the persisted touchpad preference.
//! TOML files, every key optional.

mod user_state;

pub use user_state::UserState;

use asusdec_hal::{ASUSDEC_DEVICE, POWER_SUPPLY_ROOT, StatusCodes};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/asusdec";
pub const STATE_DIR: &str = "/var/lib/asusdec";

/// Per-user configuration directory, under `$XDG_CONFIG_HOME` or `~/.config`
pub const USER_CONFIG_DIR: &str = "asusdec";

/// Resolve the per-user configuration directory from the environment
pub fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|base| base.join(USER_CONFIG_DIR))
}

/// Dock bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockConfig {
    /// Power-supply enumeration root
    #[serde(default = "default_power_supply_root")]
    pub power_supply_root: PathBuf,

    /// Dock controller device node
    #[serde(default = "default_device_node")]
    pub device_node: PathBuf,

    /// Seconds between polls in watch mode
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Where the touchpad preference is kept
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Host codes reported for each charge status
    #[serde(default)]
    pub status_codes: StatusCodes,
}

fn default_power_supply_root() -> PathBuf {
    PathBuf::from(POWER_SUPPLY_ROOT)
}

fn default_device_node() -> PathBuf {
    PathBuf::from(ASUSDEC_DEVICE)
}

fn default_poll_interval() -> u64 {
    5
}

fn default_state_file() -> PathBuf {
    Path::new(STATE_DIR).join("state.toml")
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            power_supply_root: default_power_supply_root(),
            device_node: default_device_node(),
            poll_interval_secs: default_poll_interval(),
            state_file: default_state_file(),
            status_codes: StatusCodes::default(),
        }
    }
}

impl DockConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        // Try user config first, then system config
        let mut candidates = Vec::new();
        if let Some(dir) = user_config_dir() {
            candidates.push(dir.join("config.toml"));
        }
        candidates.push(Path::new(CONFIG_DIR).join("config.toml"));

        Self::load_first(&candidates)
    }

    /// Load the first of `candidates` that exists, or defaults if none does
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        if let Some(path) = candidates.iter().find(|path| path.exists()) {
            tracing::debug!("Loading configuration from {}", path.display());
            return Self::load(path);
        }

        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the bridge cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
