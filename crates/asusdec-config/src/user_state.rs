//! Persisted user preferences

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// State that survives restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    /// Touchpad enabled preference
    #[serde(default = "default_true")]
    pub touchpad_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            touchpad_enabled: true,
        }
    }
}

impl UserState {
    /// Load state, falling back to defaults when the file is absent or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!("No saved state at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring corrupt state file {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Save state to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::debug!("State saved to {}", path.display());
        Ok(())
    }
}
