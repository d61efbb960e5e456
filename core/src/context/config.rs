//! Application configuration
//!
//! This module re-exports shared types from respawn-types and provides
//! platform-specific defaults and persistence for AppConfig.

use std::path::PathBuf;

pub use respawn_types::{AppConfig, NotificationConfig, TimerSettings};

use super::error::ConfigError;

const APP_NAME: &str = "respawn";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// `~/.local/share/respawn` on Linux, `%LOCALAPPDATA%\respawn` on Windows
pub fn default_data_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Option<PathBuf>;
    /// Configured data directory, or the platform default when unset
    fn resolved_data_directory(&self) -> PathBuf;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }

    fn resolved_data_directory(&self) -> PathBuf {
        if self.data_directory.trim().is_empty() {
            default_data_directory()
        } else {
            PathBuf::from(&self.data_directory)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_directory_uses_platform_default() {
        let config = AppConfig::default();
        assert_eq!(config.resolved_data_directory(), default_data_directory());

        let config = AppConfig::with_data_directory("/srv/respawn".to_string());
        assert_eq!(
            config.resolved_data_directory(),
            PathBuf::from("/srv/respawn")
        );
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let config: AppConfig = toml::from_str("tick_interval_ms = 250\n").unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.resume_gap_secs, 5);
        assert!(config.notifications.enabled);
    }
}
