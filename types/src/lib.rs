//! Shared configuration types for the respawn tracker
//!
//! This crate contains serializable configuration types that are shared between
//! the engine (respawn-core) and the hosts that drive it (respawn-cli).

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Timer Settings (engine policy, persisted alongside the boss list)
// ─────────────────────────────────────────────────────────────────────────────

/// Notification and float-buffer settings consumed by the timer engine.
///
/// Countdown notifications are a refinement of respawn notifications: they
/// never fire on their own. Use [`TimerSettings::countdown_enabled`] rather
/// than reading `notify_on_countdown` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Fire a notification when a boss reaches its respawn time
    #[serde(default)]
    pub notify_on_respawn: bool,

    /// Fire per-minute notifications while a respawn is close
    #[serde(default)]
    pub notify_on_countdown: bool,

    /// Countdown notifications fire while fewer than this many whole minutes remain
    #[serde(default = "default_countdown_threshold")]
    pub countdown_threshold_minutes: u32,

    /// Attach a float buffer to kills and show it after the countdown
    #[serde(default = "default_true")]
    pub use_float_buffer: bool,

    /// Length of the float buffer in minutes
    #[serde(default = "default_float_buffer_minutes")]
    pub float_buffer_minutes: u32,
}

fn default_countdown_threshold() -> u32 {
    3
}

fn default_float_buffer_minutes() -> u32 {
    10
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            notify_on_respawn: false,
            notify_on_countdown: false,
            countdown_threshold_minutes: default_countdown_threshold(),
            use_float_buffer: true,
            float_buffer_minutes: default_float_buffer_minutes(),
        }
    }
}

impl TimerSettings {
    /// Countdown notifications are only live when respawn notifications are on.
    pub fn countdown_enabled(&self) -> bool {
        self.notify_on_respawn && self.notify_on_countdown
    }

    /// Float buffer (in seconds) to attach to a fresh kill.
    pub fn float_buffer_secs(&self) -> u32 {
        if self.use_float_buffer {
            self.float_buffer_minutes.saturating_mul(60)
        } else {
            0
        }
    }

    /// Enforce the respawn/countdown dependency.
    pub fn normalize(&mut self) {
        if !self.notify_on_respawn {
            self.notify_on_countdown = false;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Host Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// How the host delivers notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// When false, notifications are dropped (the host has no permission to show them)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Ring the terminal bell alongside the message
    #[serde(default = "default_true")]
    pub bell: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

/// Host application configuration.
///
/// Note: Persistence methods (load/save) are provided by respawn-core via the
/// `AppConfigExt` trait, as they require platform-specific dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the boss list, selection and settings.
    /// Empty means the platform default.
    #[serde(default)]
    pub data_directory: String,

    /// Tick cadence in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// A wall-clock gap between ticks longer than this is treated as a resume
    #[serde(default = "default_resume_gap_secs")]
    pub resume_gap_secs: u64,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_resume_gap_secs() -> u64 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: String::new(),
            tick_interval_ms: default_tick_interval_ms(),
            resume_gap_secs: default_resume_gap_secs(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfig with the specified data directory.
    /// Other fields use their default values.
    pub fn with_data_directory(data_directory: String) -> Self {
        Self {
            data_directory,
            ..Self::default()
        }
    }
}
