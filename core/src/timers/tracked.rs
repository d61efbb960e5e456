//! Tracked bosses (persistent per-boss state)
//!
//! A `TrackedEntity` is a boss with a fixed respawn interval. Once it is
//! killed it carries an absolute `target_time`; the tick sweep counts down
//! against it and clears it again once the cycle goes stale.
//!
//! # Lifecycle
//!
//! 1. Created idle by `add`, bulk sync or import
//! 2. Kill / correction → `start_cycle` sets a fresh target
//! 3. Tick notices expiry → respawn notification (once per cycle)
//! 4. Cancel, or one full interval past the target → `clear_timer`

use serde::{Deserialize, Serialize};

use crate::serde_defaults::{default_true, deserialize_hours};

/// Stable identifier, minted by the store and never reassigned.
pub type EntityId = u32;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Longest accepted respawn interval (one year)
pub const MAX_RESPAWN_HOURS: f64 = 24.0 * 365.0;

/// Intervals accepted from user input and sync sources
pub fn is_valid_respawn_hours(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0 && hours <= MAX_RESPAWN_HOURS
}

/// A boss being tracked.
///
/// Serialized with the key names used by the tracker's JSON export
/// (`respawnHour`, `targetTime`, `floatSec`, ...) so older exports load as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntity {
    pub id: EntityId,

    pub name: String,

    /// Respawn interval in (fractional) hours
    #[serde(rename = "respawnHour", deserialize_with = "deserialize_hours")]
    pub respawn_hours: f64,

    // ─── Current cycle ──────────────────────────────────────────────────────
    /// End of the current countdown. `None` = idle.
    #[serde(default)]
    pub target_time: Option<EpochMillis>,

    /// Uncertainty window shown after the target. Display only.
    #[serde(rename = "floatSec", default)]
    pub float_secs: u32,

    /// Respawn notification already fired for this cycle
    #[serde(default)]
    pub respawn_notified: bool,

    /// Last minute bucket a countdown notification fired for
    #[serde(rename = "lastCountdownMin", default)]
    pub last_countdown_minute: Option<i64>,

    // ─── Selection list ─────────────────────────────────────────────────────
    /// Whether this boss appears in the selection list at all
    #[serde(rename = "onSidebar", default = "default_true")]
    pub include_in_selection_list: bool,
}

impl TrackedEntity {
    /// Create an idle boss
    pub fn new(id: EntityId, name: impl Into<String>, respawn_hours: f64) -> Self {
        Self {
            id,
            name: name.into(),
            respawn_hours,
            target_time: None,
            float_secs: 0,
            respawn_notified: false,
            last_countdown_minute: None,
            include_in_selection_list: true,
        }
    }

    /// Respawn interval in milliseconds
    pub fn respawn_interval_ms(&self) -> i64 {
        (self.respawn_hours * MS_PER_HOUR as f64).round() as i64
    }

    pub fn is_idle(&self) -> bool {
        self.target_time.is_none()
    }

    /// Begin a new countdown cycle ending at `target`.
    pub fn start_cycle(&mut self, target: EpochMillis, float_secs: u32) {
        self.target_time = Some(target);
        self.float_secs = float_secs;
        self.reset_notifications();
    }

    /// Return to idle, dropping the float buffer and notification state.
    pub fn clear_timer(&mut self) {
        self.target_time = None;
        self.float_secs = 0;
        self.reset_notifications();
    }

    pub fn reset_notifications(&mut self) {
        self.respawn_notified = false;
        self.last_countdown_minute = None;
    }
}
