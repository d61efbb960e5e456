//! Notification policy and delivery seam
//!
//! The tick sweep asks the policy functions whether a boss is due a
//! notification, then hands delivery to a [`Notifier`]. Delivery is
//! best-effort: a notifier swallows its own failures, and the dedup flags on
//! the boss are set either way so a denied notification is not retried every
//! tick.

use respawn_types::TimerSettings;

use super::state::{TimerState, remaining_minutes};
use super::tracked::TrackedEntity;

/// Receives notification side effects from the engine.
///
/// Implementations may no-op (e.g. when the user has not granted permission)
/// but must never panic back into the engine.
pub trait Notifier: Send {
    /// The boss has reached its respawn time
    fn notify_respawn(&self, name: &str);

    /// The boss respawns in roughly `minutes` minutes
    fn notify_countdown(&self, name: &str, minutes: u32);
}

/// A notification the engine decided to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Respawn { name: String },
    Countdown { name: String, minutes: u32 },
}

impl NotificationEvent {
    pub fn deliver(&self, notifier: &dyn Notifier) {
        match self {
            NotificationEvent::Respawn { name } => notifier.notify_respawn(name),
            NotificationEvent::Countdown { name, minutes } => {
                notifier.notify_countdown(name, *minutes)
            }
        }
    }
}

/// Respawn-reached fires once per cycle.
pub fn respawn_due(state: TimerState, entity: &TrackedEntity, settings: &TimerSettings) -> bool {
    state == TimerState::Expired && settings.notify_on_respawn && !entity.respawn_notified
}

/// Returns the minute bucket to announce, if one is due.
///
/// Buckets are floored whole minutes; each distinct bucket below the
/// threshold fires once.
pub fn countdown_due(
    state: TimerState,
    entity: &TrackedEntity,
    settings: &TimerSettings,
) -> Option<i64> {
    if !settings.countdown_enabled() {
        return None;
    }
    let remaining = state.remaining()?;
    let minutes = remaining_minutes(remaining);

    (minutes < i64::from(settings.countdown_threshold_minutes)
        && entity.last_countdown_minute != Some(minutes))
    .then_some(minutes)
}

/// Notifier that only writes to the log. Used when the host has no
/// notification surface of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_respawn(&self, name: &str) {
        tracing::info!(boss = name, "Boss has respawned");
    }

    fn notify_countdown(&self, name: &str, minutes: u32) {
        tracing::info!(boss = name, minutes, "Boss respawn approaching");
    }
}
