//! Respawn timers
//!
//! This module provides:
//! - **Tracked bosses**: a boss plus its optional running countdown
//! - **State**: idle / active / expired / stale, derived from the clock
//! - **Notifications**: once-per-cycle respawn and per-minute countdown alerts
//! - **Corrections**: operator fixes by remaining time or kill time
//! - **Manager**: owns the store and drives every state change

mod correction;
mod error;
mod manager;
mod notify;
mod state;
mod tracked;

pub use correction::{
    Correction, CorrectionMode, most_recent_occurrence, remaining_target, resolve_kill_instant_in,
};
pub use error::ValidationError;
pub use manager::{TickReport, TimerManager, ViewEntry};
pub use notify::{LogNotifier, NotificationEvent, Notifier, countdown_due, respawn_due};
pub use state::{TimerState, compute_state, remaining_minutes};
pub use tracked::{
    EntityId, EpochMillis, MAX_RESPAWN_HOURS, MS_PER_HOUR, MS_PER_MINUTE, TrackedEntity,
    is_valid_respawn_hours,
};
