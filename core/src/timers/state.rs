//! Timer computation
//!
//! Pure mapping from a boss and the current time to its countdown state.

use std::time::Duration;

use super::tracked::{EpochMillis, TrackedEntity};

/// Countdown state of a boss at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No countdown running
    Idle,
    /// Counting down, `remaining` until the target
    Active(Duration),
    /// Target reached, still inside the one-interval grace window
    Expired,
    /// More than one full interval past the target; the cycle must be cleared
    Stale,
}

impl TimerState {
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            TimerState::Active(remaining) => Some(*remaining),
            _ => None,
        }
    }
}

/// Evaluate `entity` at `now`.
///
/// Staleness is relative to the boss's own interval, so any gap between
/// ticks (suspended host, sleeping laptop) resolves the same way.
pub fn compute_state(entity: &TrackedEntity, now: EpochMillis) -> TimerState {
    let Some(target) = entity.target_time else {
        return TimerState::Idle;
    };

    let diff = target.saturating_sub(now);
    let timeout_limit = -entity.respawn_interval_ms();

    if diff <= timeout_limit {
        TimerState::Stale
    } else if diff <= 0 {
        TimerState::Expired
    } else {
        TimerState::Active(Duration::from_millis(diff as u64))
    }
}

/// Whole minutes remaining, floored.
pub fn remaining_minutes(remaining: Duration) -> i64 {
    (remaining.as_millis() / 60_000) as i64
}
