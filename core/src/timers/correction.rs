//! Manual timer corrections
//!
//! An operator can fix a countdown in two ways: by stating how long is left
//! (`Remaining`) or by stating the wall-clock time the boss died (`Killed`).

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

use super::error::ValidationError;
use super::tracked::{EpochMillis, MS_PER_HOUR, MS_PER_MINUTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionMode {
    /// Hours/minutes until respawn
    #[default]
    Remaining,
    /// Hour:minute (local clock) at which the boss was killed
    Killed,
}

/// Operator input for a manual correction. Absent fields count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Correction {
    pub mode: CorrectionMode,
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
}

impl Correction {
    pub fn remaining(hours: u32, minutes: u32) -> Self {
        Self {
            mode: CorrectionMode::Remaining,
            hours: Some(hours),
            minutes: Some(minutes),
        }
    }

    pub fn killed_at(hour: u32, minute: u32) -> Self {
        Self {
            mode: CorrectionMode::Killed,
            hours: Some(hour),
            minutes: Some(minute),
        }
    }

    /// Both fields left empty cancels the timer. Explicit zeros do not:
    /// `00:00` is midnight in `Killed` mode.
    pub fn is_cancel(&self) -> bool {
        self.hours.is_none() && self.minutes.is_none()
    }

    fn hm(&self) -> (u32, u32) {
        (self.hours.unwrap_or(0), self.minutes.unwrap_or(0))
    }
}

/// Target for `Remaining` mode.
///
/// One extra minute is added so a freshly corrected countdown does not
/// immediately read a whole minute short.
pub fn remaining_target(now: EpochMillis, correction: &Correction) -> EpochMillis {
    let (hours, minutes) = correction.hm();
    now + i64::from(hours) * MS_PER_HOUR + i64::from(minutes) * MS_PER_MINUTE + MS_PER_MINUTE
}

/// Most recent past (or current) occurrence of `time` relative to `now`.
pub fn most_recent_occurrence(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let candidate = now.date().and_time(time);
    if candidate > now {
        candidate - TimeDelta::days(1)
    } else {
        candidate
    }
}

/// Absolute instant of a kill reported as a wall-clock time in `tz`.
pub fn resolve_kill_instant_in<Tz: TimeZone>(
    tz: &Tz,
    now: EpochMillis,
    correction: &Correction,
) -> Result<EpochMillis, ValidationError> {
    let (hour, minute) = correction.hm();
    let invalid = || ValidationError::InvalidClockTime { hour, minute };

    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;
    let now_local = tz.timestamp_millis_opt(now).single().ok_or_else(invalid)?;
    let kill_local = most_recent_occurrence(now_local.naive_local(), time);

    tz.from_local_datetime(&kill_local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(invalid)
}
