//! Text rendering for the urgency view and the selection list.

use std::time::Duration;

use chrono::{Local, TimeZone};
use respawn_core::{EpochMillis, TimerSettings, TimerState, TrackedEntity, ViewEntry};

pub const IDLE_TIMER: &str = "--:--:--";
pub const RESPAWNED: &str = "Respawned!";

/// `1H`, `1H 30M`
pub fn format_respawn_hours(hours: f64) -> String {
    let mut h = hours.floor() as i64;
    let mut m = ((hours - hours.floor()) * 60.0).round() as i64;
    if m == 60 {
        h += 1;
        m = 0;
    }
    if m == 0 {
        format!("{h}H")
    } else {
        format!("{h}H {m}M")
    }
}

/// `HH:MM:SS`, with ` + MM:SS` appended for a float buffer
pub fn format_countdown(remaining: Duration, float_secs: u32) -> String {
    let total = remaining.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    let mut out = format!("{h:02}:{m:02}:{s:02}");
    if float_secs > 0 {
        out.push_str(&format!(" + {:02}:{:02}", float_secs / 60, float_secs % 60));
    }
    out
}

/// `[ HH:MM ]` of the target in `tz`
pub fn format_target_clock_in<Tz: TimeZone>(tz: &Tz, target: EpochMillis) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_millis_opt(target).single() {
        Some(at) => format!("[ {} ]", at.format("%H:%M")),
        None => String::new(),
    }
}

pub fn format_target_clock(target: EpochMillis) -> String {
    format_target_clock_in(&Local, target)
}

/// Timer column for one boss
pub fn render_timer(state: TimerState, entity: &TrackedEntity, settings: &TimerSettings) -> String {
    match state {
        TimerState::Idle | TimerState::Stale => IDLE_TIMER.to_string(),
        TimerState::Expired => RESPAWNED.to_string(),
        TimerState::Active(remaining) => {
            let float_secs = if settings.use_float_buffer {
                entity.float_secs
            } else {
                0
            };
            format_countdown(remaining, float_secs)
        }
    }
}

pub fn render_row(entry: &ViewEntry<'_>, settings: &TimerSettings) -> String {
    let entity = entry.entity;
    let clock = match (entry.state, entity.target_time) {
        (TimerState::Active(_) | TimerState::Expired, Some(target)) => format_target_clock(target),
        _ => String::new(),
    };
    format!(
        "{:>4}  {:<22} {:<8} {:<20} {}",
        entity.id,
        entity.name,
        format_respawn_hours(entity.respawn_hours),
        render_timer(entry.state, entity, settings),
        clock
    )
    .trim_end()
    .to_string()
}

/// Selection list line: checkbox, id, name, interval
pub fn render_list_item(entity: &TrackedEntity, selected: bool) -> String {
    let mark = if selected { "x" } else { " " };
    format!(
        "[{mark}] {:>4}  {:<22} {}",
        entity.id,
        entity.name,
        format_respawn_hours(entity.respawn_hours)
    )
}
