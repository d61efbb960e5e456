//! Error types for timer operations

use thiserror::Error;

/// Rejected user input. The operation is aborted and no state changes.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("boss name is required")]
    EmptyName,

    #[error("respawn time is required (hours or minutes)")]
    MissingDuration,

    #[error("{field} must be a number, got '{value}'")]
    NonNumeric { field: &'static str, value: String },

    #[error("respawn interval must be above 0 and at most 8760 hours, got {hours}h")]
    InvalidDuration { hours: f64 },

    #[error("a boss named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("invalid kill time {hour:02}:{minute:02}")]
    InvalidClockTime { hour: u32, minute: u32 },
}
