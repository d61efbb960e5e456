//! Bulk sync, snapshots and share tokens
//!
//! All bulk paths share one rule: merge by name. A record whose name matches
//! an existing boss only updates that boss's interval (its timer is left
//! alone); unknown names are appended as new idle bosses.

mod error;
pub mod share;
pub mod snapshot;

pub use error::{ShareError, SnapshotError};

use crate::serde_defaults::parse_hours;
use crate::store::EntityStore;
use crate::timers::is_valid_respawn_hours;

/// Bundled default boss list, used to seed a fresh store
const DEFAULT_BOSSES: &str = include_str!("../../data/default_bosses.json");

/// A `{name, respawnHour}` pair from a sync source or import file
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRecord {
    pub name: String,
    pub respawn_hours: f64,
}

impl SyncRecord {
    pub fn new(name: impl Into<String>, respawn_hours: f64) -> Self {
        Self {
            name: name.into(),
            respawn_hours,
        }
    }
}

/// Outcome of a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    /// Records rejected (blank name, interval out of range)
    pub skipped: usize,
}

impl SyncReport {
    pub fn changed(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

/// Parse a JSON boss list leniently.
///
/// The top level must be an array. Items without a usable `name` and
/// `respawnHour` are dropped rather than failing the whole list.
pub fn parse_records(json: &str) -> Result<Vec<SyncRecord>, SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(SnapshotError::Parse)?;
    let serde_json::Value::Array(items) = value else {
        return Err(SnapshotError::NotAList);
    };

    Ok(items
        .iter()
        .filter_map(|item| {
            let name = item.get("name")?.as_str()?;
            let hours = parse_hours(item.get("respawnHour")?)?;
            Some(SyncRecord::new(name, hours))
        })
        .collect())
}

/// The bundled default boss list
pub fn default_records() -> Vec<SyncRecord> {
    parse_records(DEFAULT_BOSSES).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Bundled boss list is malformed");
        Vec::new()
    })
}

/// Merge `records` into `store` by name.
pub fn merge_records(store: &mut EntityStore, records: &[SyncRecord]) -> SyncReport {
    let mut report = SyncReport::default();

    for record in records {
        let name = record.name.trim();
        if name.is_empty() || !is_valid_respawn_hours(record.respawn_hours) {
            tracing::warn!(name, hours = record.respawn_hours, "Skipping invalid sync record");
            report.skipped += 1;
            continue;
        }

        if let Some(existing) = store.find_by_name_mut(name) {
            if existing.respawn_hours != record.respawn_hours {
                existing.respawn_hours = record.respawn_hours;
                report.updated += 1;
            }
        } else {
            store.push_new(name, record.respawn_hours);
            report.added += 1;
        }
    }

    report
}
