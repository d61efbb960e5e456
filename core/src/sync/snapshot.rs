//! Boss list export/import
//!
//! Export writes every field of every boss. Import only merges names and
//! intervals; timers in the file are ignored.

use super::{SnapshotError, SyncReport, merge_records, parse_records};
use crate::store::EntityStore;
use crate::timers::TrackedEntity;

/// Default file name for exports
pub const EXPORT_FILE_NAME: &str = "respawn_boss_list.json";

pub fn export_snapshot(entities: &[TrackedEntity]) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(entities).map_err(SnapshotError::Serialize)
}

pub fn import_snapshot(store: &mut EntityStore, json: &str) -> Result<SyncReport, SnapshotError> {
    let records = parse_records(json)?;
    Ok(merge_records(store, &records))
}
