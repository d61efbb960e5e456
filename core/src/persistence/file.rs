//! File-backed persistence
//!
//! Layout of the data directory:
//! - `bosses.json`      boss list (pretty JSON array, export-compatible)
//! - `visible_ids.json` selected boss ids
//! - `settings.toml`    timer settings

use std::path::{Path, PathBuf};

use respawn_types::TimerSettings;

use super::{LoadedEntities, Persistence, PersistenceError, decode_entities};
use crate::timers::{EntityId, TrackedEntity};

const ENTITIES_FILE: &str = "bosses.json";
const SELECTION_FILE: &str = "visible_ids.json";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Read a file, `None` if it does not exist
    fn read(&self, file: &str) -> Result<Option<(PathBuf, String)>, PersistenceError> {
        let path = self.path(file);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|source| PersistenceError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Some((path, content)))
    }

    fn write(&self, file: &str, content: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(file);
        std::fs::write(&path, content).map_err(|source| PersistenceError::Io { path, source })
    }
}

impl Persistence for FileStore {
    fn load_entities(&self) -> Result<Option<LoadedEntities>, PersistenceError> {
        let Some((path, content)) = self.read(ENTITIES_FILE)? else {
            return Ok(None);
        };
        let records: Vec<serde_json::Value> = serde_json::from_str(&content)
            .map_err(|source| PersistenceError::ParseJson { path, source })?;
        Ok(Some(decode_entities(records)))
    }

    fn save_entities(&mut self, entities: &[TrackedEntity]) -> Result<(), PersistenceError> {
        let content =
            serde_json::to_string_pretty(entities).map_err(PersistenceError::SerializeJson)?;
        self.write(ENTITIES_FILE, &content)
    }

    fn load_selection(&self) -> Result<Option<Vec<EntityId>>, PersistenceError> {
        let Some((path, content)) = self.read(SELECTION_FILE)? else {
            return Ok(None);
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| PersistenceError::ParseJson { path, source })
    }

    fn save_selection(&mut self, ids: &[EntityId]) -> Result<(), PersistenceError> {
        let content = serde_json::to_string(ids).map_err(PersistenceError::SerializeJson)?;
        self.write(SELECTION_FILE, &content)
    }

    fn load_settings(&self) -> Result<Option<TimerSettings>, PersistenceError> {
        let Some((path, content)) = self.read(SETTINGS_FILE)? else {
            return Ok(None);
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| PersistenceError::ParseToml { path, source })
    }

    fn save_settings(&mut self, settings: &TimerSettings) -> Result<(), PersistenceError> {
        let content = toml::to_string_pretty(settings).map_err(PersistenceError::SerializeToml)?;
        self.write(SETTINGS_FILE, &content)
    }
}
