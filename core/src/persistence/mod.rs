//! Persistence seam
//!
//! The engine never chooses a storage mechanism; it talks to a
//! [`Persistence`] implementation after every state change and treats write
//! failures as non-fatal. Two implementations ship here:
//! - [`FileStore`]: JSON/TOML files in a data directory
//! - [`MemoryStore`]: shared in-memory state (tests, ephemeral sessions)

mod error;
mod file;

pub use error::PersistenceError;
pub use file::FileStore;

use std::sync::{Arc, Mutex, MutexGuard};

use respawn_types::TimerSettings;

use crate::timers::{EntityId, TrackedEntity};

/// Bosses read back from storage, plus how many corrupt records were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedEntities {
    pub entities: Vec<TrackedEntity>,
    pub skipped: usize,
}

/// Storage collaborator. `Ok(None)` from a load means nothing was stored yet.
pub trait Persistence: Send {
    fn load_entities(&self) -> Result<Option<LoadedEntities>, PersistenceError>;
    fn save_entities(&mut self, entities: &[TrackedEntity]) -> Result<(), PersistenceError>;

    fn load_selection(&self) -> Result<Option<Vec<EntityId>>, PersistenceError>;
    fn save_selection(&mut self, ids: &[EntityId]) -> Result<(), PersistenceError>;

    fn load_settings(&self) -> Result<Option<TimerSettings>, PersistenceError>;
    fn save_settings(&mut self, settings: &TimerSettings) -> Result<(), PersistenceError>;
}

/// Decode boss records one at a time, skipping any that do not parse.
pub(crate) fn decode_entities(records: Vec<serde_json::Value>) -> LoadedEntities {
    let mut loaded = LoadedEntities::default();
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<TrackedEntity>(record) {
            Ok(entity) => loaded.entities.push(entity),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping corrupt boss record");
                loaded.skipped += 1;
            }
        }
    }
    loaded
}

#[derive(Debug, Default)]
struct MemoryState {
    entities: Option<Vec<TrackedEntity>>,
    selection: Option<Vec<EntityId>>,
    settings: Option<TimerSettings>,
    saves: usize,
}

/// In-memory persistence. Clones share the same state, so a test can keep a
/// handle after giving one to the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the stored boss list
    pub fn with_entities(entities: Vec<TrackedEntity>) -> Self {
        let store = Self::new();
        store.lock().entities = Some(entities);
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means a panicking test; the data is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn entities(&self) -> Option<Vec<TrackedEntity>> {
        self.lock().entities.clone()
    }

    pub fn selection(&self) -> Option<Vec<EntityId>> {
        self.lock().selection.clone()
    }

    pub fn settings(&self) -> Option<TimerSettings> {
        self.lock().settings.clone()
    }

    /// Number of save calls of any kind
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }
}

impl Persistence for MemoryStore {
    fn load_entities(&self) -> Result<Option<LoadedEntities>, PersistenceError> {
        Ok(self.lock().entities.clone().map(|entities| LoadedEntities {
            entities,
            skipped: 0,
        }))
    }

    fn save_entities(&mut self, entities: &[TrackedEntity]) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        state.entities = Some(entities.to_vec());
        state.saves += 1;
        Ok(())
    }

    fn load_selection(&self) -> Result<Option<Vec<EntityId>>, PersistenceError> {
        Ok(self.lock().selection.clone())
    }

    fn save_selection(&mut self, ids: &[EntityId]) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        state.selection = Some(ids.to_vec());
        state.saves += 1;
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<TimerSettings>, PersistenceError> {
        Ok(self.lock().settings.clone())
    }

    fn save_settings(&mut self, settings: &TimerSettings) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        state.settings = Some(settings.clone());
        state.saves += 1;
        Ok(())
    }
}
