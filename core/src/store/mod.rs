//! Entity store
//!
//! The canonical, manually ordered list of tracked bosses plus the selection
//! set (which bosses are shown in the urgency view). Urgency sorting never
//! touches the order kept here; see [`ordering`].

pub mod ordering;

use hashbrown::HashSet;

use crate::timers::{EntityId, TrackedEntity, ValidationError, is_valid_respawn_hours};

/// User input for a new boss. Durations arrive as raw text.
#[derive(Debug, Clone, Default)]
pub struct NewEntity {
    pub name: String,
    pub hours: Option<String>,
    pub minutes: Option<String>,
}

impl NewEntity {
    pub fn new(name: impl Into<String>, hours: Option<&str>, minutes: Option<&str>) -> Self {
        Self {
            name: name.into(),
            hours: hours.map(str::to_string),
            minutes: minutes.map(str::to_string),
        }
    }
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| ValidationError::NonNumeric {
            field,
            value: raw.to_string(),
        })
}

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<TrackedEntity>,
    selection: HashSet<EntityId>,
    /// High-water mark so deleted ids are not handed out again this session
    next_id: EntityId,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted parts.
    ///
    /// With no stored selection every boss starts selected. Selected ids that
    /// no longer exist are dropped.
    pub fn from_parts(entities: Vec<TrackedEntity>, selection: Option<Vec<EntityId>>) -> Self {
        let selection = match selection {
            Some(ids) => ids
                .into_iter()
                .filter(|id| entities.iter().any(|e| e.id == *id))
                .collect(),
            None => entities.iter().map(|e| e.id).collect(),
        };
        Self {
            entities,
            selection,
            next_id: 0,
        }
    }

    // --- Accessors ---

    /// Bosses in canonical (manual) order
    pub fn entities(&self) -> &[TrackedEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&TrackedEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut TrackedEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn entities_mut(&mut self) -> impl Iterator<Item = &mut TrackedEntity> {
        self.entities.iter_mut()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&TrackedEntity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut TrackedEntity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    /// Resolve user input to an id: a numeric id, an exact name, then a
    /// case-insensitive name.
    pub fn resolve(&self, target: &str) -> Option<EntityId> {
        let target = target.trim();
        if let Ok(id) = target.parse::<EntityId>()
            && self.get(id).is_some()
        {
            return Some(id);
        }
        self.find_by_name(target)
            .or_else(|| {
                self.entities
                    .iter()
                    .find(|e| e.name.eq_ignore_ascii_case(target))
            })
            .map(|e| e.id)
    }

    /// Selected ids, sorted (stable output for persistence)
    pub fn selection(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.selection.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.selection.contains(&id)
    }

    // --- Mutations ---

    /// Next id: one past the largest id ever seen.
    pub fn mint_id(&mut self) -> EntityId {
        let max_existing = self.entities.iter().map(|e| e.id).max().unwrap_or(0);
        let id = (max_existing + 1).max(self.next_id);
        self.next_id = id + 1;
        id
    }

    /// Append a new idle boss, included and selected. Caller guarantees the
    /// name is unique.
    pub fn push_new(&mut self, name: &str, respawn_hours: f64) -> EntityId {
        let id = self.mint_id();
        self.entities.push(TrackedEntity::new(id, name, respawn_hours));
        self.selection.insert(id);
        id
    }

    /// Validate user input and append the boss.
    pub fn add(&mut self, input: &NewEntity) -> Result<EntityId, ValidationError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let hours = parse_field("hours", input.hours.as_deref())?;
        let minutes = parse_field("minutes", input.minutes.as_deref())?;
        if hours.is_none() && minutes.is_none() {
            return Err(ValidationError::MissingDuration);
        }

        let total = hours.unwrap_or(0.0) + minutes.unwrap_or(0.0) / 60.0;
        if !is_valid_respawn_hours(total) {
            return Err(ValidationError::InvalidDuration { hours: total });
        }

        if self.find_by_name(name).is_some() {
            return Err(ValidationError::DuplicateName {
                name: name.to_string(),
            });
        }

        Ok(self.push_new(name, total))
    }

    pub fn remove(&mut self, id: EntityId) -> Option<TrackedEntity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        self.selection.remove(&id);
        Some(self.entities.remove(idx))
    }

    /// Move the boss at `from` to position `to` in the canonical order.
    pub fn move_entity(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.entities.len() || to >= self.entities.len() {
            return false;
        }
        let moved = self.entities.remove(from);
        self.entities.insert(to, moved);
        true
    }

    /// Returns false for unknown ids.
    pub fn set_selected(&mut self, id: EntityId, selected: bool) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if selected {
            self.selection.insert(id);
        } else {
            self.selection.remove(&id);
        }
        true
    }

    /// Select or deselect every boss that is in the selection list.
    pub fn select_all(&mut self, selected: bool) {
        for entity in self.entities.iter().filter(|e| e.include_in_selection_list) {
            if selected {
                self.selection.insert(entity.id);
            } else {
                self.selection.remove(&entity.id);
            }
        }
    }

    /// Show or hide a boss in the selection list. Hiding also deselects it.
    pub fn set_included(&mut self, id: EntityId, included: bool) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        entity.include_in_selection_list = included;
        if !included {
            self.selection.remove(&id);
        }
        true
    }

    /// Force a boss into both the selection list and the selection.
    pub(crate) fn force_visible(&mut self, id: EntityId) {
        if let Some(entity) = self.get_mut(id) {
            entity.include_in_selection_list = true;
            self.selection.insert(id);
        }
    }
}
