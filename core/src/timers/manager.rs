//! Timer management
//!
//! `TimerManager` owns the boss store and drives every state change: the
//! periodic tick sweep, kill/cancel/correct, list management and the bulk
//! paths. Collaborators (storage, notifications) are reached only through
//! the [`Persistence`] and [`Notifier`] traits, and their failures never
//! escape this type.
//!
//! Rendering is pull-based: hosts call [`TimerManager::view`] each frame and
//! use [`TimerManager::take_view_dirty`] to learn when the order may have
//! changed.

use chrono::{Local, TimeZone};
use respawn_types::TimerSettings;

use crate::persistence::Persistence;
use crate::store::ordering::{SelectionSort, selection_list, urgency_order};
use crate::store::{EntityStore, NewEntity};
use crate::sync::share::{
    apply_shared_timers, decode_share_token, encode_share_token, extract_share_token,
};
use crate::sync::snapshot::{export_snapshot, import_snapshot};
use crate::sync::{
    ShareError, SnapshotError, SyncRecord, SyncReport, default_records, merge_records,
};

use super::correction::{Correction, CorrectionMode, remaining_target, resolve_kill_instant_in};
use super::error::ValidationError;
use super::notify::{NotificationEvent, Notifier, countdown_due, respawn_due};
use super::state::{TimerState, compute_state};
use super::tracked::{EntityId, EpochMillis, TrackedEntity};

/// What a single tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Bosses whose stale cycle was cleared back to idle
    pub cleared: Vec<EntityId>,
    /// Notifications handed to the notifier, in sweep order
    pub notifications: Vec<NotificationEvent>,
    /// The boss list was written to persistence
    pub persisted: bool,
}

impl TickReport {
    /// Bosses left the timed set, so the urgency view must be re-rendered.
    pub fn needs_reorder(&self) -> bool {
        !self.cleared.is_empty()
    }
}

/// One row of the urgency view
#[derive(Debug, Clone, Copy)]
pub struct ViewEntry<'a> {
    pub entity: &'a TrackedEntity,
    pub state: TimerState,
}

pub struct TimerManager {
    store: EntityStore,
    settings: TimerSettings,
    persistence: Box<dyn Persistence>,
    notifier: Box<dyn Notifier>,
    view_dirty: bool,
}

impl TimerManager {
    pub fn new(
        store: EntityStore,
        mut settings: TimerSettings,
        persistence: Box<dyn Persistence>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        settings.normalize();
        Self {
            store,
            settings,
            persistence,
            notifier,
            view_dirty: true,
        }
    }

    /// Restore state from `persistence`.
    ///
    /// Nothing stored, or a boss list that cannot be parsed at all, seeds the
    /// store from the bundled default list. Individual corrupt records are
    /// dropped by the persistence layer.
    pub fn load(persistence: Box<dyn Persistence>, notifier: Box<dyn Notifier>) -> Self {
        let settings = match persistence.load_settings() {
            Ok(settings) => settings.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings, using defaults");
                TimerSettings::default()
            }
        };

        let loaded = match persistence.load_entities() {
            Ok(Some(loaded)) => {
                if loaded.skipped > 0 {
                    tracing::warn!(skipped = loaded.skipped, "Dropped corrupt boss records");
                }
                Some(loaded.entities)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Boss list unreadable, re-seeding from defaults");
                None
            }
        };

        let Some(entities) = loaded else {
            let mut manager = Self::new(EntityStore::new(), settings, persistence, notifier);
            let report = merge_records(&mut manager.store, &default_records());
            tracing::info!(added = report.added, "Seeded boss list from defaults");
            manager.persist_entities();
            manager.persist_selection();
            return manager;
        };

        let selection = persistence.load_selection().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load selection, selecting all");
            None
        });

        let store = EntityStore::from_parts(entities, selection);
        tracing::info!(bosses = store.len(), "Loaded boss list");
        Self::new(store, settings, persistence, notifier)
    }

    // --- Accessors ---

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn resolve(&self, target: &str) -> Option<EntityId> {
        self.store.resolve(target)
    }

    pub fn take_view_dirty(&mut self) -> bool {
        std::mem::take(&mut self.view_dirty)
    }

    /// Selected, listed bosses in urgency order with their state at `now`.
    pub fn view(&self, now: EpochMillis) -> Vec<ViewEntry<'_>> {
        urgency_order(self.store.entities())
            .into_iter()
            .filter(|e| e.include_in_selection_list && self.store.is_selected(e.id))
            .map(|entity| ViewEntry {
                entity,
                state: compute_state(entity, now),
            })
            .collect()
    }

    pub fn selection_list(&self, sort: SelectionSort, search: &str) -> Vec<&TrackedEntity> {
        selection_list(&self.store, sort, search)
    }

    // --- Tick ---

    /// Sweep every running timer once.
    ///
    /// Stale cycles are cleared, expired bosses get their one respawn
    /// notification and approaching bosses get one countdown notification per
    /// minute bucket.
    pub fn tick(&mut self, now: EpochMillis) -> TickReport {
        let mut report = TickReport::default();
        let mut entities_dirty = false;

        for entity in self.store.entities_mut().filter(|e| !e.is_idle()) {
            let state = compute_state(entity, now);

            if state == TimerState::Stale {
                tracing::info!(id = entity.id, name = %entity.name, "Stale timer cleared");
                entity.clear_timer();
                report.cleared.push(entity.id);
                entities_dirty = true;
            } else if respawn_due(state, entity, &self.settings) {
                let event = NotificationEvent::Respawn {
                    name: entity.name.clone(),
                };
                event.deliver(self.notifier.as_ref());
                entity.respawn_notified = true;
                report.notifications.push(event);
                entities_dirty = true;
            } else if let Some(minutes) = countdown_due(state, entity, &self.settings) {
                let event = NotificationEvent::Countdown {
                    name: entity.name.clone(),
                    minutes: (minutes + 1) as u32,
                };
                event.deliver(self.notifier.as_ref());
                entity.last_countdown_minute = Some(minutes);
                report.notifications.push(event);
            }
        }

        if entities_dirty {
            report.persisted = self.persist_entities();
        }
        if report.needs_reorder() {
            self.view_dirty = true;
        }
        report
    }

    /// Out-of-band tick after the host was suspended or backgrounded.
    pub fn resume(&mut self, now: EpochMillis) -> TickReport {
        tracing::info!("Resuming, catching up on missed ticks");
        let report = self.tick(now);
        self.view_dirty = true;
        report
    }

    // --- Timer mutations ---

    /// Start a fresh cycle from `now`, whatever the previous state.
    pub fn kill(&mut self, id: EntityId, now: EpochMillis) -> bool {
        let float_secs = self.settings.float_buffer_secs();
        let Some(entity) = self.store.get_mut(id) else {
            return false;
        };
        let target = now.saturating_add(entity.respawn_interval_ms());
        entity.start_cycle(target, float_secs);
        tracing::info!(id, name = %entity.name, target, "Boss killed");
        self.timers_changed();
        true
    }

    /// Force a boss back to idle.
    pub fn cancel(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.store.get_mut(id) else {
            return false;
        };
        entity.clear_timer();
        tracing::info!(id, name = %entity.name, "Timer cancelled");
        self.timers_changed();
        true
    }

    /// Apply a manual correction. Leaving both fields empty cancels.
    ///
    /// Kill times are read in the local time zone. Returns `Ok(false)` for an
    /// unknown id.
    pub fn correct(
        &mut self,
        id: EntityId,
        correction: &Correction,
        now: EpochMillis,
    ) -> Result<bool, ValidationError> {
        self.correct_in(&Local, id, correction, now)
    }

    /// [`correct`](Self::correct) with kill times read in `tz`.
    pub fn correct_in<Tz: TimeZone>(
        &mut self,
        tz: &Tz,
        id: EntityId,
        correction: &Correction,
        now: EpochMillis,
    ) -> Result<bool, ValidationError> {
        let Some(interval_ms) = self.store.get(id).map(|e| e.respawn_interval_ms()) else {
            return Ok(false);
        };
        if correction.is_cancel() {
            return Ok(self.cancel(id));
        }

        let (target, float_secs) = match correction.mode {
            CorrectionMode::Remaining => (remaining_target(now, correction), 0),
            CorrectionMode::Killed => (
                resolve_kill_instant_in(tz, now, correction)?.saturating_add(interval_ms),
                self.settings.float_buffer_secs(),
            ),
        };

        if let Some(entity) = self.store.get_mut(id) {
            entity.start_cycle(target, float_secs);
            tracing::info!(
                id,
                name = %entity.name,
                target,
                mode = ?correction.mode,
                "Timer corrected"
            );
        }
        self.timers_changed();
        Ok(true)
    }

    // --- List management ---

    pub fn add_entity(&mut self, input: &NewEntity) -> Result<EntityId, ValidationError> {
        let id = self.store.add(input)?;
        tracing::info!(id, name = input.name.trim(), "Boss added");
        self.list_changed();
        Ok(id)
    }

    pub fn delete_entity(&mut self, id: EntityId) -> Option<TrackedEntity> {
        let removed = self.store.remove(id)?;
        tracing::info!(id, name = %removed.name, "Boss deleted");
        self.list_changed();
        Some(removed)
    }

    /// Reorder the canonical list (manual ordering)
    pub fn move_entity(&mut self, from: usize, to: usize) -> bool {
        if !self.store.move_entity(from, to) {
            return false;
        }
        self.persist_entities();
        self.view_dirty = true;
        true
    }

    pub fn set_selected(&mut self, id: EntityId, selected: bool) -> bool {
        if !self.store.set_selected(id, selected) {
            return false;
        }
        self.selection_changed();
        true
    }

    pub fn select_all(&mut self, selected: bool) {
        self.store.select_all(selected);
        self.selection_changed();
    }

    pub fn set_included(&mut self, id: EntityId, included: bool) -> bool {
        if !self.store.set_included(id, included) {
            return false;
        }
        self.list_changed();
        true
    }

    // --- Settings ---

    pub fn update_settings(&mut self, update: impl FnOnce(&mut TimerSettings)) {
        update(&mut self.settings);
        self.settings.normalize();
        if let Err(e) = self.persistence.save_settings(&self.settings) {
            tracing::warn!(error = %e, "Failed to save settings");
        }
        self.view_dirty = true;
    }

    // --- Bulk paths ---

    pub fn sync(&mut self, records: &[SyncRecord]) -> SyncReport {
        let report = merge_records(&mut self.store, records);
        tracing::info!(
            added = report.added,
            updated = report.updated,
            skipped = report.skipped,
            "Sync complete"
        );
        if report.changed() {
            self.list_changed();
        }
        report
    }

    /// Merge the bundled default boss list
    pub fn sync_defaults(&mut self) -> SyncReport {
        self.sync(&default_records())
    }

    pub fn export_snapshot(&self) -> Result<String, SnapshotError> {
        export_snapshot(self.store.entities())
    }

    pub fn import_snapshot(&mut self, json: &str) -> Result<SyncReport, SnapshotError> {
        let report = import_snapshot(&mut self.store, json)?;
        tracing::info!(added = report.added, updated = report.updated, "Import complete");
        if report.changed() {
            self.list_changed();
        }
        Ok(report)
    }

    pub fn share_token(&self) -> Result<String, ShareError> {
        encode_share_token(self.store.entities())
    }

    /// Apply a share token (or a URL carrying one). Returns how many bosses
    /// were updated.
    pub fn apply_share_token(&mut self, input: &str) -> Result<usize, ShareError> {
        let timers = decode_share_token(&extract_share_token(input)).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected share token");
        })?;
        let applied = apply_shared_timers(&mut self.store, &timers);
        tracing::info!(
            applied = applied.len(),
            received = timers.len(),
            "Applied shared timers"
        );
        if !applied.is_empty() {
            self.list_changed();
        }
        Ok(applied.len())
    }

    // --- Persistence ---

    fn timers_changed(&mut self) {
        self.persist_entities();
        self.view_dirty = true;
    }

    fn selection_changed(&mut self) {
        self.persist_selection();
        self.view_dirty = true;
    }

    fn list_changed(&mut self) {
        self.persist_entities();
        self.persist_selection();
        self.view_dirty = true;
    }

    /// Returns whether the boss list reached persistence.
    fn persist_entities(&mut self) -> bool {
        match self.persistence.save_entities(self.store.entities()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save boss list");
                false
            }
        }
    }

    fn persist_selection(&mut self) {
        if let Err(e) = self.persistence.save_selection(&self.store.selection()) {
            tracing::warn!(error = %e, "Failed to save selection");
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod manager_tests;
