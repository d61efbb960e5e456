//! Tests for TimerManager
//!
//! Drives the engine with an explicit clock, an in-memory store and a
//! recording notifier.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use respawn_types::TimerSettings;

use super::{TickReport, TimerManager};
use crate::context::{Clock, ManualClock};
use crate::persistence::{LoadedEntities, MemoryStore, Persistence, PersistenceError};
use crate::store::{EntityStore, NewEntity};
use crate::sync::{ShareError, SyncRecord, default_records};
use crate::timers::{
    Correction, CorrectionMode, EntityId, EpochMillis, MS_PER_HOUR, MS_PER_MINUTE,
    NotificationEvent, Notifier, TimerState, TrackedEntity, ValidationError,
};

const T0: EpochMillis = 1_700_000_000_000;
const SEC: i64 = 1_000;

#[derive(Clone, Default)]
struct RecordingNotifier {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl RecordingNotifier {
    fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_respawn(&self, name: &str) {
        self.events.lock().unwrap().push(NotificationEvent::Respawn {
            name: name.to_string(),
        });
    }

    fn notify_countdown(&self, name: &str, minutes: u32) {
        self.events.lock().unwrap().push(NotificationEvent::Countdown {
            name: name.to_string(),
            minutes,
        });
    }
}

/// Every write fails; reads report nothing stored.
struct FailingStore;

fn disk_full() -> PersistenceError {
    PersistenceError::Io {
        path: PathBuf::from("bosses.json"),
        source: std::io::Error::other("disk full"),
    }
}

impl Persistence for FailingStore {
    fn load_entities(&self) -> Result<Option<LoadedEntities>, PersistenceError> {
        Ok(None)
    }
    fn save_entities(&mut self, _: &[TrackedEntity]) -> Result<(), PersistenceError> {
        Err(disk_full())
    }
    fn load_selection(&self) -> Result<Option<Vec<EntityId>>, PersistenceError> {
        Ok(None)
    }
    fn save_selection(&mut self, _: &[EntityId]) -> Result<(), PersistenceError> {
        Err(disk_full())
    }
    fn load_settings(&self) -> Result<Option<TimerSettings>, PersistenceError> {
        Ok(None)
    }
    fn save_settings(&mut self, _: &TimerSettings) -> Result<(), PersistenceError> {
        Err(disk_full())
    }
}

fn notifying() -> TimerSettings {
    TimerSettings {
        notify_on_respawn: true,
        notify_on_countdown: true,
        ..Default::default()
    }
}

/// Manager over three bosses: Eddga (1h), Maya (2h), Osiris (0.5h)
fn manager_with(settings: TimerSettings) -> (TimerManager, MemoryStore, RecordingNotifier) {
    let mut store = EntityStore::new();
    store.push_new("Eddga", 1.0);
    store.push_new("Maya", 2.0);
    store.push_new("Osiris", 0.5);

    let memory = MemoryStore::new();
    let notifier = RecordingNotifier::default();
    let manager = TimerManager::new(
        store,
        settings,
        Box::new(memory.clone()),
        Box::new(notifier.clone()),
    );
    (manager, memory, notifier)
}

/// 2024-05-10 at `hour:minute` UTC
fn utc_at(hour: u32, minute: u32) -> EpochMillis {
    let naive = NaiveDate::from_ymd_opt(2024, 5, 10)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap();
    Utc.from_utc_datetime(&naive).timestamp_millis()
}

fn countdown(name: &str, minutes: u32) -> NotificationEvent {
    NotificationEvent::Countdown {
        name: name.to_string(),
        minutes,
    }
}

fn respawn(name: &str) -> NotificationEvent {
    NotificationEvent::Respawn {
        name: name.to_string(),
    }
}

// ─── Kill / cancel / correct ────────────────────────────────────────────────

#[test]
fn kill_starts_a_cycle_with_float_buffer() {
    let (mut manager, memory, _) = manager_with(TimerSettings::default());

    assert!(manager.kill(1, T0));

    let boss = manager.store().get(1).unwrap();
    assert_eq!(boss.target_time, Some(T0 + MS_PER_HOUR));
    assert_eq!(boss.float_secs, 600);
    assert_eq!(
        memory.entities().unwrap()[0].target_time,
        Some(T0 + MS_PER_HOUR)
    );
}

#[test]
fn kill_without_float_buffer() {
    let (mut manager, _, _) = manager_with(TimerSettings {
        use_float_buffer: false,
        ..Default::default()
    });
    manager.kill(1, T0);
    assert_eq!(manager.store().get(1).unwrap().float_secs, 0);
}

#[test]
fn re_kill_resets_notification_state() {
    let (mut manager, _, notifier) = manager_with(notifying());
    manager.kill(1, T0);
    manager.tick(T0 + MS_PER_HOUR);
    assert_eq!(notifier.events(), vec![respawn("Eddga")]);
    assert!(manager.store().get(1).unwrap().respawn_notified);

    let later = T0 + MS_PER_HOUR + 10 * SEC;
    manager.kill(1, later);

    let boss = manager.store().get(1).unwrap();
    assert_eq!(boss.target_time, Some(later + MS_PER_HOUR));
    assert!(!boss.respawn_notified);
    assert_eq!(boss.last_countdown_minute, None);
}

#[test]
fn cancel_returns_to_idle() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    manager.kill(2, T0);
    assert!(manager.cancel(2));

    let boss = manager.store().get(2).unwrap();
    assert!(boss.is_idle());
    assert_eq!(boss.float_secs, 0);
}

#[test]
fn correct_remaining_adds_a_minute_and_no_float() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());

    assert_eq!(manager.correct(2, &Correction::remaining(1, 30), T0), Ok(true));

    let boss = manager.store().get(2).unwrap();
    assert_eq!(
        boss.target_time,
        Some(T0 + MS_PER_HOUR + 31 * MS_PER_MINUTE)
    );
    assert_eq!(boss.float_secs, 0);
}

#[test]
fn correct_killed_counts_from_the_kill_instant() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());

    // Maya (2h) killed at 09:00, corrected at 10:30
    let result = manager.correct_in(&Utc, 2, &Correction::killed_at(9, 0), utc_at(10, 30));

    assert_eq!(result, Ok(true));
    let boss = manager.store().get(2).unwrap();
    assert_eq!(boss.target_time, Some(utc_at(11, 0)));
    assert_eq!(boss.float_secs, 600);
}

#[test]
fn correct_killed_after_midnight_rolls_back_a_day() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());

    // at 01:00 a 23:00 kill happened yesterday
    manager
        .correct_in(&Utc, 2, &Correction::killed_at(23, 0), utc_at(1, 0))
        .unwrap();

    let yesterday_23 = utc_at(23, 0) - 24 * MS_PER_HOUR;
    assert_eq!(
        manager.store().get(2).unwrap().target_time,
        Some(yesterday_23 + 2 * MS_PER_HOUR)
    );
}

#[test]
fn midnight_kill_time_starts_a_cycle() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    manager.kill(1, utc_at(10, 30));

    let result = manager.correct_in(&Utc, 1, &Correction::killed_at(0, 0), utc_at(10, 30));

    assert_eq!(result, Ok(true));
    assert_eq!(
        manager.store().get(1).unwrap().target_time,
        Some(utc_at(0, 0) + MS_PER_HOUR)
    );
}

#[test]
fn zero_minutes_remaining_is_one_minute() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    let correction = Correction {
        mode: CorrectionMode::Remaining,
        hours: None,
        minutes: Some(0),
    };

    assert_eq!(manager.correct(1, &correction, T0), Ok(true));
    assert_eq!(
        manager.store().get(1).unwrap().target_time,
        Some(T0 + MS_PER_MINUTE)
    );
}

#[test]
fn empty_correction_cancels() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    manager.kill(1, T0);

    assert_eq!(manager.correct(1, &Correction::default(), T0), Ok(true));
    assert!(manager.store().get(1).unwrap().is_idle());

    manager.kill(1, T0);
    let killed_mode = Correction {
        mode: CorrectionMode::Killed,
        ..Default::default()
    };
    assert_eq!(manager.correct(1, &killed_mode, T0), Ok(true));
    assert!(manager.store().get(1).unwrap().is_idle());
}

#[test]
fn oversized_intervals_never_enter_the_store() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());

    let result = manager.add_entity(&NewEntity::new("Huge", Some("1e300"), None));
    assert_eq!(result, Err(ValidationError::InvalidDuration { hours: 1e300 }));

    let report = manager.sync(&[SyncRecord::new("Huge", 1e300)]);
    assert_eq!(report.skipped, 1);
    assert!(manager.store().find_by_name("Huge").is_none());
}

#[test]
fn kill_saturates_on_a_stored_huge_interval() {
    // hand-edited data files bypass validation
    let memory = MemoryStore::with_entities(vec![TrackedEntity::new(1, "Huge", 1e300)]);
    let mut manager = TimerManager::load(Box::new(memory), Box::new(RecordingNotifier::default()));

    assert!(manager.kill(1, T0));
    assert_eq!(manager.store().get(1).unwrap().target_time, Some(i64::MAX));
    assert!(matches!(manager.view(T0)[0].state, TimerState::Active(_)));
}

#[test]
fn invalid_kill_time_is_rejected_without_change() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    manager.kill(1, T0);

    let result = manager.correct(1, &Correction::killed_at(25, 0), T0);

    assert_eq!(
        result,
        Err(ValidationError::InvalidClockTime {
            hour: 25,
            minute: 0
        })
    );
    assert_eq!(
        manager.store().get(1).unwrap().target_time,
        Some(T0 + MS_PER_HOUR)
    );
}

#[test]
fn unknown_ids_are_no_ops() {
    let (mut manager, memory, _) = manager_with(TimerSettings::default());

    assert!(!manager.kill(99, T0));
    assert!(!manager.cancel(99));
    assert_eq!(manager.correct(99, &Correction::remaining(1, 0), T0), Ok(false));
    assert!(!manager.set_selected(99, false));
    assert!(!manager.set_included(99, false));
    assert!(manager.delete_entity(99).is_none());
    assert_eq!(memory.save_count(), 0);
}

// ─── Tick ───────────────────────────────────────────────────────────────────

#[test]
fn countdown_fires_once_per_minute_bucket() {
    let (mut manager, _, notifier) = manager_with(notifying());
    let clock = ManualClock::new(T0);
    manager.kill(1, clock.now_millis());

    // 3:00 left is not below the threshold yet
    clock.advance(MS_PER_HOUR - 180 * SEC);
    manager.tick(clock.now_millis());
    assert!(notifier.events().is_empty());

    for step in [30, 20, 40, 60, 25] {
        clock.advance(step * SEC);
        manager.tick(clock.now_millis());
    }

    assert_eq!(
        notifier.events(),
        vec![
            countdown("Eddga", 3),
            countdown("Eddga", 2),
            countdown("Eddga", 1),
        ]
    );
    assert_eq!(manager.store().get(1).unwrap().last_countdown_minute, Some(0));
}

#[test]
fn respawn_fires_once_per_cycle() {
    let (mut manager, memory, notifier) = manager_with(notifying());
    manager.kill(1, T0);
    let target = T0 + MS_PER_HOUR;
    let saves_before = memory.save_count();

    let first = manager.tick(target);
    let second = manager.tick(target + 30 * SEC);

    assert_eq!(first.notifications, vec![respawn("Eddga")]);
    assert!(first.persisted);
    assert_eq!(second, TickReport::default());
    assert_eq!(notifier.events(), vec![respawn("Eddga")]);
    assert_eq!(memory.save_count(), saves_before + 1);
}

#[test]
fn tick_is_idempotent_at_a_fixed_instant() {
    let (mut manager, _, notifier) = manager_with(notifying());
    manager.kill(1, T0);
    manager.kill(3, T0);
    let now = T0 + 29 * MS_PER_MINUTE;

    manager.tick(now);
    let events = notifier.events();
    let snapshot = manager.store().entities().to_vec();

    assert_eq!(manager.tick(now), TickReport::default());
    assert_eq!(notifier.events(), events);
    assert_eq!(manager.store().entities(), snapshot.as_slice());
}

#[test]
fn countdown_needs_respawn_notifications() {
    let (mut manager, _, notifier) = manager_with(TimerSettings {
        notify_on_respawn: false,
        notify_on_countdown: true,
        ..Default::default()
    });
    manager.kill(1, T0);

    manager.tick(T0 + MS_PER_HOUR - 30 * SEC);
    manager.tick(T0 + MS_PER_HOUR);

    assert!(notifier.events().is_empty());
}

#[test]
fn countdown_does_not_persist() {
    let (mut manager, memory, _) = manager_with(notifying());
    manager.kill(1, T0);
    let saves = memory.save_count();

    let report = manager.tick(T0 + MS_PER_HOUR - 30 * SEC);

    assert_eq!(report.notifications.len(), 1);
    assert!(!report.persisted);
    assert_eq!(memory.save_count(), saves);
}

#[test]
fn stale_cycle_is_cleared_and_persisted() {
    let (mut manager, memory, notifier) = manager_with(notifying());
    manager.kill(1, T0);
    manager.take_view_dirty();

    // one full interval past the target
    let report = manager.tick(T0 + 2 * MS_PER_HOUR);

    assert_eq!(report.cleared, vec![1]);
    assert!(report.needs_reorder());
    assert!(report.persisted);
    assert!(manager.take_view_dirty());
    assert!(notifier.events().is_empty());
    assert!(manager.store().get(1).unwrap().is_idle());
    assert!(memory.entities().unwrap()[0].is_idle());
}

#[test]
fn expired_stays_until_stale() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    manager.kill(1, T0);

    let report = manager.tick(T0 + 2 * MS_PER_HOUR - SEC);

    assert!(report.cleared.is_empty());
    let view = manager.view(T0 + 2 * MS_PER_HOUR - SEC);
    assert_eq!(view[0].entity.id, 1);
    assert_eq!(view[0].state, TimerState::Expired);
}

#[test]
fn resume_catches_up_after_a_long_gap() {
    let (mut manager, _, notifier) = manager_with(notifying());
    let clock = ManualClock::new(T0);
    manager.kill(1, clock.now_millis());
    manager.kill(2, clock.now_millis());
    manager.take_view_dirty();

    // host asleep: Eddga is stale, Maya just expired
    clock.advance(2 * MS_PER_HOUR + SEC);
    let report = manager.resume(clock.now_millis());

    assert_eq!(report.cleared, vec![1]);
    assert_eq!(notifier.events(), vec![respawn("Maya")]);
    assert!(manager.take_view_dirty());
}

#[test]
fn failing_persistence_is_not_fatal() {
    let notifier = RecordingNotifier::default();
    let mut manager = TimerManager::load(Box::new(FailingStore), Box::new(notifier));

    assert_eq!(manager.store().len(), default_records().len());
    assert!(manager.kill(1, T0));
    manager.update_settings(|s| s.notify_on_respawn = true);
    let report = manager.tick(T0 + 10 * MS_PER_HOUR);

    // the stale cycle is still cleared in memory, but nothing was written
    assert_eq!(report.cleared, vec![1]);
    assert!(!report.persisted);
    assert!(manager.store().get(1).unwrap().is_idle());
    assert!(manager.settings().notify_on_respawn);
}

// ─── Load ───────────────────────────────────────────────────────────────────

#[test]
fn empty_storage_seeds_defaults() {
    let memory = MemoryStore::new();
    let manager = TimerManager::load(
        Box::new(memory.clone()),
        Box::new(RecordingNotifier::default()),
    );

    let defaults = default_records();
    assert_eq!(manager.store().len(), defaults.len());
    assert_eq!(manager.store().selection().len(), defaults.len());
    assert!(manager.store().entities().iter().all(|e| e.is_idle()));
    assert_eq!(memory.entities().unwrap().len(), defaults.len());
    assert_eq!(memory.selection().unwrap().len(), defaults.len());
    assert_eq!(manager.settings(), &TimerSettings::default());
}

#[test]
fn stored_list_is_restored_as_is() {
    let mut boss = TrackedEntity::new(7, "Baphomet", 2.0);
    boss.start_cycle(T0, 600);
    let memory = MemoryStore::with_entities(vec![boss.clone()]);

    let mut manager = TimerManager::load(Box::new(memory), Box::new(RecordingNotifier::default()));

    assert_eq!(manager.store().entities(), &[boss]);
    // no stored selection: everything selected
    assert!(manager.store().is_selected(7));
    let id = manager
        .add_entity(&NewEntity::new("Drake", Some("2"), None))
        .unwrap();
    assert_eq!(id, 8);
}

#[test]
fn stored_empty_list_is_not_reseeded() {
    let memory = MemoryStore::with_entities(Vec::new());
    let manager = TimerManager::load(Box::new(memory), Box::new(RecordingNotifier::default()));
    assert!(manager.store().is_empty());
}

#[test]
fn stored_settings_are_normalized() {
    let mut memory = MemoryStore::new();
    memory
        .save_settings(&TimerSettings {
            notify_on_respawn: false,
            notify_on_countdown: true,
            ..Default::default()
        })
        .unwrap();

    let manager = TimerManager::load(Box::new(memory), Box::new(RecordingNotifier::default()));
    assert!(!manager.settings().countdown_enabled());
    assert!(!manager.settings().notify_on_countdown);
}

// ─── List management and view ───────────────────────────────────────────────

#[test]
fn view_is_urgency_ordered_and_filtered() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    manager.kill(2, T0); // Maya, 2h
    manager.kill(3, T0); // Osiris, 30m
    manager.set_selected(1, false);

    let ids: Vec<_> = manager.view(T0).iter().map(|row| row.entity.id).collect();
    assert_eq!(ids, vec![3, 2]);

    manager.set_selected(1, true);
    manager.set_included(3, false);
    let ids: Vec<_> = manager.view(T0).iter().map(|row| row.entity.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(manager.view(T0)[1].state, TimerState::Idle);
}

#[test]
fn add_validates_and_persists() {
    let (mut manager, memory, _) = manager_with(TimerSettings::default());

    assert_eq!(
        manager.add_entity(&NewEntity::new(" Eddga ", Some("1"), None)),
        Err(ValidationError::DuplicateName {
            name: "Eddga".to_string()
        })
    );

    let id = manager
        .add_entity(&NewEntity::new("Phreeoni", Some("1"), Some("30")))
        .unwrap();
    assert_eq!(id, 4);
    assert_eq!(manager.store().get(id).unwrap().respawn_hours, 1.5);
    assert!(manager.store().is_selected(id));
    assert_eq!(memory.entities().unwrap().len(), manager.store().len());
    assert!(memory.selection().unwrap().contains(&id));

    assert_eq!(
        manager.add_entity(&NewEntity::new("Nameless", None, None)),
        Err(ValidationError::MissingDuration)
    );
}

#[test]
fn delete_does_not_recycle_ids() {
    let (mut manager, memory, _) = manager_with(TimerSettings::default());

    let removed = manager.delete_entity(3).unwrap();
    assert_eq!(removed.name, "Osiris");
    assert!(!memory.selection().unwrap().contains(&3));

    let id = manager
        .add_entity(&NewEntity::new("Pharaoh", Some("1"), None))
        .unwrap();
    assert_eq!(id, 4);
}

#[test]
fn move_changes_canonical_order_only() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    assert!(manager.move_entity(2, 0));

    let names: Vec<_> = manager
        .store()
        .entities()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Osiris", "Eddga", "Maya"]);
    assert!(!manager.move_entity(0, 9));
}

#[test]
fn settings_update_is_normalized_and_saved() {
    let (mut manager, memory, _) = manager_with(notifying());

    manager.update_settings(|s| s.notify_on_respawn = false);

    assert!(!manager.settings().notify_on_countdown);
    assert_eq!(memory.settings(), Some(manager.settings().clone()));
}

// ─── Bulk paths ─────────────────────────────────────────────────────────────

#[test]
fn sync_defaults_only_adds_missing_names() {
    let (mut manager, _, _) = manager_with(TimerSettings::default());
    manager.kill(1, T0);

    let report = manager.sync_defaults();

    assert!(report.added > 0);
    assert_eq!(manager.store().len(), 3 + report.added);
    // running timer survives the merge
    assert_eq!(
        manager.store().get(1).unwrap().target_time,
        Some(T0 + MS_PER_HOUR)
    );
}

#[test]
fn shared_timers_apply_to_matching_ids() {
    let (mut source, _, _) = manager_with(TimerSettings::default());
    source.kill(2, T0);
    let token = source.share_token().unwrap();

    let (mut target, memory, _) = manager_with(TimerSettings::default());
    target.set_included(2, false);
    let applied = target
        .apply_share_token(&format!("https://example.org/?share={token}"))
        .unwrap();

    assert_eq!(applied, 1);
    let maya = target.store().get(2).unwrap();
    assert_eq!(maya.target_time, Some(T0 + 2 * MS_PER_HOUR));
    assert_eq!(maya.float_secs, 600);
    assert!(maya.include_in_selection_list);
    assert!(target.store().is_selected(2));
    assert!(memory.entities().unwrap()[1].target_time.is_some());
}

#[test]
fn bad_share_token_changes_nothing() {
    let (mut manager, memory, _) = manager_with(TimerSettings::default());

    assert!(matches!(
        manager.apply_share_token("not base64!"),
        Err(ShareError::Decode(_))
    ));
    assert!(matches!(
        manager.share_token(),
        Err(ShareError::NothingToShare)
    ));
    assert_eq!(memory.save_count(), 0);
}

#[test]
fn import_merges_exported_snapshot() {
    let (mut source, _, _) = manager_with(TimerSettings::default());
    source
        .add_entity(&NewEntity::new("Atroce", Some("4"), None))
        .unwrap();
    let json = source.export_snapshot().unwrap();

    let (mut target, _, _) = manager_with(TimerSettings::default());
    let report = target.import_snapshot(&json).unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(report.updated, 0);
    assert!(target.store().find_by_name("Atroce").is_some());
}
