use std::path::Path;

use clap::ValueEnum;
use respawn_core::sync::snapshot::EXPORT_FILE_NAME;
use respawn_core::sync::share::share_url;
use respawn_core::{
    AppConfigExt, Correction, CorrectionMode, EntityId, EpochMillis, NewEntity, SelectionSort,
    TimerManager,
};

use crate::context::CliContext;
use crate::render::{render_list_item, render_row};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Default,
    NameAsc,
    NameDesc,
    IntervalAsc,
    IntervalDesc,
    CheckedFirst,
}

impl From<SortArg> for SelectionSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Default => SelectionSort::Default,
            SortArg::NameAsc => SelectionSort::NameAsc,
            SortArg::NameDesc => SelectionSort::NameDesc,
            SortArg::IntervalAsc => SelectionSort::IntervalAsc,
            SortArg::IntervalDesc => SelectionSort::IntervalDesc,
            SortArg::CheckedFirst => SelectionSort::CheckedFirst,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Hours and minutes left until respawn
    Remaining,
    /// Local clock time of the kill
    Killed,
}

impl From<ModeArg> for CorrectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Remaining => CorrectionMode::Remaining,
            ModeArg::Killed => CorrectionMode::Killed,
        }
    }
}

/// Optional fields of the `set` command
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub notify_respawn: Option<bool>,
    pub notify_countdown: Option<bool>,
    pub threshold: Option<u32>,
    pub float_buffer: Option<bool>,
    pub float_minutes: Option<u32>,
    pub notifications: Option<bool>,
    pub bell: Option<bool>,
}

fn resolve(manager: &TimerManager, target: &str) -> Result<EntityId, String> {
    manager
        .resolve(target)
        .ok_or_else(|| format!("No boss matches '{target}'\n"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Views
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list(ctx: &CliContext) -> Result<(), String> {
    let now = ctx.now();
    let mut manager = ctx.manager.lock().await;
    manager.take_view_dirty();

    let view = manager.view(now);
    if view.is_empty() {
        println!("No bosses selected. Use `select` or `select-all`.");
        return Ok(());
    }
    for entry in &view {
        println!("{}", render_row(entry, manager.settings()));
    }
    Ok(())
}

pub async fn bosses(ctx: &CliContext, sort: SortArg, search: &str) -> Result<(), String> {
    let manager = ctx.manager.lock().await;
    let items = manager.selection_list(sort.into(), search);
    if items.is_empty() {
        println!("No bosses match '{search}'");
        return Ok(());
    }
    for entity in items {
        println!(
            "{}",
            render_list_item(entity, manager.store().is_selected(entity.id))
        );
    }
    let hidden = manager
        .store()
        .entities()
        .iter()
        .filter(|e| !e.include_in_selection_list)
        .count();
    if hidden > 0 {
        println!("({hidden} excluded, use `include` to show)");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Timers
// ─────────────────────────────────────────────────────────────────────────────

pub async fn kill(ctx: &CliContext, target: &str) -> Result<(), String> {
    let now = ctx.now();
    let mut manager = ctx.manager.lock().await;
    let id = resolve(&manager, target)?;
    manager.kill(id, now);
    print_boss(&manager, id, now);
    Ok(())
}

pub async fn cancel(ctx: &CliContext, target: &str) -> Result<(), String> {
    let mut manager = ctx.manager.lock().await;
    let id = resolve(&manager, target)?;
    manager.cancel(id);
    println!("Timer cancelled");
    Ok(())
}

pub async fn correct(
    ctx: &CliContext,
    target: &str,
    mode: ModeArg,
    hours: Option<u32>,
    minutes: Option<u32>,
) -> Result<(), String> {
    let now = ctx.now();
    let mut manager = ctx.manager.lock().await;
    let id = resolve(&manager, target)?;
    let correction = Correction {
        mode: mode.into(),
        hours,
        minutes,
    };
    manager
        .correct(id, &correction, now)
        .map_err(|e| format!("{e}\n"))?;

    if correction.is_cancel() {
        println!("Timer cancelled");
    } else {
        print_boss(&manager, id, now);
    }
    Ok(())
}

pub async fn resume(ctx: &CliContext) -> Result<(), String> {
    let now = ctx.now();
    let report = ctx.manager.lock().await.resume(now);
    println!(
        "Caught up: {} cleared, {} notification(s)",
        report.cleared.len(),
        report.notifications.len()
    );
    Ok(())
}

fn print_boss(manager: &TimerManager, id: EntityId, now: EpochMillis) {
    let view = manager.view(now);
    match view.iter().find(|e| e.entity.id == id) {
        Some(entry) => println!("{}", render_row(entry, manager.settings())),
        // not selected, so not part of the view
        None => println!("Timer updated (boss {id} is not selected)"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Boss list
// ─────────────────────────────────────────────────────────────────────────────

pub async fn add(
    ctx: &CliContext,
    name: &str,
    hours: Option<&str>,
    minutes: Option<&str>,
) -> Result<(), String> {
    let mut manager = ctx.manager.lock().await;
    let id = manager
        .add_entity(&NewEntity::new(name, hours, minutes))
        .map_err(|e| format!("{e}\n"))?;
    println!("Added {} (id {id})", name.trim());
    Ok(())
}

pub async fn delete(ctx: &CliContext, target: &str) -> Result<(), String> {
    let mut manager = ctx.manager.lock().await;
    let id = resolve(&manager, target)?;
    if let Some(removed) = manager.delete_entity(id) {
        println!("Deleted {}", removed.name);
    }
    Ok(())
}

/// Positions are 1-based, in stored order (`bosses --sort default` with no exclusions).
pub async fn move_boss(ctx: &CliContext, from: usize, to: usize) -> Result<(), String> {
    let mut manager = ctx.manager.lock().await;
    let moved = from > 0 && to > 0 && manager.move_entity(from - 1, to - 1);
    if !moved {
        return Err(format!(
            "Invalid positions {from} -> {to} (1..={})\n",
            manager.store().len()
        ));
    }
    println!("Moved");
    Ok(())
}

pub async fn select(ctx: &CliContext, target: &str, selected: bool) -> Result<(), String> {
    let mut manager = ctx.manager.lock().await;
    let id = resolve(&manager, target)?;
    manager.set_selected(id, selected);
    Ok(())
}

pub async fn select_all(ctx: &CliContext, selected: bool) -> Result<(), String> {
    ctx.manager.lock().await.select_all(selected);
    Ok(())
}

pub async fn include(ctx: &CliContext, target: &str, included: bool) -> Result<(), String> {
    let mut manager = ctx.manager.lock().await;
    let id = resolve(&manager, target)?;
    manager.set_included(id, included);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Bulk paths
// ─────────────────────────────────────────────────────────────────────────────

pub async fn sync(ctx: &CliContext) -> Result<(), String> {
    let report = ctx.manager.lock().await.sync_defaults();
    println!(
        "Sync complete: {} added, {} updated",
        report.added, report.updated
    );
    Ok(())
}

pub async fn export(ctx: &CliContext, path: Option<&str>) -> Result<(), String> {
    let path = Path::new(path.unwrap_or(EXPORT_FILE_NAME));
    let json = ctx
        .manager
        .lock()
        .await
        .export_snapshot()
        .map_err(|e| format!("{e}\n"))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}\n", path.display()))?;
    println!("Exported to {}", path.display());
    Ok(())
}

pub async fn import(ctx: &CliContext, path: &str) -> Result<(), String> {
    let json = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}\n"))?;
    let report = ctx
        .manager
        .lock()
        .await
        .import_snapshot(&json)
        .map_err(|e| format!("Invalid boss list: {e}\n"))?;
    println!(
        "Import complete: {} added, {} updated, {} skipped",
        report.added, report.updated, report.skipped
    );
    Ok(())
}

pub async fn share(ctx: &CliContext, base: Option<&str>) -> Result<(), String> {
    let token = ctx
        .manager
        .lock()
        .await
        .share_token()
        .map_err(|e| format!("{e}\n"))?;
    match base {
        Some(base) => println!("{}", share_url(base, &token)),
        None => println!("{token}"),
    }
    Ok(())
}

pub async fn apply_share(ctx: &CliContext, token: &str) -> Result<(), String> {
    let applied = ctx
        .manager
        .lock()
        .await
        .apply_share_token(token)
        .map_err(|e| format!("Invalid share token: {e}\n"))?;
    println!("Applied {applied} shared timer(s)");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

pub async fn show_settings(ctx: &CliContext) -> Result<(), String> {
    let settings = ctx.manager.lock().await.settings().clone();
    let config = ctx.config.read().await.clone();

    println!("Notify on respawn:    {}", settings.notify_on_respawn);
    println!("Countdown alerts:     {}", settings.notify_on_countdown);
    println!("Countdown threshold:  {} min", settings.countdown_threshold_minutes);
    println!("Float buffer:         {}", settings.use_float_buffer);
    println!("Float buffer length:  {} min", settings.float_buffer_minutes);
    println!("Notifications:        {}", config.notifications.enabled);
    println!("Bell:                 {}", config.notifications.bell);
    println!("Tick interval:        {} ms", config.tick_interval_ms);
    if ctx.ephemeral {
        println!("Data directory:       (ephemeral)");
    } else {
        println!(
            "Data directory:       {}",
            config.resolved_data_directory().display()
        );
    }
    if let Some(path) = respawn_core::AppConfig::config_path() {
        println!("Config file:          {}", path.display());
    }
    Ok(())
}

pub async fn set(ctx: &CliContext, update: SettingsUpdate) -> Result<(), String> {
    ctx.manager.lock().await.update_settings(|s| {
        if let Some(v) = update.notify_respawn {
            s.notify_on_respawn = v;
        }
        if let Some(v) = update.notify_countdown {
            s.notify_on_countdown = v;
        }
        if let Some(v) = update.threshold {
            s.countdown_threshold_minutes = v;
        }
        if let Some(v) = update.float_buffer {
            s.use_float_buffer = v;
        }
        if let Some(v) = update.float_minutes {
            s.float_buffer_minutes = v;
        }
    });

    if update.notifications.is_some() || update.bell.is_some() {
        let mut config = ctx.config.write().await;
        if let Some(v) = update.notifications {
            config.notifications.enabled = v;
        }
        if let Some(v) = update.bell {
            config.notifications.bell = v;
        }
        match ctx.notifications.write() {
            Ok(mut shared) => *shared = config.notifications.clone(),
            Err(poisoned) => *poisoned.into_inner() = config.notifications.clone(),
        }
        if !ctx.ephemeral {
            config.save().map_err(|e| format!("Failed to save config: {e}\n"))?;
        }
    }

    show_settings(ctx).await
}

pub fn exit() {
    println!("quitting...");
}
