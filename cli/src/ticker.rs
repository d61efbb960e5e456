//! Background tick task
//!
//! Drives the engine on a fixed cadence. A wall-clock gap larger than the
//! configured resume gap (laptop asleep, process stopped) is handled with a
//! resume tick instead of a plain one.

use std::sync::Arc;
use std::time::Duration;

use respawn_core::{Clock, EpochMillis};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::context::{CliContext, SharedManager};

/// Spawn the ticker with the current config.
pub async fn spawn_ticker(ctx: &CliContext) -> JoinHandle<()> {
    let (tick_interval, resume_gap) = {
        let config = ctx.config.read().await;
        (
            Duration::from_millis(config.tick_interval_ms.max(100)),
            Duration::from_secs(config.resume_gap_secs),
        )
    };
    let manager = Arc::clone(&ctx.manager);
    let clock = Arc::clone(&ctx.clock);

    tokio::spawn(run_ticker(manager, clock, tick_interval, resume_gap))
}

pub async fn run_ticker(
    manager: SharedManager,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    resume_gap: Duration,
) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick = clock.now_millis();

    tracing::debug!(?tick_interval, ?resume_gap, "Ticker started");

    loop {
        interval.tick().await;
        let now = clock.now_millis();
        let gap = now - last_tick;
        last_tick = now;

        let mut engine = manager.lock().await;
        let report = if is_resume_gap(gap, resume_gap) {
            tracing::info!(gap_ms = gap, "Tick gap detected");
            engine.resume(now)
        } else {
            engine.tick(now)
        };
        drop(engine);

        if report.needs_reorder() {
            println!(
                "\n>> {} timer(s) ran out and were cleared. Run `list` to refresh.",
                report.cleared.len()
            );
        }
    }
}

/// Gaps are measured on the wall clock, so a host that was suspended sees
/// one large gap on its first tick back.
pub fn is_resume_gap(gap_ms: EpochMillis, resume_gap: Duration) -> bool {
    gap_ms > resume_gap.as_millis() as EpochMillis
}
