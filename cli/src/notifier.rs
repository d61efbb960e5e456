//! Terminal notifications
//!
//! Notifications are printed on their own line so they stay readable while
//! the REPL is waiting for input. The config handle is shared with the
//! `set` command so toggles apply without a restart. Every notification is
//! also written to the log, even while terminal output is disabled.

use std::io::Write;
use std::sync::{Arc, RwLock};

use respawn_core::{LogNotifier, Notifier};
use respawn_types::NotificationConfig;

pub type NotificationHandle = Arc<RwLock<NotificationConfig>>;

pub struct TerminalNotifier {
    config: NotificationHandle,
    log: LogNotifier,
}

impl TerminalNotifier {
    pub fn new(config: NotificationHandle) -> Self {
        Self {
            config,
            log: LogNotifier,
        }
    }

    fn emit(&self, message: &str) {
        let config = match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if !config.enabled {
            tracing::debug!(message, "Notifications disabled, dropping");
            return;
        }

        let bell = if config.bell { "\x07" } else { "" };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "\n{bell}>> {message}").and_then(|_| stdout.flush()) {
            tracing::warn!(error = %e, "Failed to print notification");
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify_respawn(&self, name: &str) {
        self.log.notify_respawn(name);
        self.emit(&format!("{name} has respawned!"));
    }

    fn notify_countdown(&self, name: &str, minutes: u32) {
        self.log.notify_countdown(name, minutes);
        self.emit(&format!("{name} respawns in {minutes} min"));
    }
}
