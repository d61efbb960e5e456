use std::sync::Arc;

use respawn_core::{
    AppConfig, AppConfigExt, Clock, EpochMillis, FileStore, MemoryStore, Persistence,
    SystemClock, TimerManager,
};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::notifier::{NotificationHandle, TerminalNotifier};

/// The engine, shared between the REPL and the ticker. Holding the lock is
/// what keeps a tick from overlapping any other mutation.
pub type SharedManager = Arc<Mutex<TimerManager>>;

#[derive(Default)]
pub struct BackgroundTasks {
    pub ticker: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn abort_all(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the engine.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    pub manager: SharedManager,
    pub notifications: NotificationHandle,
    pub clock: Arc<dyn Clock>,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
    /// Nothing is written to disk
    pub ephemeral: bool,
}

impl CliContext {
    pub fn new(config: AppConfig, ephemeral: bool) -> Self {
        let notifications: NotificationHandle =
            Arc::new(std::sync::RwLock::new(config.notifications.clone()));

        let persistence: Box<dyn Persistence> = if ephemeral {
            tracing::info!("Ephemeral session, state will not be saved");
            Box::new(MemoryStore::new())
        } else {
            let dir = config.resolved_data_directory();
            tracing::info!(data_directory = %dir.display(), "Using file storage");
            Box::new(FileStore::new(dir))
        };
        let notifier = TerminalNotifier::new(Arc::clone(&notifications));
        let manager = TimerManager::load(persistence, Box::new(notifier));

        Self {
            config: Arc::new(RwLock::new(config)),
            manager: Arc::new(Mutex::new(manager)),
            notifications,
            clock: Arc::new(SystemClock),
            tasks: Arc::new(Mutex::new(BackgroundTasks::default())),
            ephemeral,
        }
    }

    pub fn now(&self) -> EpochMillis {
        self.clock.now_millis()
    }
}
