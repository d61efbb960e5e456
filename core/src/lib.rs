pub mod context;
pub mod persistence;
pub mod serde_defaults;
pub mod store;
pub mod sync;
pub mod timers;

// Re-exports for convenience
pub use context::{AppConfig, AppConfigExt, Clock, ManualClock, SystemClock, TimerSettings};
pub use persistence::{FileStore, MemoryStore, Persistence, PersistenceError};
pub use store::ordering::SelectionSort;
pub use store::{EntityStore, NewEntity};
pub use sync::{ShareError, SnapshotError, SyncRecord, SyncReport};
pub use timers::{
    Correction, CorrectionMode, EntityId, EpochMillis, LogNotifier, NotificationEvent, Notifier,
    TickReport, TimerManager, TimerState, TrackedEntity, ValidationError, ViewEntry,
};
