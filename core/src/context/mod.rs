pub mod clock;
mod config;
mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    AppConfig, AppConfigExt, NotificationConfig, TimerSettings, default_data_directory,
};
pub use error::ConfigError;
