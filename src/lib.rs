pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::SlackClient;
pub use config::{options::consolidate, ApiSettings, CliConfig};
pub use core::{
    composer::MessageComposer,
    notifier::{NotificationRequest, Notifier},
};
pub use utils::error::{NotifyError, Result};
