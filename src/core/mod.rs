pub mod composer;
pub mod directory;
pub mod dispatcher;
pub mod notifier;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{MessageSource, Resolution, RunSummary};
pub use crate::domain::ports::SlackApi;
pub use crate::utils::error::Result;
