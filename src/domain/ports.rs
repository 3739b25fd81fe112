use crate::domain::model::{MemberPage, Profile};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The three Slack Web API calls the notifier needs.
///
/// Implementations report a throttled call as `NotifyError::RateLimited` and
/// any other `ok: false` as `NotifyError::ApiError` carrying the raw body.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// `users.profile.get` for the token's own account.
    async fn profile(&self) -> Result<Profile>;

    /// `users.list`; an empty cursor requests the first page.
    async fn list_members(&self, limit: u32, cursor: &str) -> Result<MemberPage>;

    /// `chat.postMessage` to `channel`, attributed to `as_user`.
    async fn post_message(&self, channel: &str, text: &str, as_user: &str) -> Result<()>;
}
