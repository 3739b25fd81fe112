use crate::domain::model::OriginatingIdentity;
use crate::domain::ports::SlackApi;
use crate::utils::error::Result;

/// Looks up the token owner; messages are attributed to this identity.
pub async fn resolve_originator<A: SlackApi>(api: &A) -> Result<OriginatingIdentity> {
    let profile = api.profile().await?;
    let identity = OriginatingIdentity::from_profile(&profile);
    tracing::info!("👤 Posting on behalf of {} ({})", identity.handle, identity.first_name);
    Ok(identity)
}
