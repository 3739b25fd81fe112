use crate::domain::model::{MessageBody, OriginatingIdentity, ResolvedRecipient};
use crate::domain::ports::SlackApi;
use crate::utils::error::Result;
use std::io::Write;

const SEPARATOR_WIDTH: usize = 80;

/// Delivers one message body to every resolved recipient.
pub struct Dispatcher<'a, A: SlackApi> {
    api: &'a A,
}

impl<'a, A: SlackApi> Dispatcher<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Stops at the first failed send; earlier sends are not undone.
    pub async fn dispatch<W: Write>(
        &self,
        body: &MessageBody,
        originator: &OriginatingIdentity,
        recipients: &[ResolvedRecipient],
        dry_run: bool,
        out: &mut W,
    ) -> Result<()> {
        if dry_run {
            tracing::info!("🔍 DRY RUN - {} message(s) will not be sent", recipients.len());
            let separator = "-".repeat(SEPARATOR_WIDTH);
            writeln!(out, "{}", separator)?;
            writeln!(out, "{}", body)?;
            writeln!(out, "{}", separator)?;
            writeln!(out)?;

            for recipient in recipients {
                writeln!(out, "Would have notified @{}", recipient.name)?;
            }
            return Ok(());
        }

        for recipient in recipients {
            writeln!(out, "Notifying @{}", recipient.name)?;
            self.api
                .post_message(&recipient.id, body.as_str(), &originator.handle)
                .await?;
            tracing::debug!("Sent to {} ({})", recipient.name, recipient.id);
        }

        tracing::info!("📨 Notified {} recipient(s)", recipients.len());
        Ok(())
    }
}
