use crate::core::composer::MessageComposer;
use crate::core::directory::{DirectoryResolver, DEFAULT_PAGE_SIZE, DEFAULT_RATE_LIMIT_BACKOFF};
use crate::core::dispatcher::Dispatcher;
use crate::core::session::resolve_originator;
use crate::domain::model::{MessageSource, RunSummary};
use crate::domain::names::RequestedNameSet;
use crate::domain::ports::SlackApi;
use crate::utils::error::Result;
use std::io::Write;
use std::time::Duration;

/// Everything a single run needs, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub names: RequestedNameSet,
    pub message: MessageSource,
    pub dry_run: bool,
}

pub struct Notifier<A: SlackApi> {
    api: A,
    composer: MessageComposer,
    page_size: u32,
    backoff: Duration,
}

impl<A: SlackApi> Notifier<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            composer: MessageComposer::default(),
            page_size: DEFAULT_PAGE_SIZE,
            backoff: DEFAULT_RATE_LIMIT_BACKOFF,
        }
    }

    pub fn with_composer(mut self, composer: MessageComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn run<W: Write>(&self, request: &NotificationRequest, out: &mut W) -> Result<RunSummary> {
        tracing::info!(
            "🚀 Starting notification run for {} name(s){}",
            request.names.len(),
            if request.dry_run { " (dry run)" } else { "" }
        );

        // 身分查詢失敗就中止，此時還沒有聯絡任何人
        let originator = resolve_originator(&self.api).await?;

        let resolution = DirectoryResolver::new(&self.api)
            .with_page_size(self.page_size)
            .with_backoff(self.backoff)
            .resolve(&request.names, out)
            .await?;

        let body = self.composer.compose(&request.message, &originator)?;

        Dispatcher::new(&self.api)
            .dispatch(&body, &originator, &resolution.resolved, request.dry_run, out)
            .await?;

        if !resolution.unresolved.is_empty() {
            tracing::warn!("{} name(s) could not be resolved", resolution.unresolved.len());
            writeln!(out)?;
            writeln!(out, "*** Unable to identify the following users ***")?;
            for name in &resolution.unresolved {
                writeln!(out, "@{}", name)?;
            }
        }

        Ok(RunSummary {
            recipients: resolution.resolved,
            unresolved: resolution.unresolved,
            dry_run: request.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{member, page, ScriptedSlack};
    use crate::domain::model::ResolvedRecipient;
    use crate::utils::error::NotifyError;

    fn request(dry_run: bool) -> NotificationRequest {
        NotificationRequest {
            names: RequestedNameSet::from_raw(["Alice", "@bob"]),
            message: MessageSource::Template {
                url: "http://x".to_string(),
                deadline: "Monday".to_string(),
            },
            dry_run,
        }
    }

    fn directory() -> ScriptedSlack {
        ScriptedSlack::new(vec![Ok(page(vec![member("id1", "alice", None)], None))])
    }

    #[tokio::test]
    async fn test_run_sends_and_reports_unresolved() {
        let notifier = Notifier::new(directory());
        let mut out = Vec::new();

        let summary = notifier.run(&request(false), &mut out).await.unwrap();

        let sent = notifier.api().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].channel, "id1");
        assert_eq!(sent[0].as_user, "@rands");
        assert!(sent[0].text.contains("on behalf of Michael"));
        assert!(sent[0].text.contains("http://x"));
        assert!(sent[0].text.contains("Monday"));

        assert_eq!(summary.recipients, vec![ResolvedRecipient::new("id1", "Alice")]);
        assert_eq!(summary.unresolved, vec!["bob".to_string()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Notifying @Alice\n\n*** Unable to identify the following users ***\n@bob\n"
        );
    }

    #[tokio::test]
    async fn test_dry_run_prints_body_once() {
        let notifier = Notifier::new(directory());
        let mut out = Vec::new();

        let summary = notifier.run(&request(true), &mut out).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(summary.dry_run);
        assert!(notifier.api().sent().is_empty());
        assert_eq!(printed.matches("The current draft is at http://x").count(), 1);
        assert_eq!(printed.matches("Would have notified @").count(), 1);
        assert!(printed.contains("Would have notified @Alice"));
    }

    #[tokio::test]
    async fn test_profile_failure_contacts_nobody() {
        let api = directory().with_profile(Err(NotifyError::ApiError {
            method: "users.profile.get".to_string(),
            response: serde_json::json!({"ok": false, "error": "invalid_auth"}),
        }));
        let notifier = Notifier::new(api);
        let mut out = Vec::new();

        assert!(notifier.run(&request(false), &mut out).await.is_err());
        assert!(notifier.api().cursors().is_empty());
        assert!(notifier.api().sent().is_empty());
    }

    #[tokio::test]
    async fn test_verbatim_message_is_sent_as_is() {
        let mut req = request(false);
        req.message = MessageSource::Verbatim("Custom text for {sender}".to_string());
        let notifier = Notifier::new(directory());
        let mut out = Vec::new();

        notifier.run(&req, &mut out).await.unwrap();

        assert_eq!(notifier.api().sent()[0].text, "Custom text for {sender}");
    }
}
