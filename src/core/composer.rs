use crate::domain::model::{MessageBody, MessageSource, OriginatingIdentity};
use crate::utils::error::{NotifyError, Result};
use regex::{Captures, Regex};

const PLACEHOLDER_PATTERN: &str = r"\{(sender|url|deadline)\}";

/// Built-in consent request. `{sender}`, `{url}` and `{deadline}` are filled in.
pub const DEFAULT_TEMPLATE: &str = "\
:robot_face:I am a bot, posting on behalf of {sender}. Beep-boop:robot_face:

We're putting together the next issue of the community newsletter, and
something you wrote, took part in, or were named in has been picked as a
possible item. The conversation is public in channel history, but we only
include people who agree to it.

The current draft is at {url}

Please tell us whether your content can be included. A blanket yes is the
easiest for us, but finer control or a blanket no is perfectly fine too.

*If we haven't heard from you by {deadline}, we will leave your content out*.

{sender} will see your reply to this message. It can be as short as
\"Ok\" (this issue only), \"Ok - always\", \"No\" or \"No - always\"
(or :thumbsup:/:thumbsdown:). They can also reword how your contribution
is presented if it doesn't match what you meant.

Questions can go in a reply here, or in the newsletter channel if they are
more general.

Thanks for being an active part of the community!

:robot_face:Beep-boop. Bot out:robot_face:";

/// Builds the single message body of a run.
#[derive(Debug, Clone)]
pub struct MessageComposer {
    template: String,
}

impl Default for MessageComposer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl MessageComposer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Fills every placeholder in a single scan, so substituted values are never rescanned.
    pub fn compose(&self, source: &MessageSource, originator: &OriginatingIdentity) -> Result<MessageBody> {
        let (url, deadline) = match source {
            // 外部內容原樣送出，不做替換
            MessageSource::Verbatim(content) => return Ok(MessageBody::new(content.clone())),
            MessageSource::Template { url, deadline } => (url, deadline),
        };

        let placeholder = Regex::new(PLACEHOLDER_PATTERN).map_err(|e| NotifyError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let rendered = placeholder.replace_all(&self.template, |caps: &Captures| match &caps[1] {
            "sender" => originator.first_name.clone(),
            "url" => url.clone(),
            _ => deadline.clone(),
        });

        Ok(MessageBody::new(rendered.into_owned()))
    }
}
