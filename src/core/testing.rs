//! In-memory `SlackApi` used by the unit tests.

use crate::domain::model::{Member, MemberPage, Profile};
use crate::domain::ports::SlackApi;
use crate::utils::error::{NotifyError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) fn member(id: &str, name: &str, real_name: Option<&str>) -> Member {
    Member {
        id: id.to_string(),
        name: Some(name.to_string()),
        real_name: real_name.map(str::to_string),
    }
}

pub(crate) fn page(members: Vec<Member>, next_cursor: Option<&str>) -> MemberPage {
    MemberPage {
        members,
        response_metadata: next_cursor.map(|cursor| crate::domain::model::ResponseMetadata {
            next_cursor: Some(cursor.to_string()),
        }),
    }
}

pub(crate) fn rate_limited() -> NotifyError {
    NotifyError::RateLimited {
        method: "users.list".to_string(),
        response: json!({"ok": false, "error": "ratelimited"}),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SentMessage {
    pub channel: String,
    pub text: String,
    pub as_user: String,
}

/// Replays scripted directory pages and records every call.
pub(crate) struct ScriptedSlack {
    profile: Mutex<Option<Result<Profile>>>,
    pages: Mutex<VecDeque<Result<MemberPage>>>,
    fail_post_to: Option<String>,
    pub cursors: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<SentMessage>>,
}

impl ScriptedSlack {
    pub fn new(pages: Vec<Result<MemberPage>>) -> Self {
        Self {
            profile: Mutex::new(Some(Ok(Profile {
                display_name_normalized: "rands".to_string(),
                first_name: Some("Michael".to_string()),
            }))),
            pages: Mutex::new(pages.into()),
            fail_post_to: None,
            cursors: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_profile(self, profile: Result<Profile>) -> Self {
        *self.profile.lock().unwrap() = Some(profile);
        self
    }

    pub fn failing_post_to(mut self, channel: &str) -> Self {
        self.fail_post_to = Some(channel.to_string());
        self
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn cursors(&self) -> Vec<String> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlackApi for ScriptedSlack {
    async fn profile(&self) -> Result<Profile> {
        self.profile
            .lock()
            .unwrap()
            .take()
            .expect("profile requested more than once")
    }

    async fn list_members(&self, _limit: u32, cursor: &str) -> Result<MemberPage> {
        self.cursors.lock().unwrap().push(cursor.to_string());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted page left")
    }

    async fn post_message(&self, channel: &str, text: &str, as_user: &str) -> Result<()> {
        if self.fail_post_to.as_deref() == Some(channel) {
            return Err(NotifyError::ApiError {
                method: "chat.postMessage".to_string(),
                response: json!({"ok": false, "error": "channel_not_found"}),
            });
        }

        self.sent.lock().unwrap().push(SentMessage {
            channel: channel.to_string(),
            text: text.to_string(),
            as_user: as_user.to_string(),
        });
        Ok(())
    }
}
