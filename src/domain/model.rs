use serde::{Deserialize, Serialize};
use std::fmt;

/// `users.list` 回傳的單一成員
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// 一頁目錄資料；`response_metadata` 缺席代表沒有下一頁
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPage {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl MemberPage {
    /// Cursor for the following page, if the listing continues.
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata
            .as_ref()
            .and_then(|meta| meta.next_cursor.as_deref())
            .filter(|cursor| !cursor.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name_normalized: String,
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginatingIdentity {
    pub handle: String,
    pub first_name: String,
}

impl OriginatingIdentity {
    pub fn from_profile(profile: &Profile) -> Self {
        let handle = format!("@{}", profile.display_name_normalized);
        let first_name = profile
            .first_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| handle.clone());

        Self { handle, first_name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRecipient {
    pub id: String,
    pub name: String,
}

impl ResolvedRecipient {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The outcome of walking the directory for a set of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: Vec<ResolvedRecipient>,
    pub unresolved: Vec<String>,
}

/// Where the message text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    Template { url: String, deadline: String },
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub recipients: Vec<ResolvedRecipient>,
    pub unresolved: Vec<String>,
    pub dry_run: bool,
}
