use crate::domain::model::{MemberPage, Profile};
use crate::domain::ports::SlackApi;
use crate::utils::error::{NotifyError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

const PROFILE_GET: &str = "users.profile.get";
const USERS_LIST: &str = "users.list";
const POST_MESSAGE: &str = "chat.postMessage";

/// Slack Web API client authenticated with a single user token.
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), method)
    }

    /// 檢查 `ok` 欄位，失敗時保留原始回應
    async fn read_response(method: &str, response: Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("{} responded with status {}", method, status);

        let value = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NotifyError::RateLimited {
                method: method.to_string(),
                response: value,
            });
        }

        if value.get("ok").and_then(Value::as_bool) == Some(true) {
            return Ok(value);
        }

        let rate_limited = value
            .get("error")
            .and_then(Value::as_str)
            .is_some_and(|error| error.contains("ratelimited"));

        if rate_limited {
            Err(NotifyError::RateLimited {
                method: method.to_string(),
                response: value,
            })
        } else {
            Err(NotifyError::ApiError {
                method: method.to_string(),
                response: value,
            })
        }
    }

    fn decode<T: DeserializeOwned>(method: &str, value: &Value) -> Result<T> {
        serde_json::from_value(value.clone()).map_err(|e| NotifyError::UnexpectedResponse {
            method: method.to_string(),
            reason: e.to_string(),
            response: value.clone(),
        })
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn profile(&self) -> Result<Profile> {
        tracing::debug!("Fetching own profile");
        let response = self
            .client
            .get(self.endpoint(PROFILE_GET))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let value = Self::read_response(PROFILE_GET, response).await?;
        match value.get("profile") {
            Some(profile) => Self::decode(PROFILE_GET, profile),
            None => Err(NotifyError::UnexpectedResponse {
                method: PROFILE_GET.to_string(),
                reason: "missing 'profile' field".to_string(),
                response: value.clone(),
            }),
        }
    }

    async fn list_members(&self, limit: u32, cursor: &str) -> Result<MemberPage> {
        tracing::debug!("Listing members (limit {}, cursor '{}')", limit, cursor);
        let mut request = self
            .client
            .get(self.endpoint(USERS_LIST))
            .bearer_auth(&self.token)
            .query(&[("limit", limit.to_string())]);

        if !cursor.is_empty() {
            request = request.query(&[("cursor", cursor)]);
        }

        let value = Self::read_response(USERS_LIST, request.send().await?).await?;
        Self::decode(USERS_LIST, &value)
    }

    async fn post_message(&self, channel: &str, text: &str, as_user: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint(POST_MESSAGE))
            .bearer_auth(&self.token)
            .json(&json!({
                "channel": channel,
                "text": text,
                "as_user": as_user,
            }))
            .send()
            .await?;

        Self::read_response(POST_MESSAGE, response).await?;
        Ok(())
    }
}
