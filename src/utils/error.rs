use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Usage error: {message}")]
    UsageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Slack API call {method} failed: {response}")]
    ApiError {
        method: String,
        response: serde_json::Value,
    },

    #[error("Slack API call {method} was rate limited")]
    RateLimited {
        method: String,
        response: serde_json::Value,
    },

    #[error("Unexpected response from {method}: {reason}")]
    UnexpectedResponse {
        method: String,
        reason: String,
        response: serde_json::Value,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Config,
    Api,
    Network,
    Io,
}

impl NotifyError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::UsageError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UsageError { .. } => ErrorCategory::Usage,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::TomlError(_) => {
                ErrorCategory::Config
            }
            Self::ApiError { .. }
            | Self::RateLimited { .. }
            | Self::UnexpectedResponse { .. }
            | Self::SerializationError(_) => ErrorCategory::Api,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) => ErrorCategory::Io,
        }
    }

    /// Slack 回傳的原始內容，只有 API 類錯誤才有
    pub fn raw_response(&self) -> Option<&serde_json::Value> {
        match self {
            Self::ApiError { response, .. }
            | Self::RateLimited { response, .. }
            | Self::UnexpectedResponse { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Usage => "Run with --help to see the accepted option combinations",
            ErrorCategory::Config => "Check the configuration file and command line values",
            ErrorCategory::Api => match self {
                Self::ApiError { response, .. } if is_auth_failure(response) => {
                    "Export a valid user token in API_TOKEN"
                }
                _ => "Inspect the raw Slack response printed above",
            },
            ErrorCategory::Network => "Check network connectivity and the API base URL",
            ErrorCategory::Io => "Make sure the referenced files exist and are readable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError { method, response } => match response.get("error").and_then(|e| e.as_str()) {
                Some(code) => format!("Slack rejected {}: {}", method, code),
                None => format!("Slack rejected {}", method),
            },
            Self::RateLimited { method, .. } => {
                format!("Slack is rate limiting {}; try again later", method)
            }
            other => other.to_string(),
        }
    }
}

fn is_auth_failure(response: &serde_json::Value) -> bool {
    matches!(
        response.get("error").and_then(|e| e.as_str()),
        Some("not_authed" | "invalid_auth" | "token_revoked" | "account_inactive")
    )
}

pub type Result<T> = std::result::Result<T, NotifyError>;
