use crate::core::directory::{DEFAULT_PAGE_SIZE, DEFAULT_RATE_LIMIT_BACKOFF};
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub message: MessageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub page_size: Option<u32>,
    pub rate_limit_backoff_seconds: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageConfig {
    /// 取代內建範本，同樣支援 {sender}/{url}/{deadline}
    pub template_file: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| NotifyError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${SLACK_API_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NotifyError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn page_size(&self) -> u32 {
        self.api.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        self.api
            .rate_limit_backoff_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RATE_LIMIT_BACKOFF)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    /// 讀取自訂範本；沒有設定時回傳 None
    pub fn template(&self) -> Result<Option<String>> {
        match &self.message.template_file {
            Some(path) => std::fs::read_to_string(path)
                .map(Some)
                .map_err(|e| NotifyError::ConfigError {
                    message: format!("cannot read template {}: {}", path, e),
                }),
            None => Ok(None),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            validate_url("api.base_url", base_url)?;
        }

        if let Some(page_size) = self.api.page_size {
            validate_range("api.page_size", page_size, 1, 1000)?;
        }

        // 0 秒會讓被限流的清單查詢變成忙碌迴圈
        if let Some(backoff) = self.api.rate_limit_backoff_seconds {
            validate_range("api.rate_limit_backoff_seconds", backoff, 1, 3600)?;
        }

        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(template) = &self.message.template_file {
            validate_path("message.template_file", template)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
