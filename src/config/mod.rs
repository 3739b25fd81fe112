pub mod options;
pub mod toml_config;

use crate::adapters::DEFAULT_API_BASE_URL;
use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_url, Validate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Used when `API_TOKEN` is not set; Slack rejects it on the first call.
pub const PLACEHOLDER_TOKEN: &str = "garbage";

#[derive(Debug, Clone, Parser)]
#[command(name = "newsletter-notify")]
#[command(about = "Notify a set of users about their potential inclusion in a newsletter")]
pub struct CliConfig {
    /// Notify the given user(s). Users come from here, --user-list or --mentions-from
    #[arg(long = "users", visible_alias = "user", num_args = 1.., value_name = "USER")]
    pub users: Vec<String>,

    /// Notify the user(s) given in the file (one per line)
    #[arg(long = "user-list", alias = "user_list", value_name = "FILE")]
    pub user_list: Option<PathBuf>,

    /// Notify everyone @mentioned in a saved copy of the draft
    #[arg(long, value_name = "FILE")]
    pub mentions_from: Option<PathBuf>,

    /// Public URL of the draft. Requires --deadline; excludes --message
    #[arg(long)]
    pub url: Option<String>,

    /// Deadline for responses, e.g. 'Monday 9 AM Pacific'. Requires --url
    #[arg(long, value_name = "DATE")]
    pub deadline: Option<String>,

    /// Send this file's contents verbatim instead of the built-in message
    #[arg(long, value_name = "FILE")]
    pub message: Option<PathBuf>,

    /// Print the message and users, but don't actually send the messages
    #[arg(long)]
    pub dry: bool,

    /// Optional TOML file with API and message settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the Slack Web API base URL
    #[arg(long, env = "NOTIFY_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Slack user token
    #[arg(
        long,
        env = "API_TOKEN",
        default_value = PLACEHOLDER_TOKEN,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub token: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Effective API settings after layering CLI/env over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub token: String,
    pub page_size: u32,
    pub rate_limit_backoff: Duration,
    pub timeout: Duration,
}

impl ApiSettings {
    pub fn resolve(cli: &CliConfig, file: &TomlConfig) -> Result<Self> {
        file.validate()?;

        let base_url = cli
            .api_base_url
            .clone()
            .or_else(|| file.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        validate_url("api_base_url", &base_url)?;

        if cli.token == PLACEHOLDER_TOKEN {
            tracing::warn!("API_TOKEN is not set, Slack will reject the first call");
        }

        Ok(Self {
            base_url,
            token: cli.token.clone(),
            page_size: file.page_size(),
            rate_limit_backoff: file.rate_limit_backoff(),
            timeout: file.timeout(),
        })
    }
}
