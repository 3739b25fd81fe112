use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use newsletter_notify::config::toml_config::TomlConfig;
use newsletter_notify::utils::error::ErrorCategory;
use newsletter_notify::utils::logger;
use newsletter_notify::{
    consolidate, ApiSettings, CliConfig, MessageComposer, Notifier, NotifyError, SlackClient,
};

/// 用 clap 的標準格式回報參數錯誤並以 2 結束
fn usage_exit(message: impl std::fmt::Display) -> ! {
    CliConfig::command()
        .error(ErrorKind::ValueValidation, message)
        .exit()
}

fn fail(e: NotifyError) -> ! {
    if e.category() == ErrorCategory::Usage || e.category() == ErrorCategory::Config {
        usage_exit(e);
    }

    // 先印出 Slack 的原始回應方便排查
    if let Some(raw) = e.raw_response() {
        println!("{}", raw);
    }

    tracing::error!("❌ Notification run failed: {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(1);
}

fn load_settings(config: &CliConfig) -> Result<(ApiSettings, MessageComposer), NotifyError> {
    let file_config = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };

    let settings = ApiSettings::resolve(config, &file_config)?;
    let composer = match file_config.template()? {
        Some(template) => MessageComposer::new(template),
        None => MessageComposer::default(),
    };

    Ok((settings, composer))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting newsletter-notify");

    // 所有輸入檢查都在網路呼叫之前完成
    let request = consolidate(&config).unwrap_or_else(|e| fail(e));
    let (settings, composer) = load_settings(&config).unwrap_or_else(|e| fail(e));

    let client = SlackClient::new(&settings.base_url, &settings.token, settings.timeout)
        .context("failed to build the Slack HTTP client")?;
    let notifier = Notifier::new(client)
        .with_composer(composer)
        .with_page_size(settings.page_size)
        .with_backoff(settings.rate_limit_backoff);

    let mut out = std::io::stdout();
    match notifier.run(&request, &mut out).await {
        Ok(summary) => {
            tracing::info!(
                "✅ Done: {} recipient(s){}, {} unresolved",
                summary.recipients.len(),
                if summary.dry_run { " (dry run)" } else { "" },
                summary.unresolved.len()
            );
        }
        Err(e) => fail(e),
    }

    Ok(())
}
