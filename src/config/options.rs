//! Turns parsed command line arguments into a validated [`NotificationRequest`].
//!
//! Every failure here is a usage error and happens before any network call.

use crate::config::CliConfig;
use crate::core::notifier::NotificationRequest;
use crate::domain::model::MessageSource;
use crate::domain::names::{extract_mentions, RequestedNameSet};
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::validate_url;
use std::path::Path;

fn read_input(kind: &str, path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        NotifyError::usage(format!("Cannot read {} '{}': {}", kind, path.display(), e))
    })
}

/// 每行一個名稱，行尾空白與 \r 會被去掉
fn names_from_list(content: &str) -> impl Iterator<Item = &str> {
    content.lines().map(str::trim_end)
}

fn collect_names(cli: &CliConfig) -> Result<RequestedNameSet> {
    let mut raw: Vec<String> = cli.users.clone();

    if let Some(path) = &cli.user_list {
        let content = read_input("user list", path)?;
        raw.extend(names_from_list(&content).map(str::to_string));
    }

    if let Some(path) = &cli.mentions_from {
        let content = read_input("mentions source", path)?;
        let mentions = extract_mentions(&content)?;
        tracing::info!("Found {} mention(s) in {}", mentions.len(), path.display());
        raw.extend(mentions);
    }

    let names = RequestedNameSet::from_raw(raw);
    if names.is_empty() {
        return Err(NotifyError::usage(
            "At least one user or file of users is required.",
        ));
    }
    Ok(names)
}

fn message_source(cli: &CliConfig) -> Result<MessageSource> {
    match (&cli.url, &cli.deadline, &cli.message) {
        (Some(url), Some(deadline), None) => {
            validate_url("url", url).map_err(|e| NotifyError::usage(e.to_string()))?;
            if deadline.trim().is_empty() {
                return Err(NotifyError::usage(
                    "Deadline cannot be empty, e.g. --deadline 'Monday 9 AM Pacific'.",
                ));
            }
            Ok(MessageSource::Template {
                url: url.clone(),
                deadline: deadline.clone(),
            })
        }
        (None, None, Some(path)) => Ok(MessageSource::Verbatim(read_input("message file", path)?)),
        (None, None, None) => Err(NotifyError::usage(
            "Either URL and deadline or message file is required.",
        )),
        (_, _, Some(_)) => Err(NotifyError::usage(
            "Use either URL and deadline or a message file, not both.",
        )),
        _ => Err(NotifyError::usage("URL and deadline must be given together.")),
    }
}

/// Gathers recipients and the message source, rejecting invalid combinations.
pub fn consolidate(cli: &CliConfig) -> Result<NotificationRequest> {
    let names = collect_names(cli)?;
    let message = message_source(cli)?;

    tracing::debug!("Requested names: {:?}", names.as_slice());

    Ok(NotificationRequest {
        names,
        message,
        dry_run: cli.dry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["newsletter-notify"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn usage_message(result: Result<NotificationRequest>) -> String {
        match result {
            Err(NotifyError::UsageError { message }) => message,
            other => panic!("expected usage error, got {:?}", other),
        }
    }

    #[test]
    fn test_template_request() {
        let cli = parse(&["--users", "Alice", "@bob", "--url", "http://x", "--deadline", "Monday"]);

        let request = consolidate(&cli).unwrap();

        assert_eq!(request.names.as_slice(), &["Alice", "bob"]);
        assert_eq!(
            request.message,
            MessageSource::Template {
                url: "http://x".to_string(),
                deadline: "Monday".to_string(),
            }
        );
        assert!(!request.dry_run);
    }

    #[test]
    fn test_users_from_file_and_arguments() {
        let list = temp_file("@carol\r\nDave  \n\n@alice\n");
        let path = list.path().to_str().unwrap();
        let cli = parse(&[
            "--users", "alice", "--user-list", path, "--url", "http://x", "--deadline", "Monday",
        ]);

        let request = consolidate(&cli).unwrap();

        assert_eq!(request.names.as_slice(), &["alice", "carol", "Dave"]);
    }

    #[test]
    fn test_mentions_from_draft() {
        let draft = temp_file("<p>Great thread by @jane.doe with @Mark Twain.</p>");
        let path = draft.path().to_str().unwrap();
        let cli = parse(&["--mentions-from", path, "--url", "http://x", "--deadline", "Monday", "--dry"]);

        let request = consolidate(&cli).unwrap();

        assert_eq!(request.names.as_slice(), &["jane.doe", "Mark Twain"]);
        assert!(request.dry_run);
    }

    #[test]
    fn test_message_file_is_verbatim() {
        let message = temp_file("Hello {sender}\n");
        let path = message.path().to_str().unwrap();
        let cli = parse(&["--users", "alice", "--message", path]);

        let request = consolidate(&cli).unwrap();

        assert_eq!(request.message, MessageSource::Verbatim("Hello {sender}\n".to_string()));
    }

    #[test]
    fn test_missing_users_rejected() {
        let cli = parse(&["--url", "http://x", "--deadline", "Monday"]);

        assert!(usage_message(consolidate(&cli)).contains("At least one user"));
    }

    #[test]
    fn test_empty_user_list_rejected() {
        let list = temp_file("\n\n");
        let cli = parse(&["--user-list", list.path().to_str().unwrap(), "--url", "http://x", "--deadline", "Monday"]);

        assert!(usage_message(consolidate(&cli)).contains("At least one user"));
    }

    #[test]
    fn test_missing_message_source_rejected() {
        let cli = parse(&["--users", "alice"]);

        assert!(usage_message(consolidate(&cli)).contains("Either URL and deadline"));
    }

    #[test]
    fn test_both_message_sources_rejected() {
        let message = temp_file("Hello");
        let cli = parse(&[
            "--users", "alice", "--url", "http://x", "--deadline", "Monday",
            "--message", message.path().to_str().unwrap(),
        ]);

        assert!(usage_message(consolidate(&cli)).contains("not both"));
    }

    #[test]
    fn test_url_without_deadline_rejected() {
        let cli = parse(&["--users", "alice", "--url", "http://x"]);

        assert!(usage_message(consolidate(&cli)).contains("together"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let cli = parse(&["--users", "alice", "--url", "draft", "--deadline", "Monday"]);

        assert!(usage_message(consolidate(&cli)).contains("Invalid URL"));
    }

    #[test]
    fn test_blank_deadline_rejected() {
        let cli = parse(&["--users", "alice", "--url", "http://x", "--deadline", "  "]);

        assert!(usage_message(consolidate(&cli)).contains("Deadline cannot be empty"));
    }

    #[test]
    fn test_unreadable_user_list_is_usage_error() {
        let cli = parse(&["--user-list", "/nonexistent/users.txt", "--url", "http://x", "--deadline", "Monday"]);

        assert!(usage_message(consolidate(&cli)).contains("Cannot read user list"));
    }
}
