use crate::utils::error::{NotifyError, Result};
use regex::Regex;
use std::collections::HashSet;

const SIGIL: char = '@';

/// `@jane.doe` 或 `@Jane Doe` 這類提及
const MENTION_PATTERN: &str = r"@[A-Za-z.]+(?: [A-Z][a-z]+)?";

/// Strips every leading sigil, so applying it twice changes nothing.
pub fn normalize_name(raw: &str) -> &str {
    raw.trim_start_matches(SIGIL)
}

fn casefold_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Names requested on the command line, sigil-free, deduplicated
/// case-sensitively and sorted case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedNameSet {
    names: Vec<String>,
}

impl RequestedNameSet {
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names: Vec<String> = raw
            .into_iter()
            .map(|name| normalize_name(name.as_ref().trim()).to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();

        names.sort_by(|a, b| casefold_cmp(a, b));
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Pulls every distinct `@mention` out of a draft, sigil kept.
pub fn extract_mentions(text: &str) -> Result<Vec<String>> {
    let matcher = Regex::new(MENTION_PATTERN).map_err(|e| NotifyError::ConfigError {
        message: format!("invalid mention pattern: {}", e),
    })?;

    let mut seen = HashSet::new();
    let mut mentions: Vec<String> = matcher
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches('.').to_string())
        .filter(|mention| mention.len() > 1)
        .filter(|mention| seen.insert(mention.clone()))
        .collect();

    mentions.sort_by(|a, b| casefold_cmp(a, b));
    Ok(mentions)
}
