use crate::domain::model::{Member, ResolvedRecipient, Resolution};
use crate::domain::names::{normalize_name, RequestedNameSet};
use crate::domain::ports::SlackApi;
use crate::utils::error::{NotifyError, Result};
use std::io::Write;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: u32 = 250;
pub const DEFAULT_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(3);

/// Matches found on one directory page and the names still outstanding after it.
///
/// `candidates` are members that only matched an outstanding name when case
/// is ignored; they are held back until the whole directory has been seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMatch {
    pub resolved: Vec<ResolvedRecipient>,
    pub outstanding: Vec<String>,
    pub candidates: Vec<Member>,
}

/// 短名優先於 real_name
fn member_fields(member: &Member) -> impl Iterator<Item = &str> {
    [member.name.as_deref(), member.real_name.as_deref()]
        .into_iter()
        .flatten()
}

fn find_exact(outstanding: &[String], field: &str) -> Option<usize> {
    let stripped = normalize_name(field);
    if stripped.is_empty() {
        return None;
    }

    outstanding
        .iter()
        .position(|name| name == field || name == stripped)
}

fn find_folded(outstanding: &[String], field: &str) -> Option<usize> {
    let stripped = normalize_name(field);
    if stripped.is_empty() {
        return None;
    }

    let folded = stripped.to_lowercase();
    outstanding
        .iter()
        .position(|name| name.to_lowercase() == folded)
}

/// Resolves names against one page of members, exact case only.
///
/// The short name is tried before the real name, and a member resolves at
/// most one name. A resolved name leaves the outstanding set, so a later
/// member (on this page or any later one) can never claim it again.
pub fn match_page(members: &[Member], outstanding: &[String]) -> PageMatch {
    let mut remaining = outstanding.to_vec();
    let mut resolved = Vec::new();
    let mut candidates = Vec::new();

    for member in members {
        if remaining.is_empty() {
            break;
        }

        if let Some(index) = member_fields(member).find_map(|field| find_exact(&remaining, field)) {
            let name = remaining.remove(index);
            tracing::debug!("Resolved @{} to {}", name, member.id);
            resolved.push(ResolvedRecipient::new(member.id.clone(), name));
        } else if member_fields(member).any(|field| find_folded(&remaining, field).is_some()) {
            candidates.push(member.clone());
        }
    }

    PageMatch {
        resolved,
        outstanding: remaining,
        candidates,
    }
}

/// Case-insensitive fallback over the held-back candidates, in directory order.
pub fn match_ignoring_case(candidates: &[Member], outstanding: &[String]) -> PageMatch {
    let mut remaining = outstanding.to_vec();
    let mut resolved = Vec::new();

    for member in candidates {
        if remaining.is_empty() {
            break;
        }

        if let Some(index) = member_fields(member).find_map(|field| find_folded(&remaining, field)) {
            let name = remaining.remove(index);
            tracing::debug!("Resolved @{} to {} ignoring case", name, member.id);
            resolved.push(ResolvedRecipient::new(member.id.clone(), name));
        }
    }

    PageMatch {
        resolved,
        outstanding: remaining,
        candidates: Vec::new(),
    }
}

/// Walks `users.list` until every requested name is resolved or the listing ends.
pub struct DirectoryResolver<'a, A: SlackApi> {
    api: &'a A,
    page_size: u32,
    backoff: Duration,
}

impl<'a, A: SlackApi> DirectoryResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            page_size: DEFAULT_PAGE_SIZE,
            backoff: DEFAULT_RATE_LIMIT_BACKOFF,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub async fn resolve<W: Write>(&self, names: &RequestedNameSet, out: &mut W) -> Result<Resolution> {
        let mut outstanding = names.to_vec();
        let mut resolved = Vec::new();
        let mut candidates = Vec::new();
        let mut cursor = String::new();
        let mut pages = 0usize;

        tracing::info!("🔍 Resolving {} name(s) against the directory", outstanding.len());

        while !outstanding.is_empty() {
            let page = match self.api.list_members(self.page_size, &cursor).await {
                Ok(page) => page,
                Err(NotifyError::RateLimited { .. }) => {
                    // 同一頁重試，不設上限
                    tracing::warn!("Directory listing rate limited, retrying in {:?}", self.backoff);
                    writeln!(out, "pausing...")?;
                    tokio::time::sleep(self.backoff).await;
                    continue;
                }
                Err(e) => return Err(e),
            };
            pages += 1;

            let matched = match_page(&page.members, &outstanding);
            resolved.extend(matched.resolved);
            outstanding = matched.outstanding;
            candidates.extend(matched.candidates);

            match page.next_cursor() {
                Some(next) => cursor = next.to_string(),
                None => break,
            }
        }

        // 整個目錄都沒有精確相符時才接受大小寫不同的成員
        if !outstanding.is_empty() && !candidates.is_empty() {
            let matched = match_ignoring_case(&candidates, &outstanding);
            resolved.extend(matched.resolved);
            outstanding = matched.outstanding;
        }

        tracing::info!(
            "✅ Resolved {} name(s) over {} page(s), {} unresolved",
            resolved.len(),
            pages,
            outstanding.len()
        );

        Ok(Resolution {
            resolved,
            unresolved: outstanding,
        })
    }
}
