// Project pipeline types.
// Repository references, snapshots, and curated overrides.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::Repository;

/// A repository to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    #[serde(rename = "repo", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub pinned: bool,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            pinned: false,
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Parse an `owner/name` string.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// `owner/name`, the key overrides are stored under.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Case-insensitive identity used for deduplication.
    pub fn dedup_key(&self) -> String {
        self.full_name().to_lowercase()
    }
}

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotOrigin {
    #[default]
    Fresh,
    Cached,
    Fallback,
}

/// Point-in-time view of a repository, fetched or synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub homepage: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub html_url: String,
    #[serde(skip)]
    pub origin: SnapshotOrigin,
}

impl RepoSnapshot {
    pub fn from_repository(repo: Repository) -> Self {
        let html_url = repo
            .html_url
            .unwrap_or_else(|| format!("https://github.com/{}", repo.full_name));
        Self {
            name: repo.name,
            owner: repo.owner.login,
            description: repo.description.filter(|d| !d.trim().is_empty()),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language,
            homepage: repo.homepage.filter(|h| !h.trim().is_empty()),
            updated_at: repo.updated_at,
            topics: repo.topics,
            html_url,
            origin: SnapshotOrigin::Fresh,
        }
    }

    /// Placeholder built from override data when the live fetch failed.
    pub fn fallback(reference: &RepoRef, over: &Override) -> Self {
        Self {
            name: reference.name.clone(),
            owner: reference.owner.clone(),
            description: over.description.clone(),
            stars: 0,
            forks: 0,
            language: None,
            homepage: None,
            updated_at: None,
            topics: Vec::new(),
            html_url: over
                .github_url
                .clone()
                .unwrap_or_else(|| format!("https://github.com/{}", reference.full_name())),
            origin: SnapshotOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == SnapshotOrigin::Fallback
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Locally curated replacements for a repository's displayed metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(alias = "github_url")]
    pub github_url: Option<String>,
}

/// Overrides keyed by `owner/name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides(HashMap<String, Override>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, full_name: impl Into<String>, over: Override) {
        self.0.insert(full_name.into(), over);
    }

    /// Exact key first, then a case-insensitive match.
    pub fn get(&self, owner: &str, name: &str) -> Option<&Override> {
        let key = format!("{}/{}", owner, name);
        self.0.get(&key).or_else(|| {
            self.0
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(&key))
                .map(|(_, v)| v)
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A snapshot with overrides resolved, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub snapshot: RepoSnapshot,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub url: String,
    pub featured: bool,
}
