// Repository fetcher.
// Cache lookup, live fetch, and override fallback for each repository reference.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::cache::{REPO_TTL, Store, repo_key};
use crate::error::Result;
use crate::github::Repository;

use super::types::{Overrides, RepoRef, RepoSnapshot, SnapshotOrigin};

/// Source of repository metadata.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn repository(&self, owner: &str, name: &str) -> Result<Repository>;

    async fn user_repositories(&self, user: &str) -> Result<Vec<Repository>>;
}

/// A snapshot together with the reference it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub reference: RepoRef,
    pub snapshot: RepoSnapshot,
}

/// Resolves references to snapshots for one build.
pub struct Fetcher<'a, S: RepoSource + ?Sized> {
    source: &'a S,
    store: &'a Store,
    overrides: &'a Overrides,
    ttl: Duration,
    now: DateTime<Utc>,
}

impl<'a, S: RepoSource + ?Sized> Fetcher<'a, S> {
    pub fn new(source: &'a S, store: &'a Store, overrides: &'a Overrides) -> Self {
        Self {
            source,
            store,
            overrides,
            ttl: REPO_TTL,
            now: Utc::now(),
        }
    }

    /// Pin the clock used for cache validity and timestamps.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Fetch one repository: cache, then network, then override fallback.
    pub async fn fetch(&self, reference: &RepoRef) -> Option<Fetched> {
        let key = repo_key(&reference.owner, &reference.name);

        match self.store.read_if_valid::<RepoSnapshot>(&key, self.ttl, self.now) {
            Ok(Some(mut snapshot)) => {
                tracing::debug!(repo = %reference.full_name(), "cache hit");
                snapshot.origin = SnapshotOrigin::Cached;
                return Some(self.wrap(reference, snapshot));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(repo = %reference.full_name(), error = %e, "unreadable cache entry");
            }
        }

        match self.source.repository(&reference.owner, &reference.name).await {
            Ok(repo) => {
                let snapshot = RepoSnapshot::from_repository(repo);
                if let Err(e) = self.store.write_entry(&key, &snapshot, self.now) {
                    tracing::warn!(repo = %reference.full_name(), error = %e, "failed to cache repository");
                }
                Some(self.wrap(reference, snapshot))
            }
            Err(e) => {
                if e.is_rate_limited() {
                    tracing::warn!(repo = %reference.full_name(), error = %e, "rate limited");
                } else {
                    tracing::error!(repo = %reference.full_name(), error = %e, "fetch failed");
                }
                self.fallback(reference)
            }
        }
    }

    /// Fetch every reference concurrently and wait for all of them.
    /// Failed fetches without an override are dropped; order is preserved.
    pub async fn fetch_all(&self, references: &[RepoRef]) -> Vec<Fetched> {
        let results = join_all(references.iter().map(|r| self.fetch(r))).await;
        let fetched: Vec<Fetched> = results.into_iter().flatten().collect();

        tracing::info!(
            requested = references.len(),
            resolved = fetched.len(),
            fallbacks = fetched.iter().filter(|f| f.snapshot.is_fallback()).count(),
            "fetched repositories"
        );
        fetched
    }

    /// List a user's own repositories, skipping forks and excluded names.
    /// `None` when the listing itself failed; an empty list is a successful answer.
    pub async fn fetch_user_repos(&self, user: &str, exclude: &[String]) -> Option<Vec<Fetched>> {
        let repos = match self.source.user_repositories(user).await {
            Ok(repos) => repos,
            Err(e) => {
                tracing::error!(user, error = %e, "failed to list user repositories");
                return None;
            }
        };

        let own = repos
            .into_iter()
            .filter(|repo| !repo.fork && !exclude.contains(&repo.name))
            .map(|repo| {
                let reference = RepoRef::new(repo.owner.login.clone(), repo.name.clone());
                let snapshot = RepoSnapshot::from_repository(repo);
                let key = repo_key(&reference.owner, &reference.name);
                if let Err(e) = self.store.write_entry(&key, &snapshot, self.now) {
                    tracing::warn!(repo = %reference.full_name(), error = %e, "failed to cache repository");
                }
                Fetched {
                    reference,
                    snapshot,
                }
            })
            .collect();
        Some(own)
    }

    fn fallback(&self, reference: &RepoRef) -> Option<Fetched> {
        let over = self.overrides.get(&reference.owner, &reference.name)?;
        tracing::info!(repo = %reference.full_name(), "using override fallback");
        Some(self.wrap(reference, RepoSnapshot::fallback(reference, over)))
    }

    fn wrap(&self, reference: &RepoRef, snapshot: RepoSnapshot) -> Fetched {
        Fetched {
            reference: reference.clone(),
            snapshot,
        }
    }
}
