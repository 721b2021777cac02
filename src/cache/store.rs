// Local key/value store with timestamped entries.
// Handles JSON serialization, TTL checking, and atomic filesystem writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;

use super::paths::key_path;

/// Repository snapshots stay valid for 24 hours.
pub const REPO_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Wrapper for cached data with the time it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Create an entry stamped at `timestamp`.
    pub fn new(data: T, timestamp: DateTime<Utc>) -> Self {
        Self { data, timestamp }
    }

    /// Check if this entry is older than `ttl` at `now`.
    /// Entries stamped in the future count as expired.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let elapsed = now
            .signed_duration_since(self.timestamp)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed > ttl
    }

    /// Check if this entry is still valid (not expired).
    pub fn is_valid(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        !self.is_expired(ttl, now)
    }
}

/// Directory-backed key/value store.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a raw JSON value for `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = key_path(&self.root, key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write a raw JSON value for `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&key_path(&self.root, key), json.as_bytes())
    }

    /// Read a timestamped entry, returning None if absent or expired.
    pub fn read_if_valid<T: DeserializeOwned>(
        &self,
        key: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<T>> {
        match self.get::<CacheEntry<T>>(key)? {
            Some(entry) if entry.is_valid(ttl, now) => Ok(Some(entry.data)),
            _ => Ok(None),
        }
    }

    /// Store `data` stamped at `now`.
    pub fn write_entry<T: Serialize>(&self, key: &str, data: &T, now: DateTime<Utc>) -> Result<()> {
        self.set(key, &CacheEntry::new(data, now))
    }
}

/// Write via temp file and rename so readers never see a partial file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_write_and_read_entry() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());
        let now = Utc::now();
        assert_eq!(store.root(), temp_dir.path());

        store.write_entry("gh_repo_a/x", &sample(), now).unwrap();

        let entry: Option<CacheEntry<TestData>> = store.get("gh_repo_a/x").unwrap();
        let entry = entry.unwrap();
        assert_eq!(entry.data, sample());
        assert_eq!(entry.timestamp, now);

        let data: Option<TestData> = store.read_if_valid("gh_repo_a/x", REPO_TTL, now).unwrap();
        assert_eq!(data, Some(sample()));
    }

    #[test]
    fn test_entry_older_than_ttl_is_not_returned() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());
        let stored_at = Utc::now() - chrono::Duration::hours(25);

        store.write_entry("k", &sample(), stored_at).unwrap();

        let data: Option<TestData> = store.read_if_valid("k", REPO_TTL, Utc::now()).unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn test_expiry_boundaries() {
        let now = Utc::now();

        let fresh = CacheEntry::new("x", now - chrono::Duration::hours(23));
        assert!(fresh.is_valid(REPO_TTL, now));

        let stale = CacheEntry::new("x", now - chrono::Duration::hours(24) - chrono::Duration::seconds(1));
        assert!(stale.is_expired(REPO_TTL, now));

        let future = CacheEntry::new("x", now + chrono::Duration::minutes(5));
        assert!(future.is_expired(REPO_TTL, now));
    }

    #[test]
    fn test_raw_values() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path().join("nested"));

        store.set("theme-preference", "dark").unwrap();
        let value: Option<String> = store.get("theme-preference").unwrap();
        assert_eq!(value.as_deref(), Some("dark"));
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());

        let entry: Option<CacheEntry<TestData>> = store.get("missing").unwrap();
        assert!(entry.is_none());
    }
}
