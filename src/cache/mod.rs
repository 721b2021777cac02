// Cache module for local filesystem storage.
// Stands in for browser local storage: repository snapshots and the theme preference.

pub mod paths;
pub mod store;

pub use paths::{THEME_KEY, default_store_dir, repo_key};
pub use store::{CacheEntry, REPO_TTL, Store};
