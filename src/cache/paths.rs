// Store path utilities.
// Maps local storage keys onto files under the store root.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Key holding the persisted theme.
pub const THEME_KEY: &str = "theme-preference";

/// Get the default store directory (~/.cache/folio on Linux).
pub fn default_store_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Storage key for a cached repository snapshot.
pub fn repo_key(owner: &str, repo: &str) -> String {
    format!("gh_repo_{}/{}", owner, repo)
}

/// Path of the file backing a storage key.
pub fn key_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.json", sanitize_name(key)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
