// Site configuration and data-file loading.
// Missing files fall back to defaults with a warning; malformed files are errors.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{FolioError, Result};
use crate::projects::{Overrides, RepoRef};
use crate::skills::SkillsConfig;

pub const SITE_CONFIG_FILE: &str = "site-config.json";
pub const REPOS_CONFIG_FILE: &str = "repos-config.json";
pub const PINNED_REPOS_FILE: &str = "pinned-repos.json";
pub const OVERRIDES_FILE: &str = "project-overrides.json";
pub const SKILLS_CONFIG_FILE: &str = "skills-config.json";

/// Repositories shown in the featured grid unless configured otherwise.
pub const DEFAULT_MAX_PROJECTS: usize = 6;

/// A repository owned by someone else that the site should still show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRepo {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub github_username: String,
    /// Own repositories to feature; empty shows all of them.
    #[serde(default)]
    pub featured_repos: Vec<String>,
    #[serde(default)]
    pub exclude_repos: Vec<String>,
    #[serde(default)]
    pub external_repos: Vec<ExternalRepo>,
    #[serde(default = "default_max_projects")]
    pub max_projects: Option<usize>,
}

fn default_max_projects() -> Option<usize> {
    Some(DEFAULT_MAX_PROJECTS)
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            github_username: String::new(),
            featured_repos: Vec::new(),
            exclude_repos: Vec::new(),
            external_repos: Vec::new(),
            max_projects: default_max_projects(),
        }
    }
}

impl SiteConfig {
    /// Defaults, then `site-config.json` in `data_dir`, then `FOLIO_*` environment variables.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_file = data_dir.join(SITE_CONFIG_FILE);

        let mut figment = Figment::from(Serialized::defaults(SiteConfig::default()));

        if config_file.exists() {
            figment = figment.merge(Json::file(&config_file));
        } else {
            tracing::warn!(path = %config_file.display(), "site config not found, using defaults");
        }

        figment = figment.merge(Env::prefixed("FOLIO_"));

        Ok(figment.extract()?)
    }
}

/// All data files of a site, loaded once per build.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    pub site: SiteConfig,
    pub repos: Vec<RepoRef>,
    pub pinned: Vec<RepoRef>,
    pub overrides: Overrides,
    pub skills: SkillsConfig,
}

impl SiteData {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let data = Self {
            site: SiteConfig::load(data_dir)?,
            repos: load_repos_config(data_dir)?,
            pinned: load_pinned_repos(data_dir)?,
            overrides: load_overrides(data_dir)?,
            skills: load_skills(data_dir)?,
        };
        tracing::info!(
            repos = data.repos.len(),
            pinned = data.pinned.len(),
            overrides = data.overrides.len(),
            "loaded site data"
        );
        Ok(data)
    }

    /// Every configured reference, deduplicated, in configuration order.
    pub fn references(&self) -> Vec<RepoRef> {
        resolve_refs(&self.site, &self.repos, &self.pinned)
    }
}

/// `repos-config.json`: `[{"owner", "repo", "pinned"}]`.
pub fn load_repos_config(data_dir: &Path) -> Result<Vec<RepoRef>> {
    load_or_default(&data_dir.join(REPOS_CONFIG_FILE))
}

/// `pinned-repos.json`: `["owner/name"]`. Entries that do not parse are skipped.
pub fn load_pinned_repos(data_dir: &Path) -> Result<Vec<RepoRef>> {
    let names: Vec<String> = load_or_default(&data_dir.join(PINNED_REPOS_FILE))?;
    Ok(names
        .iter()
        .filter_map(|name| {
            let parsed = RepoRef::parse(name).map(RepoRef::pinned);
            if parsed.is_none() {
                tracing::warn!(entry = %name, "ignoring malformed pinned repository");
            }
            parsed
        })
        .collect())
}

/// `project-overrides.json`: `{"owner/name": {...}}`.
pub fn load_overrides(data_dir: &Path) -> Result<Overrides> {
    load_or_default(&data_dir.join(OVERRIDES_FILE))
}

/// `skills-config.json`.
pub fn load_skills(data_dir: &Path) -> Result<SkillsConfig> {
    load_or_default(&data_dir.join(SKILLS_CONFIG_FILE))
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(T::default());
    }

    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| FolioError::Config(format!("{}: {}", path.display(), e)))
}

/// Merge configured, pinned, and external references.
/// Duplicates collapse onto the first occurrence, which becomes pinned if any copy was.
pub fn resolve_refs(site: &SiteConfig, repos: &[RepoRef], pinned: &[RepoRef]) -> Vec<RepoRef> {
    let external = site
        .external_repos
        .iter()
        .map(|e| RepoRef::new(e.owner.clone(), e.repo.clone()));

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut refs: Vec<RepoRef> = Vec::new();

    for reference in repos.iter().cloned().chain(pinned.iter().cloned()).chain(external) {
        match index.get(&reference.dedup_key()) {
            Some(&i) => refs[i].pinned |= reference.pinned,
            None => {
                index.insert(reference.dedup_key(), refs.len());
                refs.push(reference);
            }
        }
    }
    refs
}

/// Default data directory: `./data` relative to the working directory.
pub fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
