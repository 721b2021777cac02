// Site build pipeline.
// Loads the data files, resolves projects, and writes the HTML fragments.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::cache::Store;
use crate::config::SiteData;
use crate::error::Result;
use crate::projects::{
    Fetched, Fetcher, Project, RepoRef, RepoSource, aggregate, render_failure, render_filter_bar,
    render_grid,
};
use crate::skills::render_skills;

pub const PROJECTS_FRAGMENT: &str = "projects.html";
pub const FILTERS_FRAGMENT: &str = "filters.html";
pub const SKILLS_FRAGMENT: &str = "skills.html";

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Ignore `max_projects` and render every project.
    pub show_all: bool,
}

/// Projects resolved for one build.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub projects: Vec<Project>,
    /// Number of repositories the build tried to resolve.
    pub requested: usize,
}

impl Collected {
    /// Something was asked for and nothing came back.
    pub fn failed(&self) -> bool {
        self.projects.is_empty() && self.requested > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub projects: usize,
    pub fallbacks: usize,
    pub failed: bool,
    pub written: Vec<PathBuf>,
}

/// Resolve the site's projects: the user's own repositories when `repos-config.json`
/// lists none, followed by configured, pinned, and external references.
pub async fn collect_projects<S: RepoSource + ?Sized>(
    source: &S,
    store: &Store,
    data: &SiteData,
    limit: Option<usize>,
    now: DateTime<Utc>,
) -> Collected {
    let fetcher = Fetcher::new(source, store, &data.overrides).at(now);
    let site = &data.site;

    let mut fetched: Vec<Fetched> = Vec::new();
    let mut requested = 0;

    if data.repos.is_empty() && !site.github_username.is_empty() {
        match fetcher
            .fetch_user_repos(&site.github_username, &site.exclude_repos)
            .await
        {
            Some(own) => fetched.extend(select_featured(own, &site.featured_repos)),
            None => requested += 1,
        }
    }

    let references = fold_listed(&mut fetched, data.references());
    requested += references.len();
    fetched.extend(fetcher.fetch_all(&references).await);

    Collected {
        projects: aggregate(fetched, &data.overrides, limit),
        requested,
    }
}

/// Drop references already covered by the own-repository listing, carrying their pin
/// onto the listed entry. Returns the references that still need fetching.
fn fold_listed(listed: &mut [Fetched], references: Vec<RepoRef>) -> Vec<RepoRef> {
    let index: HashMap<String, usize> = listed
        .iter()
        .enumerate()
        .map(|(i, f)| (f.reference.dedup_key(), i))
        .collect();

    references
        .into_iter()
        .filter(|reference| match index.get(&reference.dedup_key()) {
            Some(&i) => {
                listed[i].reference.pinned |= reference.pinned;
                false
            }
            None => true,
        })
        .collect()
}

/// Keep only featured repositories (all of them when none are named) and mark them pinned.
fn select_featured(own: Vec<Fetched>, featured: &[String]) -> Vec<Fetched> {
    if featured.is_empty() {
        return own;
    }
    own.into_iter()
        .filter(|f| featured.contains(&f.reference.name))
        .map(|mut f| {
            f.reference.pinned = true;
            f
        })
        .collect()
}

/// Run the whole pipeline and write the fragments into `options.out_dir`.
pub async fn build<S: RepoSource + ?Sized>(
    source: &S,
    store: &Store,
    options: &BuildOptions,
) -> Result<BuildReport> {
    let data = SiteData::load(&options.data_dir)?;
    let now = Utc::now();
    let limit = if options.show_all {
        None
    } else {
        data.site.max_projects
    };

    let collected = collect_projects(source, store, &data, limit, now).await;
    let failed = collected.failed();

    let projects_html = if failed {
        tracing::error!("no projects could be loaded");
        render_failure(&data.site.github_username)
    } else {
        render_grid(&collected.projects, now)
    };

    let written = vec![
        write_fragment(&options.out_dir, PROJECTS_FRAGMENT, &projects_html)?,
        write_fragment(
            &options.out_dir,
            FILTERS_FRAGMENT,
            &render_filter_bar(&collected.projects),
        )?,
        write_fragment(&options.out_dir, SKILLS_FRAGMENT, &render_skills(&data.skills))?,
    ];

    let report = BuildReport {
        projects: collected.projects.len(),
        fallbacks: collected
            .projects
            .iter()
            .filter(|p| p.snapshot.is_fallback())
            .count(),
        failed,
        written,
    };
    tracing::info!(
        projects = report.projects,
        fallbacks = report.fallbacks,
        out = %options.out_dir.display(),
        "site fragments written"
    );
    Ok(report)
}

fn write_fragment(out_dir: &Path, name: &str, html: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(name);
    fs::write(&path, html)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::config::{OVERRIDES_FILE, REPOS_CONFIG_FILE, SITE_CONFIG_FILE, SKILLS_CONFIG_FILE};
    use crate::projects::fetcher::tests::{Canned, FakeSource, repository};

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn options(root: &TempDir) -> BuildOptions {
        BuildOptions {
            data_dir: root.path().join("data"),
            out_dir: root.path().join("out"),
            show_all: false,
        }
    }

    #[tokio::test]
    async fn test_build_writes_fragments() {
        let root = TempDir::new().unwrap();
        let opts = options(&root);
        fs::create_dir_all(&opts.data_dir).unwrap();
        write(&opts.data_dir, SITE_CONFIG_FILE, r#"{"github_username": "me"}"#);
        write(
            &opts.data_dir,
            REPOS_CONFIG_FILE,
            r#"[{"owner": "a", "repo": "x", "pinned": true}, {"owner": "b", "repo": "y"}]"#,
        );
        write(
            &opts.data_dir,
            OVERRIDES_FILE,
            r#"{"b/y": {"title": "Why", "description": "Curated"}}"#,
        );
        write(
            &opts.data_dir,
            SKILLS_CONFIG_FILE,
            r#"{"programming_languages": ["Python"], "categories": {}}"#,
        );

        let source = FakeSource::default()
            .with("a/x", Canned::Found(repository("a", "x", 4)))
            .with("b/y", Canned::RateLimited);
        let store = Store::new(root.path().join("store"));

        let report = build(&source, &store, &opts).await.unwrap();
        assert_eq!(report.projects, 2);
        assert_eq!(report.fallbacks, 1);
        assert!(!report.failed);
        assert_eq!(report.written.len(), 3);

        let projects = fs::read_to_string(opts.out_dir.join(PROJECTS_FRAGMENT)).unwrap();
        let x = projects.find("<h3>x</h3>").unwrap();
        let why = projects.find("<h3>Why</h3>").unwrap();
        assert!(x < why);
        assert!(projects.contains("Curated"));

        let skills = fs::read_to_string(opts.out_dir.join(SKILLS_FRAGMENT)).unwrap();
        assert!(skills.contains("fab fa-python"));
    }

    #[tokio::test]
    async fn test_build_reports_total_failure() {
        let root = TempDir::new().unwrap();
        let opts = options(&root);
        fs::create_dir_all(&opts.data_dir).unwrap();
        write(&opts.data_dir, SITE_CONFIG_FILE, r#"{"github_username": "me"}"#);
        write(&opts.data_dir, REPOS_CONFIG_FILE, r#"[{"owner": "a", "repo": "x"}]"#);

        let source = FakeSource::default().with("a/x", Canned::Unreachable);
        let store = Store::new(root.path().join("store"));

        let report = build(&source, &store, &opts).await.unwrap();
        assert!(report.failed);
        let projects = fs::read_to_string(opts.out_dir.join(PROJECTS_FRAGMENT)).unwrap();
        assert!(projects.contains("https://github.com/me"));
    }

    #[tokio::test]
    async fn test_own_repos_listed_when_nothing_configured() {
        let root = TempDir::new().unwrap();
        let store = Store::new(root.path());
        let mut data = SiteData::default();
        data.site.github_username = "me".into();
        data.site.featured_repos = vec!["b".into()];

        let source = FakeSource {
            user_repos: vec![repository("me", "a", 10), repository("me", "b", 1)],
            ..Default::default()
        };

        let collected = collect_projects(&source, &store, &data, None, Utc::now()).await;
        assert_eq!(collected.projects.len(), 1);
        assert_eq!(collected.projects[0].snapshot.name, "b");
        assert!(collected.projects[0].featured);
    }

    #[test]
    fn test_empty_configuration_is_not_a_failure() {
        assert!(!Collected::default().failed());
    }

    #[tokio::test]
    async fn test_pinned_own_repo_stays_featured() {
        let root = TempDir::new().unwrap();
        let store = Store::new(root.path());
        let mut data = SiteData::default();
        data.site.github_username = "me".into();
        data.pinned = vec![RepoRef::new("me", "a").pinned()];

        let source = FakeSource {
            user_repos: vec![repository("me", "a", 10), repository("me", "b", 1)],
            ..Default::default()
        };

        let collected = collect_projects(&source, &store, &data, None, Utc::now()).await;
        assert_eq!(collected.projects.len(), 2);
        let a = collected
            .projects
            .iter()
            .find(|p| p.snapshot.name == "a")
            .unwrap();
        assert!(a.featured);
        assert!(!collected.projects.iter().find(|p| p.snapshot.name == "b").unwrap().featured);
        assert_eq!(source.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_a_failure() {
        let root = TempDir::new().unwrap();
        let store = Store::new(root.path());
        let mut data = SiteData::default();
        data.site.github_username = "me".into();

        let collected =
            collect_projects(&FakeSource::default(), &store, &data, None, Utc::now()).await;
        assert!(collected.projects.is_empty());
        assert!(!collected.failed());

        let failing = FakeSource {
            listing_fails: true,
            ..Default::default()
        };
        let collected = collect_projects(&failing, &store, &data, None, Utc::now()).await;
        assert!(collected.failed());
    }
}
