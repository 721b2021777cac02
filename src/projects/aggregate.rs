// Override merge, deduplication, and ordering of fetched repositories.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::fetcher::Fetched;
use super::types::{Overrides, Project};

/// Topics shown on a card when no override tags exist.
const MAX_TOPIC_TAGS: usize = 3;

/// Merge overrides, drop duplicates, and sort by popularity then recency.
///
/// `limit` truncates after sorting, so it keeps the top projects.
pub fn aggregate(fetched: Vec<Fetched>, overrides: &Overrides, limit: Option<usize>) -> Vec<Project> {
    let mut seen = HashSet::new();
    let mut projects: Vec<Project> = fetched
        .into_iter()
        .filter(|f| seen.insert(f.snapshot.full_name().to_lowercase()))
        .map(|f| merge(f, overrides))
        .collect();

    sort_projects(&mut projects);

    if let Some(limit) = limit {
        projects.truncate(limit);
    }
    projects
}

/// Resolve a fetched snapshot against its override, if any.
pub fn merge(fetched: Fetched, overrides: &Overrides) -> Project {
    let Fetched {
        reference,
        snapshot,
    } = fetched;
    let over = overrides
        .get(&snapshot.owner, &snapshot.name)
        .cloned()
        .unwrap_or_default();

    let tags = over.tags.unwrap_or_else(|| {
        snapshot
            .language
            .iter()
            .cloned()
            .chain(snapshot.topics.iter().take(MAX_TOPIC_TAGS).cloned())
            .collect()
    });

    Project {
        title: over.title.unwrap_or_else(|| snapshot.name.clone()),
        description: over.description.or_else(|| snapshot.description.clone()),
        image: over.image,
        tags,
        url: over.github_url.unwrap_or_else(|| snapshot.html_url.clone()),
        featured: reference.pinned,
        snapshot,
    }
}

/// Stable sort: stars descending, then last update descending. Missing dates sort last.
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        b.snapshot
            .stars
            .cmp(&a.snapshot.stars)
            .then_with(|| compare_dates_desc(a, b))
    });
}

fn compare_dates_desc(a: &Project, b: &Project) -> Ordering {
    match (a.snapshot.updated_at, b.snapshot.updated_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
