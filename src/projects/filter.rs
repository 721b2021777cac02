// Category filtering over rendered cards.
// The only state is the attributes the renderer writes onto each card.

use std::fmt;

use super::types::Project;

/// Category used for cards whose repository reports no language.
pub const OTHER_CATEGORY: &str = "other";

/// Filter values that never name a category.
const RESERVED_FILTERS: [&str; 2] = ["all", "featured"];

/// A filter selected from a `data-filter` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Featured,
    Category(String),
}

impl Filter {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Filter::All,
            "featured" => Filter::Featured,
            other => Filter::Category(category_slug(other)),
        }
    }

    /// Value written into the button's `data-filter` attribute.
    pub fn as_attr(&self) -> &str {
        match self {
            Filter::All => "all",
            Filter::Featured => "featured",
            Filter::Category(c) => c.as_str(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attr())
    }
}

/// Attributes a card carries for filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAttributes {
    pub language: String,
    pub categories: Vec<String>,
    pub featured: bool,
}

impl CardAttributes {
    pub fn from_project(project: &Project) -> Self {
        let language = project
            .snapshot
            .language
            .as_deref()
            .map(category_slug)
            .unwrap_or_else(|| OTHER_CATEGORY.to_string());

        let mut categories = vec![language.clone()];
        for tag in &project.tags {
            let tag = category_slug(tag);
            if !categories.contains(&tag) {
                categories.push(tag);
            }
        }

        Self {
            language,
            categories,
            featured: project.featured,
        }
    }

    pub fn matches(&self, filter: &Filter) -> bool {
        match filter {
            Filter::All => true,
            Filter::Featured => self.featured,
            Filter::Category(category) => self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category)),
        }
    }
}

/// Lowercase, whitespace collapsed to `-`, so categories stay single attribute tokens.
pub fn category_slug(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Visibility of each card under `filter`, in card order.
pub fn apply(cards: &[CardAttributes], filter: &Filter) -> Vec<bool> {
    cards.iter().map(|card| card.matches(filter)).collect()
}

/// Projects visible under `filter`.
pub fn visible<'a>(projects: &'a [Project], filter: &Filter) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| CardAttributes::from_project(p).matches(filter))
        .collect()
}

/// Filters offered for a set of projects: `all`, `featured` when any project is
/// pinned, then each category in first-seen order.
pub fn available_filters(projects: &[Project]) -> Vec<Filter> {
    let mut filters = vec![Filter::All];
    if projects.iter().any(|p| p.featured) {
        filters.push(Filter::Featured);
    }
    for project in projects {
        for category in CardAttributes::from_project(project).categories {
            if RESERVED_FILTERS.contains(&category.as_str()) {
                continue;
            }
            let filter = Filter::Category(category);
            if !filters.contains(&filter) {
                filters.push(filter);
            }
        }
    }
    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(language: &str, categories: &[&str], featured: bool) -> CardAttributes {
        CardAttributes {
            language: language.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            featured,
        }
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(Filter::parse("all"), Filter::All);
        assert_eq!(Filter::parse(""), Filter::All);
        assert_eq!(Filter::parse("Featured"), Filter::Featured);
        assert_eq!(Filter::parse("Python"), Filter::Category("python".into()));
        assert_eq!(Filter::parse("python").to_string(), "python");
        assert_eq!(
            Filter::parse("Machine Learning"),
            Filter::Category("machine-learning".into())
        );
    }

    #[test]
    fn test_all_shows_every_card() {
        let cards = vec![
            card("python", &["python"], false),
            card("other", &["other"], true),
            card("c++", &["c++", "hpc"], false),
        ];

        assert_eq!(apply(&cards, &Filter::All), vec![true, true, true]);
    }

    #[test]
    fn test_category_and_featured() {
        let cards = vec![
            card("python", &["python", "machine-learning"], false),
            card("other", &["other"], true),
            card("c++", &["c++", "hpc"], false),
        ];

        assert_eq!(
            apply(&cards, &Filter::parse("HPC")),
            vec![false, false, true]
        );
        assert_eq!(apply(&cards, &Filter::Featured), vec![false, true, false]);
        assert_eq!(
            apply(&cards, &Filter::parse("rust")),
            vec![false, false, false]
        );
    }

    #[test]
    fn test_reserved_tags_do_not_become_categories() {
        use crate::projects::types::{RepoSnapshot, SnapshotOrigin};

        let project = Project {
            snapshot: RepoSnapshot {
                name: "x".into(),
                owner: "a".into(),
                description: None,
                stars: 0,
                forks: 0,
                language: Some("Rust".into()),
                homepage: None,
                updated_at: None,
                topics: vec![],
                html_url: "https://github.com/a/x".into(),
                origin: SnapshotOrigin::Fresh,
            },
            title: "x".into(),
            description: None,
            image: None,
            tags: vec!["All".into(), "featured".into(), "cli".into()],
            url: "https://github.com/a/x".into(),
            featured: false,
        };

        let filters = available_filters(&[project]);
        assert_eq!(
            filters,
            vec![
                Filter::All,
                Filter::Category("rust".into()),
                Filter::Category("cli".into())
            ]
        );
    }
}
