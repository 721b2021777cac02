// Skills sections rendered from skills-config.json.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::projects::render::escape_html;

/// Icon used for languages without a dedicated one.
const DEFAULT_LANGUAGE_ICON: &str = "fas fa-code";

/// Category whose tools are listed separately from programming languages.
pub const OTHER_CATEGORY: &str = "other";

const KNOWN_CATEGORY_ORDER: [&str; 3] = ["data_science", "ai", "hpc"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, SkillCategory>,
}

/// A rendered section, identified by the id of its container element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillSection {
    pub id: String,
    pub title: String,
    pub html: String,
}

pub fn language_icon(language: &str) -> &'static str {
    match language {
        "Python" => "fab fa-python",
        "C" | "C++" => "fas fa-code",
        "SQL" => "fas fa-database",
        "JavaScript" => "fab fa-js",
        "Java" => "fab fa-java",
        "MATLAB" => "fas fa-chart-line",
        "Bash" => "fab fa-linux",
        "HTML" => "fab fa-html5",
        "CSS" => "fab fa-css3-alt",
        _ => DEFAULT_LANGUAGE_ICON,
    }
}

pub fn tool_icon(tool: &str) -> Option<&'static str> {
    match tool {
        "Git" => Some("fab fa-git-alt"),
        "Linux" => Some("fab fa-linux"),
        "Docker" => Some("fab fa-docker"),
        _ => None,
    }
}

fn tech_tag(html: &mut String, label: &str, icon: Option<&str>) {
    match icon {
        Some(icon) => {
            let _ = writeln!(
                html,
                r#"<span class="tech-tag"><i class="{}"></i> {}</span>"#,
                icon,
                escape_html(label)
            );
        }
        None => {
            let _ = writeln!(html, r#"<span class="tech-tag">{}</span>"#, escape_html(label));
        }
    }
}

pub fn render_programming_languages(config: &SkillsConfig) -> String {
    let mut html = String::new();
    for lang in &config.programming_languages {
        tech_tag(&mut html, lang, Some(language_icon(lang)));
    }
    html
}

pub fn render_category(category: &SkillCategory) -> String {
    let mut html = String::new();
    for skill in &category.skills {
        tech_tag(&mut html, skill, None);
    }
    html
}

/// Tools from the `other` category that are not already listed as languages.
pub fn render_other_tools(config: &SkillsConfig) -> String {
    let mut html = String::new();
    let Some(other) = config.categories.get(OTHER_CATEGORY) else {
        return html;
    };
    for tool in other
        .skills
        .iter()
        .filter(|s| !config.programming_languages.contains(s))
    {
        tech_tag(&mut html, tool, tool_icon(tool));
    }
    html
}

/// Named categories in display order: the well-known ones first, then the rest by key.
fn ordered_categories(config: &SkillsConfig) -> Vec<(&String, &SkillCategory)> {
    let rank = |key: &str| {
        KNOWN_CATEGORY_ORDER
            .iter()
            .position(|k| *k == key)
            .unwrap_or(KNOWN_CATEGORY_ORDER.len())
    };
    let mut categories: Vec<_> = config
        .categories
        .iter()
        .filter(|(key, _)| key.as_str() != OTHER_CATEGORY)
        .collect();
    categories.sort_by_key(|(key, _)| rank(key));
    categories
}

/// Every section: languages first, named categories, then other tools.
pub fn render_sections(config: &SkillsConfig) -> Vec<SkillSection> {
    let mut sections = Vec::new();

    if !config.programming_languages.is_empty() {
        sections.push(SkillSection {
            id: "programming-languages-section".into(),
            title: "Programming Languages".into(),
            html: render_programming_languages(config),
        });
    }

    for (key, category) in ordered_categories(config) {
        sections.push(SkillSection {
            id: format!("{}-section", key.replace('_', "-")),
            title: category.name.clone().unwrap_or_else(|| default_title(key)),
            html: render_category(category),
        });
    }

    if config.categories.contains_key(OTHER_CATEGORY) {
        sections.push(SkillSection {
            id: "other-tools-section".into(),
            title: "Other Tools".into(),
            html: render_other_tools(config),
        });
    }

    sections
}

/// Standalone fragment with every section wrapped in its container.
pub fn render_skills(config: &SkillsConfig) -> String {
    let mut html = String::new();
    for section in render_sections(config) {
        let _ = writeln!(
            html,
            "<div class=\"skill-group\">\n<h3>{}</h3>\n<div id=\"{}\" class=\"tech-tags\">\n{}</div>\n</div>",
            escape_html(&section.title),
            section.id,
            section.html
        );
    }
    html
}

fn default_title(key: &str) -> String {
    match key {
        "data_science" => "Data Science".into(),
        "ai" => "AI / Machine Learning".into(),
        "hpc" => "HPC".into(),
        _ => key
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SkillsConfig {
        serde_json::from_str(
            r##"{
                "programming_languages": ["Python", "C++", "Rust"],
                "categories": {
                    "data_science": {"name": "Data Science", "color": "#3b82f6", "skills": ["Pandas", "NumPy"]},
                    "hpc": {"skills": ["MPI", "OpenMP"]},
                    "ai": {"skills": ["PyTorch"]},
                    "cloud": {"skills": ["AWS"]},
                    "other": {"skills": ["Git", "Python", "Docker", "LaTeX"]}
                }
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_language_icons() {
        let html = render_programming_languages(&config());
        assert!(html.contains(r#"<i class="fab fa-python"></i> Python"#));
        assert!(html.contains(r#"<i class="fas fa-code"></i> C++"#));
        assert!(html.contains(r#"<i class="fas fa-code"></i> Rust"#));
    }

    #[test]
    fn test_other_tools_exclude_languages() {
        let html = render_other_tools(&config());
        assert!(html.contains(r#"<i class="fab fa-git-alt"></i> Git"#));
        assert!(html.contains(r#"<i class="fab fa-docker"></i> Docker"#));
        assert!(html.contains(r#"<span class="tech-tag">LaTeX</span>"#));
        assert!(!html.contains("Python"));
    }

    #[test]
    fn test_sections_order_and_titles() {
        let sections = render_sections(&config());
        let ids: Vec<_> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "programming-languages-section",
                "data-science-section",
                "ai-section",
                "hpc-section",
                "cloud-section",
                "other-tools-section"
            ]
        );
        assert_eq!(sections[2].title, "AI / Machine Learning");
        assert_eq!(sections[3].title, "HPC");
        assert_eq!(sections[4].title, "Cloud");
        assert!(sections[1].html.contains("Pandas"));
    }

    #[test]
    fn test_empty_config_renders_nothing() {
        assert!(render_skills(&SkillsConfig::default()).is_empty());
    }
}
