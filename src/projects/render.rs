// Card renderer.
// Pure string construction: projects in, HTML fragments out.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::filter::{CardAttributes, available_filters};
use super::types::Project;

pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_PROJECTS: &str = "No projects found.";

/// Delay step between consecutive card entrance animations, in tenths of a second.
const ANIMATION_STEP: f32 = 0.1;

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Human-readable age of `date` relative to `now`.
pub fn relative_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - date).num_seconds().unsigned_abs();
    let days = secs.div_ceil(24 * 60 * 60);

    if days == 0 {
        "today".to_string()
    } else if days < 30 {
        plural(days, "day")
    } else if days < 365 {
        plural(days / 30, "month")
    } else {
        plural(days / 365, "year")
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Render one project card.
pub fn render_card(project: &Project, now: DateTime<Utc>) -> String {
    render_card_at(project, now, None)
}

fn render_card_at(project: &Project, now: DateTime<Utc>, index: Option<usize>) -> String {
    let snap = &project.snapshot;
    let attrs = CardAttributes::from_project(project);
    let mut html = String::new();

    let mut class = String::from("project-card");
    if snap.is_fallback() {
        class.push_str(" project-card--fallback");
    }
    let _ = write!(
        html,
        r#"<div class="{}" data-language="{}" data-category="{}""#,
        class,
        escape_html(&attrs.language),
        escape_html(&attrs.categories.join(" ")),
    );
    if attrs.featured {
        html.push_str(r#" data-featured="true""#);
    }
    if let Some(index) = index {
        let _ = write!(
            html,
            r#" style="animation-delay: {:.1}s""#,
            index as f32 * ANIMATION_STEP
        );
    }
    html.push_str(">\n");

    if let Some(image) = &project.image {
        let _ = writeln!(
            html,
            r#"  <img class="project-image" src="{}" alt="{}">"#,
            escape_html(image),
            escape_html(&project.title)
        );
    }

    let _ = writeln!(html, "  <h3>{}</h3>", escape_html(&project.title));
    let _ = writeln!(
        html,
        "  <p>{}</p>",
        escape_html(project.description.as_deref().unwrap_or(NO_DESCRIPTION))
    );

    html.push_str("  <div class=\"project-meta\">\n");
    if snap.stars > 0 {
        let _ = writeln!(
            html,
            r#"    <span class="project-meta"><i class="fas fa-star"></i> {}</span>"#,
            snap.stars
        );
    }
    if snap.forks > 0 {
        let _ = writeln!(
            html,
            r#"    <span class="project-meta"><i class="fas fa-code-branch"></i> {}</span>"#,
            snap.forks
        );
    }
    if let Some(updated) = snap.updated_at {
        let _ = writeln!(
            html,
            r#"    <span><i class="fas fa-clock"></i> Updated {}</span>"#,
            relative_date(updated, now)
        );
    }
    html.push_str("  </div>\n");

    html.push_str("  <div class=\"project-tags\">\n");
    for tag in &project.tags {
        let _ = writeln!(html, r#"    <span class="tag">{}</span>"#, escape_html(tag));
    }
    html.push_str("  </div>\n");

    html.push_str("  <div class=\"project-links\">\n");
    let _ = writeln!(
        html,
        r#"    <a href="{}" target="_blank" class="project-link"><i class="fab fa-github"></i> View on GitHub</a>"#,
        escape_html(&project.url)
    );
    if let Some(homepage) = &snap.homepage {
        let _ = writeln!(
            html,
            r#"    <a href="{}" target="_blank" class="project-link"><i class="fas fa-external-link-alt"></i> Live Demo</a>"#,
            escape_html(homepage)
        );
    }
    html.push_str("  </div>\n</div>\n");

    html
}

/// Render the project grid, or the empty-state message.
pub fn render_grid(projects: &[Project], now: DateTime<Utc>) -> String {
    if projects.is_empty() {
        return format!("<div class=\"loading\">{}</div>\n", NO_PROJECTS);
    }

    projects
        .iter()
        .enumerate()
        .map(|(i, p)| render_card_at(p, now, Some(i)))
        .collect()
}

/// Message shown when nothing could be loaded at all.
pub fn render_failure(username: &str) -> String {
    let user = escape_html(username);
    format!(
        "<div class=\"loading\">\n  Failed to load projects. Please visit my\n  \
         <a href=\"https://github.com/{user}\" target=\"_blank\">GitHub profile</a>\n  directly.\n</div>\n"
    )
}

/// Filter buttons for the categories present in `projects`.
pub fn render_filter_bar(projects: &[Project]) -> String {
    let mut html = String::from("<div class=\"project-filters\">\n");
    for (i, filter) in available_filters(projects).iter().enumerate() {
        let active = if i == 0 { " active" } else { "" };
        let _ = writeln!(
            html,
            r#"  <button class="filter-btn{}" data-filter="{}">{}</button>"#,
            active,
            escape_html(filter.as_attr()),
            escape_html(&filter_label(filter.as_attr())),
        );
    }
    html.push_str("</div>\n");
    html
}

fn filter_label(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
