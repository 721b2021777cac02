// Project card pipeline.
// Fetch with cache, merge overrides, sort, render, and filter.

pub mod aggregate;
pub mod fetcher;
pub mod filter;
pub mod render;
pub mod types;

pub use aggregate::{aggregate, merge, sort_projects};
pub use fetcher::{Fetched, Fetcher, RepoSource};
pub use filter::{CardAttributes, Filter};
pub use render::{render_card, render_failure, render_filter_bar, render_grid};
pub use types::{Override, Overrides, Project, RepoRef, RepoSnapshot, SnapshotOrigin};
