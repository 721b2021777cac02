//! Portfolio site builder.
//!
//! Fetches repository metadata from GitHub, merges it with curated overrides,
//! and renders project cards, filter buttons, and skill lists as HTML fragments.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod projects;
pub mod site;
pub mod skills;
pub mod theme;

pub use error::{FolioError, Result};
