use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use folio::cache::{Store, default_store_dir};
use folio::config::{SiteData, default_data_dir};
use folio::error::{FolioError, Result};
use folio::github::GitHubClient;
use folio::projects::{Filter, filter};
use folio::site::{self, BuildOptions};
use folio::theme::{Theme, ThemePreference};

#[derive(Parser)]
#[command(name = "folio", about = "Build portfolio project cards from GitHub", version)]
struct Cli {
    /// Directory holding site-config.json and the other data files
    #[arg(long, global = true, env = "FOLIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory for cached repositories and preferences
    #[arg(long, global = true, env = "FOLIO_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// GitHub API root
    #[arg(long, global = true, env = "FOLIO_API_URL", default_value = folio::github::client::GITHUB_API_BASE)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write projects, filters, and skills fragments
    Build {
        /// Output directory for the HTML fragments
        #[arg(long, default_value = "_includes/generated")]
        out: PathBuf,

        /// Render every project instead of the featured top
        #[arg(long)]
        all: bool,
    },
    /// Print the aggregated projects
    List {
        /// Filter value as used by the filter buttons (all, featured, a category)
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Show or change the stored theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,

        /// Whether the system prefers a dark color scheme
        #[arg(long, global = true)]
        system_dark: bool,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Get,
    Set { theme: Theme },
    Toggle,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let store_dir = cli
        .cache_dir
        .or_else(default_store_dir)
        .ok_or_else(|| FolioError::Config("no cache directory available".into()))?;
    let store = Store::new(store_dir);
    tracing::debug!(store = %store.root().display(), data = %data_dir.display(), "using directories");

    match cli.command {
        Command::Build { out, all } => {
            let client = GitHubClient::with_base_url(&cli.api_url)?;
            let options = BuildOptions {
                data_dir,
                out_dir: out,
                show_all: all,
            };
            let report = site::build(&client, &store, &options).await?;
            for path in &report.written {
                println!("{}", path.display());
            }
        }
        Command::List { filter: value } => {
            let client = GitHubClient::with_base_url(&cli.api_url)?;
            let data = SiteData::load(&data_dir)?;
            let collected = site::collect_projects(&client, &store, &data, None, Utc::now()).await;
            let selected = Filter::parse(&value);
            for project in filter::visible(&collected.projects, &selected) {
                let origin = if project.snapshot.is_fallback() {
                    " (offline)"
                } else {
                    ""
                };
                println!(
                    "{:>6}  {:<40} {}{}",
                    project.snapshot.stars,
                    project.title,
                    project.snapshot.full_name(),
                    origin
                );
            }
        }
        Command::Theme {
            action,
            system_dark,
        } => {
            let pref = ThemePreference::new(&store);
            let system = Some(system_dark);
            let theme = match action.unwrap_or(ThemeAction::Get) {
                ThemeAction::Get => pref.current(system),
                ThemeAction::Set { theme } => {
                    pref.set(theme)?;
                    theme
                }
                ThemeAction::Toggle => pref.toggle(system)?,
            };
            println!("{} ({})", theme, theme.icon());
        }
    }

    Ok(())
}
