use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sitelens::config::Config;
use sitelens::filter;
use sitelens::sites::SiteRegistry;
use sitelens::storage;

#[derive(Parser)]
#[command(name = "sitelens-admin")]
#[command(about = "Sitelens admin CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the site registry
    Sites,
    /// Show how a site/url filter pair resolves
    Resolve {
        /// Site code, or "all"
        #[arg(long)]
        site_filter: Option<String>,
        /// Raw URL filter
        #[arg(long)]
        url_filter: Option<String>,
    },
    /// Print aggregate stats for a site/url filter pair
    Stats {
        /// Site code, or "all"
        #[arg(long)]
        site_filter: Option<String>,
        /// Raw URL filter
        #[arg(long)]
        url_filter: Option<String>,
    },
}

fn load_registry(config: &Config) -> Result<SiteRegistry> {
    match config.sites.path.as_deref() {
        Some(path) => SiteRegistry::load(path)
            .with_context(|| format!("failed to load site registry from {path}")),
        None => Ok(SiteRegistry::builtin()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let sites = load_registry(&config)?;

    match cli.command {
        Commands::Sites => {
            if sites.is_empty() {
                println!("No sites registered");
            } else {
                println!("Registered sites:");
                for (code, url) in sites.iter() {
                    println!("  - {code}: {url}");
                }
            }
        }
        Commands::Resolve {
            site_filter,
            url_filter,
        } => {
            let resolved =
                filter::resolve(&sites, site_filter.as_deref(), url_filter.as_deref());
            println!("{}", resolved.resolution_message());
            println!("{}", resolved.filter_message());
        }
        Commands::Stats {
            site_filter,
            url_filter,
        } => {
            let resolved =
                filter::resolve(&sites, site_filter.as_deref(), url_filter.as_deref());
            let storage = storage::connect(&config.database).await?;
            storage.init().await?;

            let record = storage
                .site_stats(resolved.effective_url_filter.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&record.stats)?);
        }
    }

    Ok(())
}
