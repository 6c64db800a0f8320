mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "thriftmap-cli")]
#[command(about = "Second-hand store discovery and enrichment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover second-hand stores in a city, enrich them with addresses,
    /// websites, and coordinates, and write the result to a JSON file.
    Scrape {
        /// City to search in.
        #[arg(long)]
        city: String,

        /// Business category or keyword to search for.
        #[arg(long, default_value = "Secondhand Stores")]
        category: String,

        /// Output file. Defaults to THRIFTMAP_OUTPUT_PATH (./stores.json).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print what would be fetched without calling any API.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = thriftmap_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape {
            city,
            category,
            out,
            dry_run,
        } => scrape::run_scrape(&config, &city, &category, out, dry_run).await,
    }
}
