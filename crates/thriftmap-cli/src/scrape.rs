//! The `scrape` command: one full pipeline run from a CLI invocation.

use std::path::PathBuf;

use thriftmap_core::{AppConfig, SearchQuery};
use thriftmap_geocode::GeocodeClient;
use thriftmap_pipeline::{JsonFileSink, Pipeline, RunOutcome};
use thriftmap_serp::SerpClient;

/// Builds the clients from config, runs the pipeline once, and reports the
/// outcome on stdout.
///
/// # Errors
///
/// Returns an error if a client cannot be constructed or the output file
/// cannot be written. A failed or empty search is reported as "no data", not
/// as an error exit.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    city: &str,
    category: &str,
    out: Option<PathBuf>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let query = SearchQuery::new(category, city);
    let out_path = out.unwrap_or_else(|| config.output_path.clone());

    if dry_run {
        println!(
            "dry-run: would search \"{}\" in {} and write enriched stores to {}",
            query.description,
            query.location,
            out_path.display()
        );
        return Ok(());
    }

    let serp = SerpClient::with_base_url(
        &config.serpapi_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        config.search_max_retries,
        config.search_retry_backoff_base_secs,
        &config.serpapi_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build SerpAPI client: {e}"))?;

    let geocoder = GeocodeClient::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.geocoder_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build geocoding client: {e}"))?;

    let pipeline = Pipeline::new(serp, geocoder, JsonFileSink::new(&out_path));

    match pipeline.run(&query).await? {
        RunOutcome::NoData => {
            println!("no data retrieved for \"{category}\" in {city}");
        }
        RunOutcome::Written { count, path } => {
            println!("scraping complete: {count} stores saved to {}", path.display());
        }
    }

    Ok(())
}
