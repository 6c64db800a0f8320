//! Store discovery and enrichment orchestration.
//!
//! One [`Pipeline::run`] is a single end-to-end execution: one search call,
//! then a strictly sequential per-candidate enrichment loop, then exactly
//! one handoff to the sink. Both per-candidate calls hit the same
//! rate-limited SerpAPI upstream, which is why candidates are processed one
//! at a time; output order always matches the search result order.

use std::path::PathBuf;

use thriftmap_core::{EnrichedCollection, SearchQuery, StoreRecord};
use thriftmap_geocode::GeocodeClient;
use thriftmap_serp::SerpClient;

use crate::error::PipelineError;
use crate::sink::JsonFileSink;

/// Terminal state of a pipeline run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The search returned nothing (or failed). No output file was written.
    NoData,
    /// All candidates were enriched and the collection was persisted.
    Written { count: usize, path: PathBuf },
}

/// Drives search, per-candidate enrichment, and persistence.
///
/// The HTTP clients are injected at construction so tests can point them at
/// mock servers; the pipeline owns them for the duration of its runs.
pub struct Pipeline {
    serp: SerpClient,
    geocoder: GeocodeClient,
    sink: JsonFileSink,
}

impl Pipeline {
    #[must_use]
    pub fn new(serp: SerpClient, geocoder: GeocodeClient, sink: JsonFileSink) -> Self {
        Self {
            serp,
            geocoder,
            sink,
        }
    }

    /// Runs the full pipeline for one query.
    ///
    /// A failed or empty search is a normal terminal state
    /// ([`RunOutcome::NoData`]), not an error: the sink is never invoked and
    /// the search failure itself is logged. Enrichment failures never abort
    /// the loop — every candidate produces a record, with sentinel values
    /// where resolution failed, in the search's original order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only when the completed collection cannot
    /// be serialized or written.
    pub async fn run(&self, query: &SearchQuery) -> Result<RunOutcome, PipelineError> {
        let candidates = match self.serp.search_stores(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(
                    description = %query.description,
                    location = %query.location,
                    error = %e,
                    "store search failed, no data retrieved"
                );
                return Ok(RunOutcome::NoData);
            }
        };

        if candidates.is_empty() {
            tracing::info!(
                description = %query.description,
                location = %query.location,
                "store search returned no results"
            );
            return Ok(RunOutcome::NoData);
        }

        let mut records: EnrichedCollection = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            tracing::info!(store = %candidate.title, "enriching candidate");

            let details = self
                .serp
                .resolve_business_details(candidate.place_id.as_deref())
                .await;
            let coordinates = self.geocoder.resolve(&details.address).await;

            tracing::debug!(
                store = %candidate.title,
                latitude = coordinates.latitude,
                longitude = coordinates.longitude,
                resolved = !coordinates.is_unresolved(),
                "candidate enriched"
            );

            records.push(StoreRecord::assemble(candidate, details, coordinates));
        }

        // The collection is complete and immutable from here on.
        self.sink.write(&records)?;

        tracing::info!(
            count = records.len(),
            path = %self.sink.path().display(),
            "enriched collection persisted"
        );

        Ok(RunOutcome::Written {
            count: records.len(),
            path: self.sink.path().to_owned(),
        })
    }
}
