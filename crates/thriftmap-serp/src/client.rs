//! HTTP client for SerpAPI's Yelp search and review engines.
//!
//! One client serves both pipeline phases: the initial store search
//! (`engine=yelp`) and the per-candidate business-detail lookup
//! (`engine=yelp_reviews`). The search is fallible and retried; the detail
//! lookup degrades to sentinel values so one bad record cannot abort a run.

use std::time::Duration;

use reqwest::{Client, Url};

use thriftmap_core::{BusinessDetails, CandidateResult, SearchQuery};

use crate::error::SerpError;
use crate::retry::retry_with_backoff;
use crate::types::{YelpBusinessResponse, YelpSearchResponse};

const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// Client for SerpAPI's Yelp engines.
///
/// Manages the HTTP client, API key, and base URL. Use [`SerpClient::new`]
/// for production or [`SerpClient::with_base_url`] to point at a mock server
/// in tests.
pub struct SerpClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl SerpClient {
    /// Creates a client pointed at the production SerpAPI endpoint.
    ///
    /// `max_retries` applies to the store search only and counts additional
    /// attempts after the first failure; set `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`SerpError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SerpError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SerpError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SerpError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        base_url: &str,
    ) -> Result<Self, SerpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure the base ends with exactly one slash so join() appends the
        // endpoint instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SerpError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Searches Yelp for businesses matching the query's category in the
    /// query's city. Result order is the upstream order and is preserved
    /// through the rest of the pipeline.
    ///
    /// An empty hit list is `Ok(vec![])`, not an error — the caller decides
    /// whether that terminates the run.
    ///
    /// # Errors
    ///
    /// - [`SerpError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`SerpError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`SerpError::Http`] — network or TLS failure after all retries.
    /// - [`SerpError::Deserialize`] — response body is not the expected shape.
    pub async fn search_stores(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<CandidateResult>, SerpError> {
        let url = self.build_url(&[
            ("engine", "yelp"),
            ("find_desc", &query.description),
            ("find_loc", &query.location),
        ])?;

        let response = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let body = self.request_success_body(url).await?;
                serde_json::from_str::<YelpSearchResponse>(&body).map_err(|e| {
                    SerpError::Deserialize {
                        context: "yelp search results".to_owned(),
                        source: e,
                    }
                })
            }
        })
        .await?;

        Ok(response
            .organic_results
            .into_iter()
            .map(CandidateResult::from)
            .collect())
    }

    /// Resolves the postal address and website for a candidate.
    ///
    /// Infallible by contract: an absent or blank `place_id` short-circuits
    /// to sentinel details without any network call, and every fetch failure
    /// is logged and downgraded to the same sentinels so the pipeline keeps
    /// going.
    pub async fn resolve_business_details(&self, place_id: Option<&str>) -> BusinessDetails {
        let Some(place_id) = place_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return BusinessDetails::unresolved();
        };

        match self.fetch_business_details(place_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(place_id, error = %e, "business detail lookup failed, using sentinels");
                BusinessDetails::unresolved()
            }
        }
    }

    /// Fetches business details for a known-good place ID.
    ///
    /// # Errors
    ///
    /// - [`SerpError::UnexpectedStatus`] — non-2xx status (body logged).
    /// - [`SerpError::Http`] — network or TLS failure.
    /// - [`SerpError::Deserialize`] — response body is not the expected shape.
    pub async fn fetch_business_details(
        &self,
        place_id: &str,
    ) -> Result<BusinessDetails, SerpError> {
        let url = self.build_url(&[
            ("engine", "yelp_reviews"),
            ("num", "1"),
            ("place_id", place_id),
        ])?;

        let body = self.request_success_body(url).await?;
        let response =
            serde_json::from_str::<YelpBusinessResponse>(&body).map_err(|e| {
                SerpError::Deserialize {
                    context: format!("business details for place {place_id}"),
                    source: e,
                }
            })?;

        Ok(BusinessDetails::from_parts(
            response.address,
            response.website,
        ))
    }

    /// Issues a GET and returns the body of a 2xx response, mapping 429 and
    /// other non-2xx statuses to typed errors. Failure bodies are logged for
    /// diagnostics before being discarded.
    async fn request_success_body(&self, url: Url) -> Result<String, SerpError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(SerpError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %error_body,
                "SerpAPI request failed"
            );
            return Err(SerpError::UnexpectedStatus {
                status: status.as_u16(),
                url: redacted(&url),
            });
        }

        Ok(response.text().await?)
    }

    /// Builds `search.json` with the given query parameters plus the API key.
    fn build_url(&self, params: &[(&str, &str)]) -> Result<Url, SerpError> {
        let mut url = self
            .base_url
            .join("search.json")
            .map_err(|e| SerpError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }
}

/// The request URL with its query string stripped, for error messages.
/// The query string carries the API key and must not leak into logs.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> SerpClient {
        SerpClient::with_base_url("test-key", 5, "thriftmap-test/0.1", 0, 0, base_url)
            .expect("failed to build test SerpClient")
    }

    #[test]
    fn build_url_appends_api_key_last() {
        let client = test_client("http://127.0.0.1:1");
        let url = client.build_url(&[("engine", "yelp")]).unwrap();
        let query = url.query().unwrap();
        assert!(query.starts_with("engine=yelp"));
        assert!(query.ends_with("api_key=test-key"));
    }

    #[test]
    fn build_url_percent_encodes_query_values() {
        let client = test_client("http://127.0.0.1:1");
        let url = client
            .build_url(&[("find_desc", "Secondhand Stores"), ("find_loc", "Malmö")])
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("find_desc=Secondhand+Stores"));
        assert!(!query.contains('ö'));
    }

    #[test]
    fn redacted_url_drops_the_query_string() {
        let client = test_client("http://127.0.0.1:1");
        let url = client.build_url(&[("engine", "yelp")]).unwrap();
        let shown = redacted(&url);
        assert!(!shown.contains("test-key"));
        assert!(shown.ends_with("/search.json"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = SerpClient::with_base_url("k", 5, "ua", 0, 0, "not a url");
        assert!(matches!(result, Err(SerpError::InvalidBaseUrl { .. })));
    }
}
