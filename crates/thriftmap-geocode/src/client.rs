//! HTTP client for the Nominatim (OpenStreetMap) geocoding API.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use thriftmap_core::{Coordinates, ADDRESS_NOT_FOUND};

use crate::error::GeocodeError;
use crate::types::NominatimPlace;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Client for Nominatim's free-text address search.
///
/// Always sends an identifying `User-Agent` — Nominatim's usage policy
/// blocks anonymous clients. Use [`GeocodeClient::with_base_url`] to point
/// at a mock server or self-hosted instance.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock or
    /// a self-hosted Nominatim).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Resolves a free-text address to coordinates.
    ///
    /// Infallible by contract. A blank address or the `"Address not found"`
    /// sentinel short-circuits to [`Coordinates::UNRESOLVED`] without any
    /// network call. Otherwise the first Nominatim match wins; no match,
    /// transport failures, non-2xx statuses, and shape mismatches all
    /// degrade to the same sentinel with a warning logged, so the caller can
    /// continue to the next candidate.
    pub async fn resolve(&self, address: &str) -> Coordinates {
        let trimmed = address.trim();
        if trimmed.is_empty() || trimmed == ADDRESS_NOT_FOUND {
            return Coordinates::UNRESOLVED;
        }

        match self.fetch_coordinates(trimmed).await {
            Ok(Some(coordinates)) => coordinates,
            Ok(None) => {
                tracing::warn!(address = trimmed, "geocoder found no match, using sentinel");
                Coordinates::UNRESOLVED
            }
            Err(e) => {
                tracing::warn!(address = trimmed, error = %e, "geocoding failed, using sentinel");
                Coordinates::UNRESOLVED
            }
        }
    }

    /// Looks up an address and returns the first match, if any.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::UnexpectedStatus`] — non-2xx status.
    /// - [`GeocodeError::Http`] — network or TLS failure.
    /// - [`GeocodeError::MalformedResponse`] — body is not a JSON place
    ///   list, or the first match carries non-numeric coordinates.
    pub async fn fetch_coordinates(
        &self,
        address: &str,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.search_url(address)?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let places = serde_json::from_str::<Vec<NominatimPlace>>(&body).map_err(|e| {
            GeocodeError::MalformedResponse {
                address: address.to_owned(),
                reason: e.to_string(),
            }
        })?;

        let Some(first) = places.first() else {
            return Ok(None);
        };

        first
            .coordinates()
            .map(Some)
            .ok_or_else(|| GeocodeError::MalformedResponse {
                address: address.to_owned(),
                reason: format!("non-numeric coordinates lat={} lon={}", first.lat, first.lon),
            })
    }

    /// Builds `search?format=json&q=<escaped address>`.
    fn search_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let escaped = utf8_percent_encode(address, NON_ALPHANUMERIC).to_string();
        let raw = format!("{}search?format=json&q={escaped}", self.base_url);
        Url::parse(&raw).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: self.base_url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_percent_encodes_the_address() {
        let client =
            GeocodeClient::with_base_url(5, "thriftmap-test/0.1", "http://127.0.0.1:1").unwrap();
        let url = client.search_url("Södra Förstadsgatan 1, Malmö").unwrap();
        let raw = url.as_str();
        assert!(raw.contains("format=json"));
        assert!(!raw.contains(' '));
        assert!(!raw.contains('ö'));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GeocodeClient::with_base_url(5, "ua", "::not-a-url::");
        assert!(matches!(result, Err(GeocodeError::InvalidBaseUrl { .. })));
    }
}
