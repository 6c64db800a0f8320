use thiserror::Error;

/// Errors returned by the Nominatim geocoding client.
///
/// These never escape a pipeline run: the orchestrator consumes them through
/// [`GeocodeClient::resolve`](crate::GeocodeClient::resolve), which downgrades
/// every failure to the unresolved-coordinates sentinel.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any non-2xx HTTP status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected shape,
    /// or a matched place carried non-numeric coordinates.
    #[error("malformed geocoding response for \"{address}\": {reason}")]
    MalformedResponse { address: String, reason: String },

    /// The configured base URL is not a valid URL base.
    #[error("invalid geocoder base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
