use std::path::PathBuf;

/// Application configuration, loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// SerpAPI key used for both the store search and detail lookups.
    pub serpapi_api_key: String,
    /// Base URL for SerpAPI. Overridable so tests can point at a mock server.
    pub serpapi_base_url: String,
    /// Base URL for the Nominatim geocoder. Overridable for tests/mirrors.
    pub geocoder_base_url: String,
    /// Where the serialized store collection is written.
    pub output_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// `User-Agent` sent on every outbound request. Nominatim's usage policy
    /// requires an identifying agent string.
    pub user_agent: String,
    pub search_max_retries: u32,
    pub search_retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("serpapi_api_key", &"[redacted]")
            .field("serpapi_base_url", &self.serpapi_base_url)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("output_path", &self.output_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_max_retries", &self.search_max_retries)
            .field(
                "search_retry_backoff_base_secs",
                &self.search_retry_backoff_base_secs,
            )
            .finish()
    }
}
