use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let serpapi_api_key = require("SERPAPI_API_KEY")?;

    let serpapi_base_url = or_default("THRIFTMAP_SERPAPI_BASE_URL", "https://serpapi.com");
    let geocoder_base_url = or_default(
        "THRIFTMAP_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let output_path = PathBuf::from(or_default("THRIFTMAP_OUTPUT_PATH", "./stores.json"));
    let log_level = or_default("THRIFTMAP_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("THRIFTMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "THRIFTMAP_USER_AGENT",
        "thriftmap/0.1 (second-hand store map)",
    );
    let search_max_retries = parse_u32("THRIFTMAP_SEARCH_MAX_RETRIES", "3")?;
    let search_retry_backoff_base_secs =
        parse_u64("THRIFTMAP_SEARCH_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        serpapi_api_key,
        serpapi_base_url,
        geocoder_base_url,
        output_path,
        log_level,
        request_timeout_secs,
        user_agent,
        search_max_retries,
        search_retry_backoff_base_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid values.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("SERPAPI_API_KEY", "test-key");
        m
    }

    #[test]
    fn build_app_config_fails_without_api_key() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SERPAPI_API_KEY"),
            "expected MissingEnvVar(SERPAPI_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.serpapi_api_key, "test-key");
        assert_eq!(cfg.serpapi_base_url, "https://serpapi.com");
        assert_eq!(cfg.geocoder_base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(cfg.output_path, PathBuf::from("./stores.json"));
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.search_max_retries, 3);
    }

    #[test]
    fn build_app_config_honors_overrides() {
        let mut map = full_env();
        map.insert("THRIFTMAP_SERPAPI_BASE_URL", "http://127.0.0.1:9000");
        map.insert("THRIFTMAP_OUTPUT_PATH", "/tmp/out.json");
        map.insert("THRIFTMAP_REQUEST_TIMEOUT_SECS", "5");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.serpapi_base_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.output_path, PathBuf::from("/tmp/out.json"));
        assert_eq!(cfg.request_timeout_secs, 5);
    }

    #[test]
    fn build_app_config_rejects_non_numeric_timeout() {
        let mut map = full_env();
        map.insert("THRIFTMAP_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. })
                    if var == "THRIFTMAP_REQUEST_TIMEOUT_SECS"
            ),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }

    #[test]
    fn debug_output_redacts_the_api_key() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("test-key"));
        assert!(debug.contains("[redacted]"));
    }
}
