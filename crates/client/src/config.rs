use std::{env, str::FromStr, time::Duration};

use crate::repository::RetryPolicy;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the API server (default: "http://localhost:3000")
    pub api_url: String,
    /// Path prefix in front of every resource (default: "api")
    pub api_prefix: String,
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries per resource (default: 10,000)
    pub cache_max_entries: usize,
    /// Total attempts per resilient call (default: 3)
    pub retry_max_attempts: u32,
    /// Linear backoff step in milliseconds (default: 1,000)
    pub retry_base_delay_ms: u64,
    /// Page size reported when filters do not name one (default: 10)
    pub default_page_limit: u32,
    /// Per-request HTTP timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRIALSYNC_API_URL` - API base URL (default: "http://localhost:3000")
    /// - `TRIALSYNC_API_PREFIX` - Resource path prefix (default: "api")
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries per resource (default: 10,000)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per resilient call (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - Backoff step in milliseconds (default: 1,000)
    /// - `DEFAULT_PAGE_LIMIT` - Default page size (default: 10)
    /// - `REQUEST_TIMEOUT_SECONDS` - HTTP timeout (default: 30)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Missing or unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_url: lookup("TRIALSYNC_API_URL").unwrap_or(defaults.api_url),
            api_prefix: lookup("TRIALSYNC_API_PREFIX").unwrap_or(defaults.api_prefix),
            cache_ttl_seconds: parse_var(&lookup, "CACHE_TTL_SECONDS")
                .unwrap_or(defaults.cache_ttl_seconds),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            retry_max_attempts: parse_var(&lookup, "RETRY_MAX_ATTEMPTS")
                .unwrap_or(defaults.retry_max_attempts),
            retry_base_delay_ms: parse_var(&lookup, "RETRY_BASE_DELAY_MS")
                .unwrap_or(defaults.retry_base_delay_ms),
            default_page_limit: parse_var(&lookup, "DEFAULT_PAGE_LIMIT")
                .unwrap_or(defaults.default_page_limit),
            request_timeout_seconds: parse_var(&lookup, "REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the HTTP request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Retry policy for resilient stacks.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

/// Reads `key` and parses its trimmed value; `None` when missing or invalid.
fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| value.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            api_prefix: "api".to_string(),
            cache_ttl_seconds: 300,
            cache_max_entries: 10_000,
            retry_max_attempts: 3,
            retry_base_delay_ms: 1_000,
            default_page_limit: 10,
            request_timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.api_prefix, "api");
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.retry_max_attempts, 3);
        assert_eq!(config.retry_base_delay_ms, 1_000);
        assert_eq!(config.default_page_limit, 10);
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TRIALSYNC_API_URL", "https://trials.example.org"),
            ("CACHE_TTL_SECONDS", "60"),
            ("RETRY_MAX_ATTEMPTS", "5"),
            ("DEFAULT_PAGE_LIMIT", " 25 "),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url, "https://trials.example.org");
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.retry_max_attempts, 5);
        assert_eq!(config.default_page_limit, 25);
        assert_eq!(config.api_prefix, "api");
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = Config::from_lookup(|key| match key {
            "CACHE_MAX_ENTRIES" => Some("lots".to_string()),
            _ => None,
        });
        assert_eq!(config.cache_max_entries, 10_000);
    }

    #[test]
    fn test_every_numeric_field_is_trimmed_and_parsed() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CACHE_TTL_SECONDS", " 90"),
            ("CACHE_MAX_ENTRIES", "512 "),
            ("RETRY_MAX_ATTEMPTS", " 7 "),
            ("RETRY_BASE_DELAY_MS", "\t40"),
            ("DEFAULT_PAGE_LIMIT", "50\n"),
            ("REQUEST_TIMEOUT_SECONDS", " 5"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.cache_ttl_seconds, 90);
        assert_eq!(config.cache_max_entries, 512);
        assert_eq!(config.retry_max_attempts, 7);
        assert_eq!(config.retry_base_delay_ms, 40);
        assert_eq!(config.default_page_limit, 50);
        assert_eq!(config.request_timeout_seconds, 5);
    }

    #[test]
    fn test_negative_values_fall_back_for_unsigned_fields() {
        let config = Config::from_lookup(|key| match key {
            "RETRY_MAX_ATTEMPTS" | "DEFAULT_PAGE_LIMIT" => Some("-1".to_string()),
            _ => None,
        });
        assert_eq!(config.retry_max_attempts, 3);
        assert_eq!(config.default_page_limit, 10);
    }

    #[test]
    fn test_retry_policy_conversion() {
        let config = Config {
            retry_max_attempts: 4,
            retry_base_delay_ms: 250,
            ..Config::default()
        };

        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
    }
}
