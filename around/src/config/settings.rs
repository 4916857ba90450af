//! Service settings read from the environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use around_repository::gcs::DEFAULT_GCS_BASE_URL;
use around_repository::opensearch::{DEFAULT_MAX_RESULTS, INDEX_NAME};
use around_repository::{GcsConfig, IndexConfig};
use tracing::warn;

use crate::identity::DEFAULT_PLACEHOLDER_AUTHOR;
use crate::AppError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default HTTP port.
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default per-call timeout for the search index and blob store, in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default bucket for post media.
const DEFAULT_GCS_BUCKET: &str = "post-images";

/// Default multipart body limit (32 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 << 20;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from its setting value.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// All runtime settings for the service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: SocketAddr,
    pub opensearch_url: String,
    pub index: IndexConfig,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub request_timeout: Duration,
    pub gcs: GcsConfig,
    pub placeholder_author: String,
    pub max_upload_bytes: usize,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SERVER_HOST` / `SERVER_PORT`: Listen address (default: 0.0.0.0:8080)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_NAME`: Post index name (default: "around")
    /// - `SEARCH_MAX_RESULTS`: Hit cap per search (default: 100)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `REQUEST_TIMEOUT_SECS`: Per-call timeout for external stores (default: 10)
    /// - `GCS_BASE_URL`: Cloud Storage API root (default: https://storage.googleapis.com)
    /// - `GCS_BUCKET`: Media bucket (default: "post-images")
    /// - `GCS_ACCESS_TOKEN`: Fixed bearer token overriding Application Default
    ///   Credentials, for emulators (optional)
    /// - `GCS_ANONYMOUS`: Send no credentials at all when "true" (default: false)
    /// - `PLACEHOLDER_AUTHOR`: Author recorded on posts (default: "1111")
    /// - `MAX_UPLOAD_BYTES`: Multipart body limit (default: 32 MiB)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// Unset keys take their defaults; set but unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host: IpAddr = parse_or(&get, "SERVER_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = parse_or(&get, "SERVER_PORT", DEFAULT_SERVER_PORT)?;

        let index_name = get("INDEX_NAME").unwrap_or_else(|| INDEX_NAME.to_string());
        let max_results: usize = parse_or(&get, "SEARCH_MAX_RESULTS", DEFAULT_MAX_RESULTS)?;
        if max_results == 0 {
            return Err(AppError::config("SEARCH_MAX_RESULTS must be greater than 0"));
        }

        let retry_interval_secs: u64 =
            parse_or(&get, "OPENSEARCH_RETRY_INTERVAL_SECS", DEFAULT_RETRY_INTERVAL_SECS)?;
        let request_timeout_secs: u64 =
            parse_or(&get, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if request_timeout_secs == 0 {
            return Err(AppError::config("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        let mut gcs = GcsConfig::new(get("GCS_BUCKET").unwrap_or_else(|| DEFAULT_GCS_BUCKET.to_string()))
            .with_base_url(get("GCS_BASE_URL").unwrap_or_else(|| DEFAULT_GCS_BASE_URL.to_string()));
        let anonymous: bool = parse_or(&get, "GCS_ANONYMOUS", false)?;
        if let Some(token) = get("GCS_ACCESS_TOKEN") {
            gcs = gcs.with_access_token(token);
        } else if anonymous {
            gcs = gcs.anonymous();
        }

        Ok(Self {
            server_addr: SocketAddr::new(host, port),
            opensearch_url: get("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            index: IndexConfig::new(index_name, max_results),
            connection_mode: ConnectionMode::parse(get("OPENSEARCH_CONNECTION_MODE").as_deref()),
            retry_interval: Duration::from_secs(retry_interval_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            gcs,
            placeholder_author: get("PLACEHOLDER_AUTHOR")
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_AUTHOR.to_string()),
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::config(format!("{} has invalid value '{}': {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use around_repository::GcsCredentials;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();

        assert_eq!(settings.server_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(settings.opensearch_url, "http://localhost:9200");
        assert_eq!(settings.index.index, "around");
        assert_eq!(settings.index.max_results, 100);
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.gcs.bucket, "post-images");
        assert_eq!(settings.gcs.base_url, "https://storage.googleapis.com");
        assert_eq!(settings.gcs.credentials, GcsCredentials::ApplicationDefault);
        assert_eq!(settings.placeholder_author, "1111");
        assert_eq!(settings.max_upload_bytes, 32 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "9000"),
            ("OPENSEARCH_URL", "http://search:9200"),
            ("INDEX_NAME", "posts"),
            ("SEARCH_MAX_RESULTS", "20"),
            ("OPENSEARCH_CONNECTION_MODE", "Fail-Fast"),
            ("REQUEST_TIMEOUT_SECS", "3"),
            ("GCS_BUCKET", "media"),
            ("GCS_BASE_URL", "http://localhost:4443"),
            ("GCS_ACCESS_TOKEN", "token"),
            ("PLACEHOLDER_AUTHOR", "jack"),
        ])
        .unwrap();

        assert_eq!(settings.server_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(settings.opensearch_url, "http://search:9200");
        assert_eq!(settings.index.index, "posts");
        assert_eq!(settings.index.max_results, 20);
        assert_eq!(settings.connection_mode, ConnectionMode::FailFast);
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
        assert_eq!(settings.gcs.bucket, "media");
        assert_eq!(settings.gcs.base_url, "http://localhost:4443");
        assert_eq!(
            settings.gcs.credentials,
            GcsCredentials::StaticToken("token".to_string())
        );
        assert_eq!(settings.placeholder_author, "jack");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            settings_from(&[("SERVER_PORT", "eighty")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            settings_from(&[("REQUEST_TIMEOUT_SECS", "0")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            settings_from(&[("SEARCH_MAX_RESULTS", "-5")]),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_gcs_credentials_selection() {
        let settings = settings_from(&[("GCS_ANONYMOUS", "true")]).unwrap();
        assert_eq!(settings.gcs.credentials, GcsCredentials::Anonymous);

        let settings =
            settings_from(&[("GCS_ANONYMOUS", "true"), ("GCS_ACCESS_TOKEN", "emulator")]).unwrap();
        assert_eq!(
            settings.gcs.credentials,
            GcsCredentials::StaticToken("emulator".to_string())
        );

        assert!(matches!(
            settings_from(&[("GCS_ANONYMOUS", "maybe")]),
            Err(AppError::ConfigError(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_ignores_unrelated_non_utf8_variables() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("AROUND_TEST_OPAQUE_BYTES", OsStr::from_bytes(&[0x66, 0x6f, 0xff]));
        let result = Settings::from_env();
        env::remove_var("AROUND_TEST_OPAQUE_BYTES");

        assert!(result.is_ok(), "got {:?}", result.err());
    }

    #[test]
    fn test_unknown_connection_mode_defaults_to_retry() {
        let settings = settings_from(&[("OPENSEARCH_CONNECTION_MODE", "sometimes")]).unwrap();
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
    }
}
