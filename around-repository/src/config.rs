//! Configuration types for the repository service facades.

use std::time::Duration;

/// Default time budget for a single call to an external store.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the SearchIndexService.
#[derive(Debug, Clone)]
pub struct SearchIndexServiceConfig {
    /// Upper bound on any single search index call. A call that exceeds it
    /// fails with `SearchIndexError::Timeout`.
    pub request_timeout: Duration,
}

impl Default for SearchIndexServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SearchIndexServiceConfig {
    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

/// Configuration for the MediaService.
#[derive(Debug, Clone)]
pub struct MediaServiceConfig {
    /// Upper bound on a whole upload (write, ACL change and read-back) or delete.
    pub request_timeout: Duration,
}

impl Default for MediaServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl MediaServiceConfig {
    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}
