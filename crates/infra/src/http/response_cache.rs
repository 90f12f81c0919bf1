//! Transport-level response cache with moka
//!
//! Read-through cache of successful GET responses, keyed by the request
//! signature (method, URL and sorted query parameters). Entries expire after a
//! fixed time-to-live; there is no explicit invalidation besides
//! [`ResponseCache::invalidate_all`].
//!
//! # Example
//!
//! ```rust,ignore
//! use openwowi_infra::http::{ResponseCache, ResponseCacheConfig};
//!
//! let cache = ResponseCache::new(&ResponseCacheConfig::default());
//! let key = ResponseCache::key("GET", &url, &params);
//! if let Some(hit) = cache.get(&key) {
//!     // serve hit.body without a network call
//! }
//! ```

use std::time::Duration;

use moka::sync::Cache;
use openwowi_domain::constants::{
    DEFAULT_RESPONSE_CACHE_MAX_CAPACITY, DEFAULT_RESPONSE_CACHE_TTL_SECS,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseCacheConfig {
    /// Whether GET responses are cached at all
    pub enabled: bool,

    /// Time-to-live for cache entries
    #[serde(with = "duration_secs")]
    pub ttl: Duration,

    /// Maximum number of cached responses
    pub max_capacity: u64,
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(DEFAULT_RESPONSE_CACHE_TTL_SECS),
            max_capacity: DEFAULT_RESPONSE_CACHE_MAX_CAPACITY,
        }
    }
}

impl ResponseCacheConfig {
    /// Create config with custom TTL (useful for testing)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, ..Self::default() }
    }

    /// Config with caching switched off.
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Log configuration at startup
    pub fn log_config(&self) {
        tracing::info!(
            enabled = self.enabled,
            ttl_seconds = self.ttl.as_secs(),
            max_capacity = self.max_capacity,
            "Response cache configuration loaded"
        );
    }
}

/// Successful response kept by the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub reason: String,
    pub body: Value,
}

/// In-memory cache of successful GET responses.
pub struct ResponseCache {
    entries: Cache<String, CachedResponse>,
}

impl ResponseCache {
    /// Create a cache from its configuration.
    pub fn new(config: &ResponseCacheConfig) -> Self {
        config.log_config();
        let entries =
            Cache::builder().time_to_live(config.ttl).max_capacity(config.max_capacity).build();
        Self { entries }
    }

    /// Request signature: method, URL and query parameters in key order.
    ///
    /// `params` must already be sorted by key, as a `BTreeMap` iteration is.
    pub fn key<'a, I>(method: &str, url: &str, params: I) -> String
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let query = params
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{method} {url}?{query}")
    }

    /// Cached response for a signature, if present and not expired.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        self.entries.get(key)
    }

    /// Store a response. Callers only store 2xx responses.
    pub fn insert(&self, key: String, response: CachedResponse) {
        self.entries.insert(key, response);
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }

    /// Approximate number of cached responses.
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
