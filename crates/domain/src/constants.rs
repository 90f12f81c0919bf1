//! Protocol constants
//!
//! Centralized location for the values the OPENWOWI protocol pins down.

/// Largest page the resource endpoints accept, and the page size used by
/// full-collection fetches.
pub const PAGE_SIZE: u32 = 100;

/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: u32 = 1;

/// Total attempts per request: the initial call plus one retry after a token
/// refresh.
pub const MAX_REQUEST_ATTEMPTS: usize = 2;

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v1.2";

/// Path of the OAuth2 token endpoint relative to the host.
pub const TOKEN_PATH: &str = "oauth2/token";

/// Path prefix of every resource endpoint relative to the host.
pub const RESOURCE_PREFIX: &str = "openwowi";

/// Expiry of the transport-level response cache (3 hours).
pub const DEFAULT_RESPONSE_CACHE_TTL_SECS: u64 = 10_800;

/// Entry bound of the transport-level response cache.
pub const DEFAULT_RESPONSE_CACHE_MAX_CAPACITY: u64 = 10_000;

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "apiKey";

/// Natural-person gender id meaning "not specified"; persons carrying it are
/// treated as legal persons.
pub const GENDER_NOT_SPECIFIED_ID: i64 = 3;

/// Communication type names used by the phone and e-mail matchers.
pub const COMMUNICATION_LANDLINE: &str = "Festnetz";
/// See [`COMMUNICATION_LANDLINE`].
pub const COMMUNICATION_MOBILE: &str = "Handynummer";
/// See [`COMMUNICATION_LANDLINE`].
pub const COMMUNICATION_EMAIL: &str = "E-Mail";
