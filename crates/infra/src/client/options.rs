use crate::api::QueryParams;

/// How a collection accessor obtains its records.
///
/// Modes are checked in order: `use_cache`, then `fetch_all`, then a single
/// page honoring `limit` and `offset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Page size for single-page reads; the server default of 100 applies
    /// when unset.
    pub limit: Option<u32>,
    pub offset: u32,
    /// Sent last, so they override default include flags and filters.
    pub extra_params: QueryParams,
    pub fetch_all: bool,
    pub use_cache: bool,
    /// Skip the transport-level response cache.
    pub bypass_cache: bool,
}

impl ListOptions {
    /// One page of `limit` records starting at `offset`.
    pub fn page(limit: u32, offset: u32) -> Self {
        Self { limit: Some(limit), offset, ..Self::default() }
    }

    /// Every record, merged across pages.
    pub fn all() -> Self {
        Self { fetch_all: true, ..Self::default() }
    }

    /// Answer from the in-memory cache slot only.
    pub fn cached() -> Self {
        Self { use_cache: true, ..Self::default() }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra_params.insert(key, value);
        self
    }

    #[must_use]
    pub const fn bypassing_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }
}
