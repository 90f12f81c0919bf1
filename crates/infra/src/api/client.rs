//! Request executor for OPENWOWI resource endpoints
//!
//! One [`ApiClient::execute`] call is one logical request: paging defaults
//! and bounds are applied, the API key and bearer token are attached, and a
//! 401 answer triggers a single token refresh followed by exactly one retry.
//! Transport failures and every other non-2xx status are surfaced as typed
//! errors without any retry.

use openwowi_domain::constants::{API_KEY_PARAM, MAX_REQUEST_ATTEMPTS, MIN_PAGE_SIZE, PAGE_SIZE};
use openwowi_domain::{ApiResponse, Result, WowiError};
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::auth::{Credentials, TokenManager};
use super::params::QueryParams;
use crate::config::ClientConfig;
use crate::errors::conversions::to_wowi;
use crate::http::{CachedResponse, HttpClient, ResponseCache};

/// Description of one resource call. Immutable for the duration of a call;
/// only the page merger varies `offset` between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below `/openwowi/{version}/`; a leading `/` is ignored.
    pub endpoint: String,
    /// Query parameters; the API key is added at send time.
    pub params: QueryParams,
    /// JSON body for write requests.
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self { method, endpoint: endpoint.into(), params: QueryParams::new(), body: None }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Executes resource requests.
///
/// Implemented by [`ApiClient`]; the page merger and the accessors only
/// depend on this trait so they can be driven by scripted executors in tests.
pub trait RequestExecutor {
    /// Perform one logical request. `bypass_cache` skips the transport-level
    /// response cache for this call, both lookup and store.
    fn execute(&mut self, request: &ApiRequest, bypass_cache: bool) -> Result<ApiResponse>;
}

/// Blocking client for the OPENWOWI resource endpoints.
pub struct ApiClient {
    http: HttpClient,
    tokens: TokenManager,
    resource_base: Url,
    api_key: String,
    response_cache: Option<ResponseCache>,
}

impl ApiClient {
    /// Assemble a client from its parts. No request is made.
    pub fn new(
        http: HttpClient,
        tokens: TokenManager,
        resource_base: Url,
        api_key: impl Into<String>,
        response_cache: Option<ResponseCache>,
    ) -> Self {
        Self { http, tokens, resource_base, api_key: api_key.into(), response_cache }
    }

    /// Build transport, token manager and response cache from configuration.
    /// Call [`login`](Self::login) before issuing requests.
    ///
    /// # Errors
    ///
    /// `WowiError::Config` for an invalid base URL; transport setup errors
    /// otherwise.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        let base = config.base_url()?;
        let tokens = TokenManager::new(
            http.clone(),
            &base,
            Credentials::new(config.username.clone(), config.password.clone()),
        )?;
        let response_cache =
            config.response_cache.enabled.then(|| ResponseCache::new(&config.response_cache));

        Ok(Self::new(http, tokens, config.resource_base()?, config.api_key.clone(), response_cache))
    }

    /// Obtain the initial token pair.
    pub fn login(&mut self) -> Result<()> {
        self.tokens.login()
    }

    /// Token manager holding the current pair.
    pub const fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Transport-level response cache, if enabled.
    pub const fn response_cache(&self) -> Option<&ResponseCache> {
        self.response_cache.as_ref()
    }

    /// `GET {endpoint}`.
    pub fn get(&mut self, endpoint: &str, params: QueryParams, bypass_cache: bool) -> Result<ApiResponse> {
        self.execute(&ApiRequest::get(endpoint).with_params(params), bypass_cache)
    }

    /// `POST {endpoint}` with an optional JSON body.
    pub fn post(&mut self, endpoint: &str, params: QueryParams, body: Option<Value>) -> Result<ApiResponse> {
        self.execute(&with_optional_body(ApiRequest::post(endpoint).with_params(params), body), false)
    }

    /// `PUT {endpoint}` with an optional JSON body.
    pub fn put(&mut self, endpoint: &str, params: QueryParams, body: Option<Value>) -> Result<ApiResponse> {
        self.execute(&with_optional_body(ApiRequest::put(endpoint).with_params(params), body), false)
    }

    /// `DELETE {endpoint}` with an optional JSON body.
    pub fn delete(&mut self, endpoint: &str, params: QueryParams, body: Option<Value>) -> Result<ApiResponse> {
        self.execute(&with_optional_body(ApiRequest::delete(endpoint).with_params(params), body), false)
    }

    fn send_once(&self, request: &ApiRequest, url: &Url, params: &QueryParams) -> Result<reqwest::blocking::Response> {
        let query: Vec<(&String, &String)> = params.iter().collect();
        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .query(&query)
            .bearer_auth(self.tokens.access_token()?)
            .header(ACCEPT, "text/plain");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        self.http.send(builder)
    }
}

impl RequestExecutor for ApiClient {
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    fn execute(&mut self, request: &ApiRequest, bypass_cache: bool) -> Result<ApiResponse> {
        let mut params = request.params.clone();
        if request.method == Method::GET {
            apply_page_bounds(&mut params)?;
        }

        let url = resource_url(&self.resource_base, &request.endpoint)?;

        let cache_key = match &self.response_cache {
            Some(_) if request.method == Method::GET && !bypass_cache => {
                Some(ResponseCache::key(request.method.as_str(), url.as_str(), &params))
            }
            _ => None,
        };
        if let (Some(cache), Some(key)) = (&self.response_cache, &cache_key) {
            if let Some(hit) = cache.get(key) {
                debug!("response cache hit");
                return Ok(ApiResponse::from_body(hit.status, hit.reason, hit.body));
            }
        }

        params.insert(API_KEY_PARAM, &self.api_key);

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            let response = self.send_once(request, &url, &params)?;
            if response.status() == StatusCode::UNAUTHORIZED && attempt < MAX_REQUEST_ATTEMPTS {
                warn!(attempt, "access token rejected; refreshing and retrying once");
                self.tokens.refresh()?;
                continue;
            }
            break response;
        };

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let text = response.text().map_err(to_wowi)?;

        if !status.is_success() {
            match serde_json::from_str::<Value>(&text) {
                Ok(details) => debug!(status = status.as_u16(), %details, "error response body"),
                Err(_) => debug!(status = status.as_u16(), "error response body is not JSON"),
            }
            error!(status = status.as_u16(), %reason, attempts = attempt, "resource call failed");
            return Err(WowiError::Api { status: status.as_u16(), reason, body: text });
        }

        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return Ok(ApiResponse::empty(status.as_u16(), reason));
        }

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| WowiError::Decode(format!("bad JSON in response: {e}")))?;

        if let (Some(cache), Some(key)) = (&self.response_cache, cache_key) {
            cache.insert(key, CachedResponse { status: status.as_u16(), reason: reason.clone(), body: body.clone() });
        }

        Ok(ApiResponse::from_body(status.as_u16(), reason, body))
    }
}

/// Default `limit` to a full page, reject limits outside `1..=100` and
/// default `offset` to zero.
fn apply_page_bounds(params: &mut QueryParams) -> Result<()> {
    match params.limit()? {
        None => params.insert(QueryParams::LIMIT, PAGE_SIZE),
        Some(limit) if !(i64::from(MIN_PAGE_SIZE)..=i64::from(PAGE_SIZE)).contains(&limit) => {
            return Err(WowiError::Validation(format!(
                "limit must be between {MIN_PAGE_SIZE} and {PAGE_SIZE}, got {limit}"
            )));
        }
        Some(_) => {}
    }
    if !params.contains(QueryParams::OFFSET) {
        params.insert(QueryParams::OFFSET, 0);
    }
    Ok(())
}

/// Join `endpoint` below the versioned resource root. A leading `/` would
/// make the join absolute and drop the root, so it is stripped.
fn resource_url(resource_base: &Url, endpoint: &str) -> Result<Url> {
    resource_base.join(endpoint.trim_start_matches('/')).map_err(to_wowi)
}

fn with_optional_body(request: ApiRequest, body: Option<Value>) -> ApiRequest {
    match body {
        Some(body) => request.with_body(body),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_defaults_to_a_full_page() {
        let mut params = QueryParams::new();
        apply_page_bounds(&mut params).unwrap();
        assert_eq!(params.get("limit"), Some("100"));
        assert_eq!(params.get("offset"), Some("0"));
    }

    #[test]
    fn limits_outside_bounds_fail_validation() {
        for limit in [0, -5, 101, 1000] {
            let mut params = QueryParams::new().with("limit", limit);
            let err = apply_page_bounds(&mut params).unwrap_err();
            assert!(matches!(err, WowiError::Validation(_)), "limit {limit}");
        }
    }

    #[test]
    fn explicit_offset_is_kept() {
        let mut params = QueryParams::new().with("limit", 1).with("offset", 300);
        apply_page_bounds(&mut params).unwrap();
        assert_eq!(params.get("limit"), Some("1"));
        assert_eq!(params.get("offset"), Some("300"));
    }

    #[test]
    fn endpoints_stay_below_the_resource_root() {
        let base = Url::parse("https://customer.wowiport.de/openwowi/v1.2/").unwrap();
        for endpoint in ["PersonsRead/Persons", "/PersonsRead/Persons", "//PersonsRead/Persons"] {
            assert_eq!(
                resource_url(&base, endpoint).unwrap().as_str(),
                "https://customer.wowiport.de/openwowi/v1.2/PersonsRead/Persons",
                "endpoint {endpoint}"
            );
        }
    }

    #[test]
    fn request_builders_set_method_and_body() {
        let request = ApiRequest::post("CommunicationEdit/Ticket").with_body(serde_json::json!({"Subject": "x"}));
        assert_eq!(request.method, Method::POST);
        assert!(request.body.is_some());
        assert_eq!(with_optional_body(ApiRequest::delete("x"), None).body, None);
    }
}
