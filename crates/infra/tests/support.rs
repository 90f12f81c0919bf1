//! Shared harness for tests against a stub OPENWOWI server.
//!
//! The client under test is blocking, so the mock server runs on its own
//! multi-threaded tokio runtime while the test thread issues the calls.

use openwowi_infra::{ClientConfig, ResponseCacheConfig, WowiClient};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "key-123";
pub const RESOURCE_ROOT: &str = "/openwowi/v1.2";

pub struct Harness {
    pub rt: Runtime,
    pub server: MockServer,
}

impl Harness {
    /// Start a server answering both token grants. The password grant issues
    /// `access-1`/`refresh-1`, the refresh grant `access-2`/`refresh-2`.
    pub fn start() -> Self {
        let rt = Runtime::new().expect("tokio runtime should start");
        let server = rt.block_on(MockServer::start());
        let harness = Self { rt, server };

        harness.mount(
            Mock::given(method("POST"))
                .and(path("/oauth2/token"))
                .and(body_string_contains("grant_type=password"))
                .respond_with(token_response("access-1", "refresh-1")),
        );
        harness.mount(
            Mock::given(method("POST"))
                .and(path("/oauth2/token"))
                .and(body_string_contains("grant_type=refresh_token"))
                .respond_with(token_response("access-2", "refresh-2")),
        );
        harness
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    /// Settings pointing at the stub server, response cache off.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.server.uri(), "user", "secret", API_KEY)
            .with_response_cache(ResponseCacheConfig::disabled())
    }

    pub fn connect(&self) -> WowiClient {
        WowiClient::connect(&self.config()).expect("client should connect")
    }

    pub fn connect_with(&self, config: &ClientConfig) -> WowiClient {
        WowiClient::connect(config).expect("client should connect")
    }

    /// Requests received so far whose path ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<Request> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().ends_with(suffix))
            .collect()
    }

    pub fn verify(&self) {
        self.rt.block_on(self.server.verify());
    }
}

pub fn resource_path(endpoint: &str) -> String {
    format!("{RESOURCE_ROOT}/{endpoint}")
}

pub fn token_response(access: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer",
        "expires_in": 3600
    }))
}

/// `count` use unit records with ids starting at `first_id`.
pub fn use_unit_page(first_id: i64, count: usize) -> Value {
    let records: Vec<Value> = (0..count as i64)
        .map(|i| {
            let id = first_id + i;
            json!({
                "Id": id,
                "IdNum": format!("001.01.{id:04}"),
                "BuildingLand": {"Id": 10, "IdNum": "001.01"},
                "EconomicUnit": {"Id": 1, "IdNum": "001"}
            })
        })
        .collect();
    Value::Array(records)
}

/// Value of one query parameter of a received request.
pub fn query_value(request: &Request, key: &str) -> Option<String> {
    request.url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}
