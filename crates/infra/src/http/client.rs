use std::time::Duration;

use openwowi_domain::constants::DEFAULT_TIMEOUT_SECS;
use openwowi_domain::WowiError;
use reqwest::blocking::{Client as ReqwestClient, RequestBuilder, Response};
use reqwest::Method;
use tracing::debug;

use crate::errors::InfraError;

/// Blocking HTTP client with timeout and user agent applied to every call.
///
/// Performs exactly one attempt per [`send`](Self::send); retry policy lives
/// in the request executor, which only ever retries after a token refresh.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, WowiError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    ///
    /// Only the URL path is logged; query strings carry the API key.
    pub fn send(&self, builder: RequestBuilder) -> Result<Response, WowiError> {
        let request = builder.build().map_err(|err| WowiError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, path = %path, "sending HTTP request");

        match self.client.execute(request) {
            Ok(response) => {
                let status = response.status();
                debug!(%method, path = %path, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, path = %path, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, WowiError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            WowiError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
    use reqwest::{Method, StatusCode};
    use tokio::runtime::Runtime;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn start_server(status: u16) -> (Runtime, MockServer) {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status).set_body_string("ok"))
                .mount(&server)
                .await;
            server
        });
        (rt, server)
    }

    #[test]
    fn sends_exactly_one_request_on_success() {
        let (rt, server) = start_server(200);

        let client = HttpClient::new().expect("http client");
        let response = client.send(client.request(Method::GET, server.uri())).expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let requests = rt.block_on(server.received_requests()).unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[test]
    fn server_errors_are_returned_not_retried() {
        let (rt, server) = start_server(500);

        let client = HttpClient::new().expect("http client");
        let response = client.send(client.request(Method::GET, server.uri())).expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let requests = rt.block_on(server.received_requests()).unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[test]
    fn default_headers_are_sent() {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(header("accept", "text/plain"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
        let client = HttpClient::builder()
            .user_agent("openwowi-test")
            .default_headers(headers)
            .build()
            .expect("http client");

        let response = client.send(client.request(Method::GET, server.uri())).expect("response");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        rt.block_on(server.verify());
    }

    #[test]
    fn network_failure_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = format!("http://{addr}");

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("http client");

        let result = client.send(client.request(Method::GET, &url));
        match result {
            Err(WowiError::Transport(msg)) => {
                assert!(msg.to_lowercase().contains("http"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
