//! OAuth2 token management
//!
//! Owns the access/refresh token pair of one client instance and performs
//! the two token exchanges the OPENWOWI token endpoint supports: the password
//! grant (login) and the refresh-token grant. Tokens live only in memory;
//! nothing is persisted across process restarts.

use std::fmt;

use openwowi_domain::constants::TOKEN_PATH;
use openwowi_domain::{Result, WowiError};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::errors::conversions::to_wowi;
use crate::http::HttpClient;

/// Access/refresh token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Username/password used for the password grant.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful token exchange.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Holder of the token pair plus the two exchanges that mint it.
pub struct TokenManager {
    http: HttpClient,
    token_url: Url,
    credentials: Credentials,
    tokens: Option<TokenPair>,
}

impl TokenManager {
    /// Create a manager for the token endpoint below `base_url`
    /// (`{base_url}/oauth2/token`). No request is made until
    /// [`login`](Self::login).
    pub fn new(http: HttpClient, base_url: &Url, credentials: Credentials) -> Result<Self> {
        let token_url = base_url.join(TOKEN_PATH).map_err(to_wowi)?;
        Ok(Self { http, token_url, credentials, tokens: None })
    }

    /// Exchange username and password for a fresh token pair.
    ///
    /// # Errors
    ///
    /// `WowiError::Auth` on any non-2xx answer, `Transport` when the endpoint
    /// cannot be reached and `Decode` when the body lacks the tokens.
    #[instrument(skip(self), fields(username = %self.credentials.username))]
    pub fn login(&mut self) -> Result<()> {
        info!("logging in");
        let form = [
            ("grant_type", "password"),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];
        let response = self.exchange(&form)?;

        let refresh_token = response.refresh_token.ok_or_else(|| {
            WowiError::Decode("token response lacks refresh_token".to_string())
        })?;
        self.tokens = Some(TokenPair { access_token: response.access_token, refresh_token });
        debug!("login succeeded");
        Ok(())
    }

    /// Exchange the held refresh token for a new pair.
    ///
    /// A response without a new refresh token keeps the old one.
    ///
    /// # Errors
    ///
    /// `WowiError::Config` when no token pair is held yet, otherwise the same
    /// errors as [`login`](Self::login).
    #[instrument(skip(self))]
    pub fn refresh(&mut self) -> Result<()> {
        let current = self.tokens.as_ref().ok_or_else(|| {
            WowiError::Config("no refresh token held; log in first".to_string())
        })?;
        info!("refreshing access token");

        let form = [("grant_type", "refresh_token"), ("refresh_token", current.refresh_token.as_str())];
        let response = self.exchange(&form)?;

        let refresh_token = match response.refresh_token {
            Some(token) => token,
            None => {
                warn!("refresh response carried no refresh_token; keeping the previous one");
                current.refresh_token.clone()
            }
        };
        self.tokens = Some(TokenPair { access_token: response.access_token, refresh_token });
        Ok(())
    }

    /// Current bearer token.
    ///
    /// # Errors
    ///
    /// `WowiError::Config` before the first successful login.
    pub fn access_token(&self) -> Result<&str> {
        self.tokens
            .as_ref()
            .map(|t| t.access_token.as_str())
            .ok_or_else(|| WowiError::Config("no access token held; log in first".to_string()))
    }

    /// Held token pair, if logged in.
    pub const fn tokens(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    fn exchange(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let request = self
            .http
            .request(Method::POST, self.token_url.clone())
            .header(ACCEPT, "text/plain")
            .form(form);
        let response = self.http.send(request)?;

        let status = response.status();
        let body = response.text().map_err(to_wowi)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "token endpoint rejected the exchange");
            return Err(WowiError::Auth { status: status.as_u16(), body });
        }

        serde_json::from_str(&body)
            .map_err(|e| WowiError::Decode(format!("invalid token response: {e}")))
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_url", &self.token_url.as_str())
            .field("credentials", &self.credentials)
            .field("logged_in", &self.tokens.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Runtime;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn manager(server: &MockServer) -> TokenManager {
        let base = Url::parse(&format!("{}/", server.uri())).unwrap();
        TokenManager::new(HttpClient::new().unwrap(), &base, Credentials::new("api-user", "s3cret"))
            .unwrap()
    }

    #[test]
    fn login_then_refresh_rotates_tokens() {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/oauth2/token"))
                .and(body_string_contains("grant_type=password"))
                .and(body_string_contains("username=api-user"))
                .respond_with(ResponseTemplate::new(200).set_body_json(
                    serde_json::json!({"access_token": "a1", "refresh_token": "r1"}),
                ))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/oauth2/token"))
                .and(body_string_contains("grant_type=refresh_token"))
                .and(body_string_contains("refresh_token=r1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(
                    serde_json::json!({"access_token": "a2", "refresh_token": "r2"}),
                ))
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let mut tokens = manager(&server);
        tokens.login().unwrap();
        assert_eq!(tokens.access_token().unwrap(), "a1");

        tokens.refresh().unwrap();
        assert_eq!(tokens.access_token().unwrap(), "a2");
        assert_eq!(tokens.tokens().map(|t| t.refresh_token.as_str()), Some("r2"));

        rt.block_on(server.verify());
    }

    #[test]
    fn rejected_login_is_a_fatal_auth_error() {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/oauth2/token"))
                .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
                .mount(&server)
                .await;
            server
        });

        let err = manager(&server).login().unwrap_err();

        assert_eq!(err, WowiError::Auth { status: 400, body: "invalid_grant".into() });
        assert!(err.is_fatal_auth());
    }

    #[test]
    fn refresh_without_login_is_a_config_error() {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());

        let err = manager(&server).refresh().unwrap_err();
        assert!(matches!(err, WowiError::Config(_)));
    }

    #[test]
    fn refresh_keeps_old_refresh_token_when_none_is_returned() {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(body_string_contains("grant_type=password"))
                .respond_with(ResponseTemplate::new(200).set_body_json(
                    serde_json::json!({"access_token": "a1", "refresh_token": "r1"}),
                ))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(body_string_contains("grant_type=refresh_token"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "a2"})),
                )
                .mount(&server)
                .await;
            server
        });

        let mut tokens = manager(&server);
        tokens.login().unwrap();
        tokens.refresh().unwrap();

        let pair = tokens.tokens().unwrap();
        assert_eq!(pair.access_token, "a2");
        assert_eq!(pair.refresh_token, "r1");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let pair = TokenPair { access_token: "a1".into(), refresh_token: "r1".into() };
        let rendered = format!("{pair:?} {:?}", Credentials::new("u", "pw"));
        assert!(!rendered.contains("a1"));
        assert!(!rendered.contains("pw"));
    }
}
