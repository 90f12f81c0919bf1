//! Client settings

use std::fmt;
use std::time::Duration;

use openwowi_domain::constants::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS, RESOURCE_PREFIX};
use openwowi_domain::{Result, WowiError};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::conversions::to_wowi;
use crate::http::response_cache::duration_secs;
use crate::http::ResponseCacheConfig;

/// Everything needed to connect to one OPENWOWI installation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme and host, e.g. `https://customer.wowiport.de`
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub api_key: String,
    /// OPENWOWI API version segment
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// HTTP timeout, in seconds when read from a file
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    #[serde(default)]
    pub response_cache: ResponseCacheConfig,
}

fn default_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_user_agent() -> String {
    format!("openwowi-rs/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

impl ClientConfig {
    /// Settings for an explicit base URL, everything else defaulted.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            api_key: api_key.into(),
            version: default_version(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            response_cache: ResponseCacheConfig::default(),
        }
    }

    /// Settings for `https://{host}`.
    pub fn for_host(
        host: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::new(format!("https://{host}"), username, password, api_key)
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_response_cache(mut self, response_cache: ResponseCacheConfig) -> Self {
        self.response_cache = response_cache;
        self
    }

    /// Base URL with a trailing slash so that relative joins append.
    ///
    /// # Errors
    ///
    /// `WowiError::Config` if the URL does not parse or is not HTTP(S).
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.base_url.trim_end_matches('/');
        let url = Url::parse(&format!("{raw}/")).map_err(to_wowi)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(WowiError::Config(format!(
                "base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// `{base_url}/openwowi/{version}/`, the root every endpoint is joined to.
    pub fn resource_base(&self) -> Result<Url> {
        let version = self.version.trim_matches('/');
        self.base_url()?.join(&format!("{RESOURCE_PREFIX}/{version}/")).map_err(to_wowi)
    }

    /// Check that the required settings are present.
    ///
    /// # Errors
    ///
    /// `WowiError::Config` naming the first missing setting.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("base_url", &self.base_url),
            ("username", &self.username),
            ("password", &self.password),
            ("api_key", &self.api_key),
            ("version", &self.version),
        ] {
            if value.trim().is_empty() {
                return Err(WowiError::Config(format!("missing required setting: {name}")));
            }
        }
        self.resource_base().map(|_| ())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("version", &self.version)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("response_cache", &self.response_cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_host_builds_https_urls() {
        let config = ClientConfig::for_host("customer.wowiport.de", "u", "p", "k");

        assert_eq!(config.base_url().unwrap().as_str(), "https://customer.wowiport.de/");
        assert_eq!(
            config.resource_base().unwrap().as_str(),
            "https://customer.wowiport.de/openwowi/v1.2/"
        );
        assert_eq!(
            config.base_url().unwrap().join("oauth2/token").unwrap().as_str(),
            "https://customer.wowiport.de/oauth2/token"
        );
    }

    #[test]
    fn resource_base_keeps_configured_version_and_path() {
        let config = ClientConfig::new("http://127.0.0.1:8080/", "u", "p", "k").with_version("v1.3");
        assert_eq!(config.resource_base().unwrap().as_str(), "http://127.0.0.1:8080/openwowi/v1.3/");
    }

    #[test]
    fn validation_names_missing_setting() {
        let err = ClientConfig::for_host("h", "u", "", "k").validate().unwrap_err();
        assert_eq!(err, WowiError::Config("missing required setting: password".into()));

        let err = ClientConfig::new("ftp://h", "u", "p", "k").validate().unwrap_err();
        assert!(matches!(err, WowiError::Config(_)));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", ClientConfig::for_host("h", "user", "pw-secret", "key-secret"));
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("pw-secret"));
        assert!(!rendered.contains("key-secret"));
    }
}
