//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use openwowi_domain::WowiError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WowiError);

impl From<InfraError> for WowiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WowiError> for InfraError {
    fn from(value: WowiError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoWowiError {
    fn into_wowi(self) -> WowiError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WowiError */
/* -------------------------------------------------------------------------- */

impl IntoWowiError for HttpError {
    fn into_wowi(self) -> WowiError {
        if self.is_timeout() {
            return WowiError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return WowiError::Transport(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            return WowiError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown status").to_string(),
                body: String::new(),
            };
        }

        if self.is_decode() {
            return WowiError::Decode(format!("HTTP body could not be decoded: {self}"));
        }

        if self.is_builder() {
            return WowiError::Validation(format!("HTTP request could not be built: {self}"));
        }

        WowiError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_wowi())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → WowiError */
/* -------------------------------------------------------------------------- */

impl IntoWowiError for IoError {
    fn into_wowi(self) -> WowiError {
        WowiError::Storage(format!("{:?}: {self}", self.kind()))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        Self(value.into_wowi())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError / toml::de::Error → WowiError */
/* -------------------------------------------------------------------------- */

impl IntoWowiError for url::ParseError {
    fn into_wowi(self) -> WowiError {
        WowiError::Config(format!("invalid URL: {self}"))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        Self(value.into_wowi())
    }
}

impl IntoWowiError for toml::de::Error {
    fn into_wowi(self) -> WowiError {
        WowiError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(value.into_wowi())
    }
}

/// Shorthand for `map_err` chains: route any convertible error through
/// [`InfraError`] into the domain error.
pub(crate) fn to_wowi<E>(err: E) -> WowiError
where
    InfraError: From<E>,
{
    InfraError::from(err).into()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::net::TcpListener;

    use reqwest::blocking::Client;
    use reqwest::StatusCode;
    use tokio::runtime::Runtime;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn connection_refused_maps_to_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().unwrap_err();

        let mapped: WowiError = InfraError::from(error).into();
        match mapped {
            WowiError::Transport(msg) => assert!(msg.to_lowercase().contains("connection")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn http_status_maps_to_api_error() {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(StatusCode::NOT_FOUND))
                .mount(&server)
                .await;
            server
        });

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().unwrap().error_for_status().unwrap_err();

        let mapped: WowiError = InfraError::from(error).into();
        match mapped {
            WowiError::Api { status, reason, .. } => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn io_errors_map_to_storage_errors() {
        let err = IoError::new(ErrorKind::NotFound, "cache file missing");
        let mapped = to_wowi(err);
        match mapped {
            WowiError::Storage(msg) => assert!(msg.contains("cache file missing")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn url_errors_map_to_config_errors() {
        let err = url::Url::parse("not a url").unwrap_err();
        assert_eq!(to_wowi(err).category(), "config");
    }
}
