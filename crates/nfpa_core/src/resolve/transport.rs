//! Network boundary for identifier providers.
//!
//! # Responsibility
//! - Execute one provider request and return the raw response body.
//!
//! # Invariants
//! - Timeouts and transport failures surface as `TransportError`, which the
//!   resolver counts as an "unavailable" vote.

use crate::resolve::provider::ProviderRequest;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[cfg(feature = "http")]
pub use self::http::HttpTransport;

/// Transport-level failure of one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Timeout,
    Status(u16),
    Io(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "unexpected HTTP status {code}"),
            Self::Io(message) => write!(f, "transport error: {message}"),
        }
    }
}

impl Error for TransportError {}

/// Executes provider requests.
pub trait Transport: Send + Sync {
    fn fetch(&self, request: &ProviderRequest) -> Result<String, TransportError>;
}

/// Canned URL → body transport for offline runs and tests.
///
/// Unknown URLs answer `Status(404)`.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    responses: HashMap<String, Result<String, TransportError>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Ok(body.into()));
        self
    }

    pub fn with_error(mut self, url: impl Into<String>, error: TransportError) -> Self {
        self.responses.insert(url.into(), Err(error));
        self
    }
}

impl Transport for StaticTransport {
    fn fetch(&self, request: &ProviderRequest) -> Result<String, TransportError> {
        self.responses
            .get(&request.url)
            .cloned()
            .unwrap_or(Err(TransportError::Status(404)))
    }
}

#[cfg(feature = "http")]
mod http {
    use super::{Transport, TransportError};
    use crate::resolve::provider::ProviderRequest;
    use std::time::Duration;

    /// Blocking HTTP GET transport.
    pub struct HttpTransport {
        client: reqwest::blocking::Client,
    }

    impl HttpTransport {
        pub fn new(timeout: Duration) -> Result<Self, TransportError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|err| TransportError::Io(err.to_string()))?;
            Ok(Self { client })
        }
    }

    impl Transport for HttpTransport {
        fn fetch(&self, request: &ProviderRequest) -> Result<String, TransportError> {
            let response = self
                .client
                .get(&request.url)
                .send()
                .map_err(map_reqwest_error)?;
            if !response.status().is_success() {
                return Err(TransportError::Status(response.status().as_u16()));
            }
            response.text().map_err(map_reqwest_error)
        }
    }

    fn map_reqwest_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Io(err.to_string())
        }
    }
}
