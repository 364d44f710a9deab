//! Webload endpoint configuration.

use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Production webload SOAP endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://efoservices.fec.gov/webload/services/upload";

/// Namespace of the webload operation elements.
pub const SERVICE_NAMESPACE: &str = "http://service.webload.efo.fec.gov/";

/// Default per-request timeout. Large reports upload slowly.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default limit on the size of a response's SOAP header.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 1024;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// SOAP endpoint URL.
    pub endpoint: Url,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
    /// Largest accepted SOAP header, in bytes.
    pub max_header_bytes: usize,
}

impl ClientConfig {
    /// Creates a configuration for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or not HTTP(S).
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        let endpoint = Url::parse(endpoint.as_ref())?;
        match endpoint.scheme() {
            "https" => {}
            "http" => tracing::warn!(%endpoint, "Webload endpoint is not using TLS"),
            other => {
                return Err(Error::InvalidConfig(format!(
                    "Unsupported endpoint scheme: {other}"
                )));
            }
        }

        Ok(Self {
            endpoint,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
        })
    }

    /// Configuration for the production FEC endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn fec() -> Result<Self> {
        Self::new(DEFAULT_ENDPOINT)
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the SOAP header size limit.
    #[must_use]
    pub const fn with_max_header_bytes(mut self, limit: usize) -> Self {
        self.max_header_bytes = limit;
        self
    }
}
