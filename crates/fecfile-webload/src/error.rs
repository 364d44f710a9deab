//! Error types for webload service calls.

use crate::soap::SoapFault;

/// Result type alias for webload operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Webload error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status without a SOAP fault.
    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        /// Status code returned by the service.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// Wire-level decoding error.
    #[error("MIME error: {0}")]
    Mime(#[from] fecfile_mime::Error),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Failure writing an envelope.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SOAP fault returned by the service.
    #[error("SOAP fault {}: {}", .0.code, .0.message)]
    Fault(SoapFault),

    /// SOAP header section larger than allowed.
    #[error("SOAP header is {size} bytes, limit is {limit}")]
    HeaderTooLarge {
        /// Size of the header element.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Response is well-formed but not what the operation returns.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}
