//! Webload service client.

use crate::config::{ClientConfig, SERVICE_NAMESPACE};
use crate::error::{Error, Result};
use crate::soap::{SoapCall, SoapCodec, SoapMessage};
use async_trait::async_trait;
use fecfile_mime::encoding::encode_base64;
use fecfile_mime::{Codec, XopCodec};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Longest response body excerpt kept in [`Error::HttpStatus`].
const STATUS_BODY_EXCERPT: usize = 512;

/// The two webload operations.
///
/// Both return the raw JSON text the service places in the `return` element.
#[async_trait]
pub trait WebloadService: Send + Sync {
    /// Uploads a report.
    ///
    /// `metadata` is the JSON submission request; `payload` is the raw report.
    async fn upload(&self, metadata: &str, payload: &[u8]) -> Result<String>;

    /// Fetches the current status of a submission.
    async fn status(&self, submission_id: &str) -> Result<String>;
}

/// SOAP client for the webload endpoint.
///
/// Responses may arrive plain or as XOP packages; requests are always sent
/// as plain `text/xml` with inline base64 payloads.
#[derive(Debug, Clone)]
pub struct WebloadClient {
    config: ClientConfig,
    http: Client,
    codec: XopCodec<SoapCodec>,
}

impl WebloadClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            config,
            http,
            codec: XopCodec::new(SoapCodec::new()),
        })
    }

    /// The client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs one SOAP call and returns the reply element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fault`] for SOAP faults, [`Error::HttpStatus`] for
    /// other non-success responses, and decoding errors for malformed bodies.
    pub async fn call(&self, request: SoapCall) -> Result<SoapCall> {
        let operation = request.operation.clone();
        let body = self.codec.encode(&SoapMessage::Call(request))?;
        debug!(operation = %operation, bytes = body.len(), "Sending webload request");

        let response = self
            .http
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, self.codec.content_type())
            .header("SOAPAction", "\"\"")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        debug!(
            operation = %operation,
            status = status.as_u16(),
            bytes = bytes.len(),
            "Received webload response"
        );

        let decoded = match content_type {
            Some(ct) if self.codec.supports(&ct) => {
                self.codec.decode(&bytes, self.config.max_header_bytes, &ct)
            }
            Some(ct) => Err(fecfile_mime::Error::UnsupportedContentType(ct).into()),
            None => Err(fecfile_mime::Error::MissingContentType.into()),
        };

        match decoded {
            Ok(SoapMessage::Fault(fault)) => Err(Error::Fault(fault)),
            Ok(SoapMessage::Call(reply)) if status.is_success() => expect_reply(&operation, reply),
            Err(e) if status.is_success() => Err(e),
            Ok(SoapMessage::Call(_)) | Err(_) => Err(status_error(status, &bytes)),
        }
    }

    async fn call_for_return(&self, request: SoapCall) -> Result<String> {
        let reply = self.call(request).await?;
        Ok(reply.part("return").unwrap_or_default().to_string())
    }
}

#[async_trait]
impl WebloadService for WebloadClient {
    async fn upload(&self, metadata: &str, payload: &[u8]) -> Result<String> {
        let request = SoapCall::new(SERVICE_NAMESPACE, "upload")
            .with_part("arg0", metadata)
            .with_part("arg1", encode_base64(payload));
        self.call_for_return(request).await
    }

    async fn status(&self, submission_id: &str) -> Result<String> {
        let request = SoapCall::new(SERVICE_NAMESPACE, "status").with_part("arg0", submission_id);
        self.call_for_return(request).await
    }
}

fn expect_reply(operation: &str, reply: SoapCall) -> Result<SoapCall> {
    let expected = format!("{operation}Response");
    if reply.operation == expected {
        Ok(reply)
    } else {
        Err(Error::UnexpectedResponse(format!(
            "Expected {expected}, got {}",
            reply.operation
        )))
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> Error {
    let text = String::from_utf8_lossy(body);
    Error::HttpStatus {
        status: status.as_u16(),
        body: text.chars().take(STATUS_BODY_EXCERPT).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_reply() {
        let reply = SoapCall::new(SERVICE_NAMESPACE, "uploadResponse");
        assert!(expect_reply("upload", reply.clone()).is_ok());
        assert!(matches!(
            expect_reply("status", reply),
            Err(Error::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_status_error_truncates_body() {
        let body = "x".repeat(2000);
        let Error::HttpStatus { status, body } =
            status_error(StatusCode::BAD_GATEWAY, body.as_bytes())
        else {
            panic!("expected status error");
        };
        assert_eq!(status, 502);
        assert_eq!(body.len(), STATUS_BODY_EXCERPT);
    }
}
