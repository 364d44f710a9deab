//! Report upload.

use super::model::{SubmissionRequest, SubmissionResponse};
use crate::config::Config;
use crate::error::Result;
use fecfile_webload::WebloadService;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Splits a `;`-separated list into the two notification addresses.
///
/// Addresses after the second are ignored.
#[must_use]
pub fn split_notification_emails(emails: &str) -> (String, String) {
    let mut parts = emails.split(';');
    let first = parts.next().unwrap_or_default().to_string();
    let second = parts.next().unwrap_or_default().to_string();
    (first, second)
}

/// Uploads report files to the webload service.
pub struct Submitter<S: ?Sized> {
    service: Arc<S>,
    config: Config,
}

impl<S: WebloadService + ?Sized> Submitter<S> {
    /// Creates a submitter.
    #[must_use]
    pub const fn new(service: Arc<S>, config: Config) -> Self {
        Self { service, config }
    }

    /// Uploads the report at `path`.
    ///
    /// An empty reply becomes the "unknown status" ERROR response.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the call fails, or the
    /// reply is not a response object.
    pub async fn submit(
        &self,
        path: impl AsRef<Path>,
        notification_emails: &str,
        committee_id: &str,
        password: &str,
    ) -> Result<SubmissionResponse> {
        let payload = tokio::fs::read(path.as_ref()).await?;
        let (email1, email2) = split_notification_emails(notification_emails);

        let request = SubmissionRequest {
            committee_id: committee_id.to_string(),
            password: password.to_string(),
            api_key: self.config.api_key().to_string(),
            email1,
            email2,
            agency_id: self.config.agency_id().to_string(),
            amendment_id: String::new(),
        };

        info!(
            request = ?request,
            payload_bytes = payload.len(),
            "Sending report to fec.gov"
        );
        let metadata = serde_json::to_string(&request)?;
        let reply = self.service.upload(&metadata, &payload).await?;

        let response =
            SubmissionResponse::from_wire(&reply)?.unwrap_or_else(SubmissionResponse::unknown_status);
        info!(response = ?response, "Upload to fec.gov complete");
        Ok(response)
    }
}
