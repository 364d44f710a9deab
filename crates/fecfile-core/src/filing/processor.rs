//! End-to-end filing of one report.

use super::model::{FilingJob, FilingStatus};
use super::source::{FileSource, FilingStore};
use crate::error::Result;
use crate::status::StatusPoller;
use crate::submission::{SubmissionResponse, Submitter};
use fecfile_webload::WebloadService;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs the filing workflow: fetch, upload, poll, record.
pub struct FilingProcessor<S: ?Sized> {
    submitter: Submitter<S>,
    poller: StatusPoller<S>,
    source: Arc<dyn FileSource>,
    store: Arc<dyn FilingStore>,
    work_dir: PathBuf,
}

impl<S: WebloadService + ?Sized> FilingProcessor<S> {
    /// Creates a processor that stages files in `work_dir`.
    #[must_use]
    pub fn new(
        submitter: Submitter<S>,
        poller: StatusPoller<S>,
        source: Arc<dyn FileSource>,
        store: Arc<dyn FilingStore>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            submitter,
            poller,
            source,
            store,
            work_dir: work_dir.into(),
        }
    }

    /// Files the report described by `job`.
    ///
    /// Workflow failures are recorded in the store as `FilingFailed` plus an
    /// ERROR response, not returned. The staged copy is always removed.
    ///
    /// # Errors
    ///
    /// Returns an error only if recording a failure in the store fails.
    pub async fn process(&self, job: &FilingJob) -> Result<()> {
        info!(job = ?job, "Processing filing");
        let path = self
            .work_dir
            .join(format!("submission-{}-{}.fec", job.form_id, Uuid::new_v4()));

        let result = match self.file(job, &path).await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!(error = %err, job = ?job, "Error while submitting report");
                self.record_failure(job, &err.to_string()).await
            }
        };

        remove_staged_file(&path).await;
        result
    }

    async fn file(&self, job: &FilingJob, path: &Path) -> Result<()> {
        let form_id = job.form_id;
        self.store
            .update_status(form_id, FilingStatus::FilingInProgress)
            .await?;

        info!(%form_id, path = %path.display(), "Staging report file");
        self.source.copy_to(&job.file_name, path).await?;

        let response = self
            .submitter
            .submit(
                path,
                &job.notification_emails,
                &job.fec_id,
                &job.fec_id_password,
            )
            .await?;

        if !response.is_processing() {
            return self.store.update_submission_info(form_id, &response).await;
        }

        let response = response.with_processing_explanation();
        self.store.update_submission_info(form_id, &response).await?;

        info!(%form_id, "FEC is processing the submission, polling for status");
        let outcome = self
            .poller
            .poll_for_status(&response)
            .await
            .with_accepted_summary();
        info!(%form_id, response = ?outcome, "Polling finished");
        self.store.update_submission_info(form_id, &outcome).await
    }

    async fn record_failure(&self, job: &FilingJob, reason: &str) -> Result<()> {
        self.store
            .update_status(job.form_id, FilingStatus::FilingFailed)
            .await?;
        self.store
            .update_submission_info(job.form_id, &SubmissionResponse::error(reason))
            .await
    }
}

async fn remove_staged_file(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await
        && err.kind() != ErrorKind::NotFound
    {
        warn!(error = %err, path = %path.display(), "Failed to remove staged report file");
    }
}
