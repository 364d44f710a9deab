//! Filing store that reports progress on stdout.

use async_trait::async_trait;
use fecfile_core::{FilingStatus, FilingStore, FormId, SubmissionResponse};
use serde_json::json;
use tracing::info;

/// Prints every update as a JSON line.
pub struct ConsoleStore;

#[async_trait]
impl FilingStore for ConsoleStore {
    async fn update_status(&self, form_id: FormId, status: FilingStatus) -> fecfile_core::Result<()> {
        info!(%form_id, status = status.display_name(), "Filing status changed");
        println!("{}", json!({ "FormId": form_id, "FilingStatus": status }));
        Ok(())
    }

    async fn update_submission_info(
        &self,
        form_id: FormId,
        response: &SubmissionResponse,
    ) -> fecfile_core::Result<()> {
        info!(%form_id, status = response.status(), "Submission info updated");
        println!("{}", json!({ "FormId": form_id, "Submission": response }));
        Ok(())
    }
}
