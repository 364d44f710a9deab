//! Collaborators of the filing workflow.

use super::model::{FilingStatus, FormId};
use crate::error::{Error, Result};
use crate::submission::SubmissionResponse;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Where report files come from.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Copies the file named `file_name` to `destination`.
    async fn copy_to(&self, file_name: &str, destination: &Path) -> Result<()>;
}

/// Where filing progress is recorded.
#[async_trait]
pub trait FilingStore: Send + Sync {
    /// Records the lifecycle state of a form.
    async fn update_status(&self, form_id: FormId, status: FilingStatus) -> Result<()>;

    /// Records the latest response from the FEC for a form.
    async fn update_submission_info(
        &self,
        form_id: FormId,
        response: &SubmissionResponse,
    ) -> Result<()>;
}

/// Reads report files from a local directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileSource for DirectorySource {
    async fn copy_to(&self, file_name: &str, destination: &Path) -> Result<()> {
        let relative = Path::new(file_name);
        let mut components = relative.components().peekable();
        if components.peek().is_none() || !components.all(|c| matches!(c, Component::Normal(_))) {
            return Err(Error::Source(format!(
                "File name must be relative to the source directory: {file_name}"
            )));
        }

        tokio::fs::copy(self.root.join(relative), destination).await?;
        Ok(())
    }
}
