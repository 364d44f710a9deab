//! Filing job records.

use crate::submission::REDACTION_MARKER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the form being filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub i64);

impl FormId {
    /// Create a new form ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Filing lifecycle states recorded by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    /// The report is being uploaded or validated.
    FilingInProgress,
    /// The workflow failed before a result was obtained.
    FilingFailed,
}

impl FilingStatus {
    /// Get display name for the status.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::FilingInProgress => "Filing in progress",
            Self::FilingFailed => "Filing failed",
        }
    }
}

/// A request to file one report.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilingJob {
    /// Form the report belongs to.
    pub form_id: FormId,
    /// Name of the report file in the file source.
    pub file_name: String,
    /// Up to two `;`-separated notification addresses.
    pub notification_emails: String,
    /// Committee ID.
    pub fec_id: String,
    /// Filing password for the committee.
    #[serde(default)]
    pub fec_id_password: String,
}

impl FilingJob {
    /// Returns a copy safe to log, with the password masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            fec_id_password: REDACTION_MARKER.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for FilingJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilingJob")
            .field("form_id", &self.form_id)
            .field("file_name", &self.file_name)
            .field("notification_emails", &self.notification_emails)
            .field("fec_id", &self.fec_id)
            .field("fec_id_password", &REDACTION_MARKER)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_job_from_json() {
        let job: FilingJob = serde_json::from_str(
            r#"{"FormId":42,"FileName":"f3x.fec","NotificationEmails":"a@x.com","FecId":"C1","FecIdPassword":"pw"}"#,
        )
        .unwrap();
        assert_eq!(job.form_id, FormId::new(42));
        assert_eq!(job.file_name, "f3x.fec");
        assert_eq!(job.fec_id_password, "pw");
    }

    #[test]
    fn test_job_redaction() {
        let job = FilingJob {
            form_id: FormId::new(1),
            file_name: "a.fec".to_string(),
            notification_emails: String::new(),
            fec_id: "C1".to_string(),
            fec_id_password: "hunter2".to_string(),
        };
        assert!(!format!("{job:?}").contains("hunter2"));
        assert_eq!(job.redacted().fec_id_password, REDACTION_MARKER);
        assert_eq!(job.redacted().fec_id, "C1");
    }
}
