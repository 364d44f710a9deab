//! Submission request and response records.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Placeholder written in place of secrets in logs and debug output.
pub const REDACTION_MARKER: &str = "******";

/// Status label of a submission the FEC is still validating.
pub const PROCESSING_STATUS: &str = "Processing";

/// Status label of a successfully filed report.
pub const ACCEPTED_STATUS: &str = "Accepted";

/// Status label of locally synthesized failures.
pub const ERROR_STATUS: &str = "ERROR";

/// Message the FEC returns while a submission is being validated.
pub const VALIDATING_PLACEHOLDER: &str = "Please check in few minutes for status update";

const PROCESSING_EXPLANATION: &str = "The FEC has received the report and is currently \
    processing it. In most cases this completes in a few minutes but can take up to four hours \
    during peak times. We'll periodically check with the FEC and update the status when it is done.";

const EMPTY_RESPONSE_MESSAGE: &str = "The FEC web service returned with an empty HTTP response \
    body, so the status of the submission is unknown.";

const CANCELLED_MESSAGE: &str =
    "The call to the status endpoint was cancelled before the first check was made.";

/// Metadata sent alongside an uploaded report.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionRequest {
    /// Committee ID assigned by the FEC (e.g. `C00363168`).
    pub committee_id: String,
    /// Filing password for the committee.
    pub password: String,
    /// Vendor API key.
    pub api_key: String,
    /// First notification address.
    pub email1: String,
    /// Second notification address, empty if none.
    pub email2: String,
    /// Agency identifier.
    pub agency_id: String,
    /// Report being amended, empty for original filings.
    pub amendment_id: String,
}

impl SubmissionRequest {
    /// Returns a copy safe to log, with the password and API key masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            password: REDACTION_MARKER.to_string(),
            api_key: REDACTION_MARKER.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for SubmissionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionRequest")
            .field("committee_id", &self.committee_id)
            .field("password", &REDACTION_MARKER)
            .field("api_key", &REDACTION_MARKER)
            .field("email1", &self.email1)
            .field("email2", &self.email2)
            .field("agency_id", &self.agency_id)
            .field("amendment_id", &self.amendment_id)
            .finish()
    }
}

/// Result of an upload or status call.
///
/// Values are immutable; the `with_*` methods derive a new response that
/// differs in one field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    report_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    submission_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    success: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SubmissionResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(
        status: impl Into<String>,
        report_id: impl Into<String>,
        message: impl Into<String>,
        submission_id: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            status: status.into(),
            report_id: report_id.into(),
            message: message.into(),
            submission_id: submission_id.into(),
            success,
        }
    }

    /// A failed response carrying only `message`.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ERROR_STATUS, "", message, "", false)
    }

    /// Stand-in for a service reply with an empty body.
    #[must_use]
    pub fn unknown_status() -> Self {
        Self::error(EMPTY_RESPONSE_MESSAGE)
    }

    /// Result of a poll stopped before any status was retrieved.
    #[must_use]
    pub fn cancelled_before_first_check(submission_id: impl Into<String>) -> Self {
        Self::new(ERROR_STATUS, "", CANCELLED_MESSAGE, submission_id, false)
    }

    /// Parses the JSON embedded in a service reply.
    ///
    /// Returns `None` for an empty or `null` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a response object or carries no
    /// status.
    pub fn from_wire(json: &str) -> serde_json::Result<Option<Self>> {
        let json = json.trim();
        if json.is_empty() {
            return Ok(None);
        }
        let response: Option<Self> = serde_json::from_str(json)?;
        match response {
            Some(response) if response.status.trim().is_empty() => {
                Err(serde::de::Error::custom("response has no status"))
            }
            other => Ok(other),
        }
    }

    /// Status label (`Processing`, `Accepted`, `ERROR`, ...).
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// FEC report ID, empty until accepted.
    #[must_use]
    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// ID used to query the submission's status.
    #[must_use]
    pub fn submission_id(&self) -> &str {
        &self.submission_id
    }

    /// Whether the service reported success.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// True while the FEC is still validating the report.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.status.eq_ignore_ascii_case(PROCESSING_STATUS)
    }

    /// True once the report has been accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status.eq_ignore_ascii_case(ACCEPTED_STATUS)
    }

    /// Same response with a different status.
    #[must_use]
    pub fn with_status(self, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..self
        }
    }

    /// Same response with a different message.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self
        }
    }

    /// Replaces the validation placeholder of a processing submission with a
    /// description of what happens next.
    #[must_use]
    pub fn with_processing_explanation(self) -> Self {
        if self.is_processing() && self.message.eq_ignore_ascii_case(VALIDATING_PLACEHOLDER) {
            self.with_message(PROCESSING_EXPLANATION)
        } else {
            self
        }
    }

    /// Replaces the stale validation placeholder of an accepted submission
    /// with `"<status> <report id>"`.
    #[must_use]
    pub fn with_accepted_summary(self) -> Self {
        if self.is_accepted() && self.message == VALIDATING_PLACEHOLDER {
            let summary = format!("{} {}", self.status, self.report_id);
            self.with_message(summary)
        } else {
            self
        }
    }

    /// Applies both placeholder rewrites.
    #[must_use]
    pub fn rewrite_placeholder(self) -> Self {
        self.with_processing_explanation().with_accepted_summary()
    }
}
