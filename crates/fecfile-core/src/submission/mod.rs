//! Report submission.
//!
//! Builds the upload metadata, sends the report, and normalizes the reply.

mod model;
mod submitter;

pub use model::{
    ACCEPTED_STATUS, ERROR_STATUS, PROCESSING_STATUS, REDACTION_MARKER, SubmissionRequest,
    SubmissionResponse, VALIDATING_PLACEHOLDER,
};
pub use submitter::{Submitter, split_notification_emails};
