//! # fecfile-core
//!
//! Electronic filing of FEC reports.
//!
//! This crate provides:
//! - **Submission** - upload a report with its filing metadata
//! - **Status polling** - follow a submission until the FEC finishes validating it
//! - **Filing workflow** - stage, submit, poll and record a filing job
//! - Credential redaction for everything that reaches the logs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
pub mod filing;
pub mod status;
pub mod submission;

pub use config::{Config, ConfigBuilder, DEFAULT_POLL_DEADLINE, DEFAULT_POLL_INTERVAL};
pub use error::{Error, Result};
pub use filing::{DirectorySource, FileSource, FilingJob, FilingProcessor, FilingStatus, FilingStore, FormId};
pub use status::{StatusPoller, TickOutcome};
pub use submission::{SubmissionRequest, SubmissionResponse, Submitter, split_notification_emails};
