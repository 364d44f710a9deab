//! Submission status polling.

mod poller;

pub use poller::{StatusPoller, TickOutcome};
