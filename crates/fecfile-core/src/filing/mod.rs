//! Filing workflow.
//!
//! Takes a filing job from staging through upload and status polling,
//! recording progress in a [`FilingStore`].

mod model;
mod processor;
mod source;

pub use model::{FilingJob, FilingStatus, FormId};
pub use processor::FilingProcessor;
pub use source::{DirectorySource, FileSource, FilingStore};
