pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod scripted;

pub use client::{Artifact, JobApi, JobClient};
pub use error::{DownloadError, PollError, SubmissionError};
pub use types::{CreatedJob, JobSnapshot, JobStatus};
