use serde::Serialize;

use crate::api::{JobSnapshot, JobStatus};

/// Progress shown while the server has not reported any.
const PLACEHOLDER_PROGRESS: u32 = 10;

/// Presentation-ready state of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobView {
    pub status: JobStatus,
    /// Human label; empty for statuses the client does not recognise.
    pub label: &'static str,
    /// Percentage in `0..=100`.
    pub progress: u32,
    /// Absolute download reference, only when the job is done.
    pub download_url: Option<String>,
    /// Server error text, only when the job failed.
    pub error: Option<String>,
}

impl JobView {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Maps raw status snapshots to [`JobView`]s.
#[derive(Debug, Clone)]
pub struct StatusProjector {
    api_base: String,
}

impl StatusProjector {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn project(&self, snapshot: &JobSnapshot) -> JobView {
        let progress = match (snapshot.progress, snapshot.status) {
            (Some(p), _) => p.min(100),
            (None, JobStatus::Done) => 100,
            (None, _) => PLACEHOLDER_PROGRESS,
        };

        let download_url = match snapshot.status {
            JobStatus::Done => snapshot
                .download_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .map(|url| self.resolve(url)),
            _ => None,
        };

        let error = match snapshot.status {
            JobStatus::Error => snapshot.error.clone(),
            _ => None,
        };

        JobView {
            status: snapshot.status,
            label: label(snapshot.status),
            progress,
            download_url,
            error,
        }
    }

    /// Absolute `http(s)` references pass through; anything else is
    /// appended to the API base.
    pub fn resolve(&self, url: &str) -> String {
        if is_absolute(url) {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.api_base)
        } else {
            format!("{}/{url}", self.api_base)
        }
    }
}

fn label(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Queued => "Queued",
        JobStatus::Processing => "Processing",
        JobStatus::Done => "Completed",
        JobStatus::Error => "Failed",
        JobStatus::Unknown => "",
    }
}

fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
