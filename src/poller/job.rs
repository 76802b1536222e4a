use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{CreatedJob, JobSnapshot, JobStatus};

/// A remote conversion job as last seen by the client.
///
/// Created from a create-job response and then updated only by status
/// snapshots. Once `done` or `error` is reached the job no longer changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub progress: Option<u32>,
    /// Present only when `status = done`.
    pub download_url: Option<String>,
    /// Present only when `status = error`.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn from_created(created: CreatedJob) -> Self {
        let now = Utc::now();
        Self {
            id: created.job_id,
            status: created.status,
            progress: created.progress,
            download_url: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Applies a status update. Returns `false` and leaves the job untouched
    /// if it has already reached a terminal status.
    pub fn apply(&mut self, snapshot: &JobSnapshot) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = snapshot.status;
        self.progress = snapshot.progress;
        self.download_url = match snapshot.status {
            JobStatus::Done => snapshot.download_url.clone(),
            _ => None,
        };
        self.error = match snapshot.status {
            JobStatus::Error => snapshot.error.clone(),
            _ => None,
        };
        self.updated_at = Utc::now();
        true
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            status: self.status,
            progress: self.progress,
            download_url: self.download_url.clone(),
            error: self.error.clone(),
        }
    }
}
