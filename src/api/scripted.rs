//! In-memory [`JobApi`] that replays a fixed sequence of responses.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::client::JobApi;
use super::error::{PollError, SubmissionError};
use super::types::{CreatedJob, JobSnapshot, JobStatus};
use crate::request::TransportPayload;

struct Step {
    delay: Duration,
    result: Result<JobSnapshot, PollError>,
}

pub(crate) struct ScriptedApi {
    created: Mutex<VecDeque<Result<CreatedJob, SubmissionError>>>,
    script: Mutex<VecDeque<Step>>,
    fallback: JobSnapshot,
    payloads: Mutex<Vec<TransportPayload>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    /// Once the script runs out every poll reports `processing`.
    pub(crate) fn new() -> Self {
        Self {
            created: Mutex::new(VecDeque::new()),
            script: Mutex::new(VecDeque::new()),
            fallback: JobSnapshot::with_status(JobStatus::Processing),
            payloads: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_created(self, job_id: &str) -> Self {
        self.created.lock().unwrap().push_back(Ok(CreatedJob {
            job_id: job_id.to_string(),
            status: JobStatus::Queued,
            progress: Some(0),
        }));
        self
    }

    pub(crate) fn with_create_error(self, err: SubmissionError) -> Self {
        self.created.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn then_status(self, snapshot: JobSnapshot) -> Self {
        self.then_delayed(Duration::ZERO, snapshot)
    }

    pub(crate) fn then_delayed(self, delay: Duration, snapshot: JobSnapshot) -> Self {
        self.script.lock().unwrap().push_back(Step {
            delay,
            result: Ok(snapshot),
        });
        self
    }

    pub(crate) fn then_error(self, err: PollError) -> Self {
        self.script.lock().unwrap().push_back(Step {
            delay: Duration::ZERO,
            result: Err(err),
        });
        self
    }

    /// Job ids passed to `get_status`, in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn payloads(&self) -> Vec<TransportPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

impl JobApi for ScriptedApi {
    async fn create_job(&self, payload: TransportPayload) -> Result<CreatedJob, SubmissionError> {
        self.payloads.lock().unwrap().push(payload);
        let created = self.created.lock().unwrap().pop_front();
        created.unwrap_or_else(|| {
            Err(SubmissionError::Rejected {
                status: 500,
                body: "no scripted job".into(),
            })
        })
    }

    async fn get_status(&self, job_id: &str) -> Result<JobSnapshot, PollError> {
        self.calls.lock().unwrap().push(job_id.to_string());
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step { delay, result }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(self.fallback.clone()),
        }
    }
}
