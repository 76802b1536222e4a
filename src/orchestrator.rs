use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{JobApi, SubmissionError};
use crate::config::ConvertConfig;
use crate::options::ConversionOptions;
use crate::poller::{Job, PollState, Poller};
use crate::request;
use crate::selection::{ConversionTarget, InputSelection};
use crate::status::{JobView, StatusProjector};

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub job_id: String,
    pub initial_view: JobView,
    pub submitted_at: DateTime<Utc>,
}

/// Submits conversions and tracks the resulting job until it finishes.
///
/// Holds at most one active job; a new submission discards the previous one.
pub struct Orchestrator<A> {
    api: Arc<A>,
    projector: StatusProjector,
    poller: Poller<A>,
}

impl<A: JobApi> Orchestrator<A> {
    pub fn new(api: Arc<A>, api_base: &str, poll_interval: Duration) -> Self {
        let projector = StatusProjector::new(api_base);
        let poller = Poller::new(Arc::clone(&api), projector.clone(), poll_interval);
        Self {
            api,
            projector,
            poller,
        }
    }

    pub fn from_config(api: Arc<A>, config: &ConvertConfig) -> Self {
        Self::new(api, &config.api_base, config.poll_interval())
    }

    /// Creates a job and starts polling it.
    ///
    /// Any previous job is discarded first. Malformed `raw_options` are
    /// sent as `{}`. On error no job exists and nothing is polled.
    pub async fn submit(
        &self,
        target: &ConversionTarget,
        selection: &InputSelection,
        raw_options: &str,
    ) -> Result<Submission, SubmissionError> {
        self.poller.reset();

        let options = ConversionOptions::parse(raw_options);
        let payload = request::build(target, selection, &options)?;
        let created = self.api.create_job(payload).await?;

        let job = Job::from_created(created);
        info!(
            job_id = %job.id,
            conversion = %target,
            files = selection.len(),
            "conversion job created"
        );
        let submission = Submission {
            job_id: job.id.clone(),
            initial_view: self.projector.project(&job.snapshot()),
            submitted_at: job.created_at,
        };
        self.poller.start(job);
        Ok(submission)
    }
}

impl<A> Orchestrator<A> {
    /// Calls `callback` with each new view until the orchestrator is
    /// dropped. Views published in quick succession may be coalesced into
    /// the latest one.
    pub fn on_update<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: Fn(&JobView) + Send + 'static,
    {
        let mut views = self.poller.subscribe();
        tokio::spawn(async move {
            while views.changed().await.is_ok() {
                let view = views.borrow_and_update().clone();
                if let Some(view) = view {
                    callback(&view);
                }
            }
        })
    }

    /// Stops polling the current job.
    pub fn cancel(&self) {
        self.poller.stop();
    }

    /// Resolves once polling ends, by a terminal status or by [`cancel`](Self::cancel),
    /// with the last view seen.
    pub async fn wait(&self) -> Option<JobView> {
        let mut states = self.poller.watch_state();
        let _ = states.wait_for(|s| *s != PollState::Polling).await;
        self.poller.latest_view()
    }

    pub fn state(&self) -> PollState {
        self.poller.state()
    }

    pub fn current_job(&self) -> Option<Job> {
        self.poller.current_job()
    }

    pub fn current_view(&self) -> Option<JobView> {
        self.poller.latest_view()
    }
}
