//! Status polling for a single active job.
//!
//! [`Poller::start`] polls immediately and then on a fixed interval until
//! the job reaches `done` or `error`, or until [`Poller::stop`] is called.
//! Each tick runs its request on its own task, so a slow response never
//! delays the next tick. Responses are applied only while their session is
//! still the active one.

mod job;
mod session;

pub use job::Job;
pub use session::{PollSession, PollState};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{JobApi, JobSnapshot, PollError};
use crate::status::{JobView, StatusProjector};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

struct Shared {
    state: PollState,
    generation: u64,
    session: Option<PollSession>,
    job: Option<Job>,
}

impl Shared {
    fn is_active(&self, generation: u64) -> bool {
        self.state == PollState::Polling
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.generation == generation)
    }
}

struct Inner<A> {
    api: Arc<A>,
    projector: StatusProjector,
    interval: Duration,
    shared: Mutex<Shared>,
    views: watch::Sender<Option<JobView>>,
    states: watch::Sender<PollState>,
}

impl<A> Inner<A> {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, shared: &mut Shared, state: PollState) {
        shared.state = state;
        self.states.send_replace(state);
    }
}

impl<A: JobApi> Inner<A> {
    fn apply(&self, generation: u64, job_id: &str, result: Result<JobSnapshot, PollError>) {
        let mut shared = self.lock();
        if !shared.is_active(generation) {
            debug!(job_id, "discarding status response from an inactive session");
            return;
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(job_id, error = %e, "status poll failed, retrying on next tick");
                return;
            }
        };

        if let Some(job) = shared.job.as_mut() {
            job.apply(&snapshot);
        }
        self.views
            .send_replace(Some(self.projector.project(&snapshot)));
        debug!(job_id, status = %snapshot.status, progress = ?snapshot.progress, "job status updated");

        if snapshot.status.is_terminal() {
            if let Some(session) = shared.session.take() {
                session.cancel();
            }
            self.set_state(&mut shared, PollState::Stopped);
            info!(job_id, status = %snapshot.status, "job finished, polling stopped");
        }
    }
}

/// Owns the single poll session of an orchestrator.
pub struct Poller<A> {
    inner: Arc<Inner<A>>,
}

impl<A: JobApi> Poller<A> {
    pub fn new(api: Arc<A>, projector: StatusProjector, interval: Duration) -> Self {
        let (views, _) = watch::channel(None);
        let (states, _) = watch::channel(PollState::Idle);
        Self {
            inner: Arc::new(Inner {
                api,
                projector,
                // tokio intervals panic on a zero period.
                interval: interval.max(Duration::from_millis(1)),
                shared: Mutex::new(Shared {
                    state: PollState::Idle,
                    generation: 0,
                    session: None,
                    job: None,
                }),
                views,
                states,
            }),
        }
    }

    /// Starts polling `job`, cancelling any session already running.
    ///
    /// The job's current state is published right away. A job that is
    /// already terminal is published and never polled.
    pub fn start(&self, job: Job) {
        let inner = &self.inner;
        let mut shared = inner.lock();

        if let Some(current) = &shared.job
            && current.id == job.id
            && current.is_terminal()
        {
            warn!(job_id = %job.id, status = %current.status, "job already finished, not polling it again");
            return;
        }

        if let Some(previous) = shared.session.take() {
            debug!(job_id = %previous.job_id, "cancelling previous poll session");
            previous.cancel();
        }
        shared.generation += 1;
        let generation = shared.generation;

        inner
            .views
            .send_replace(Some(inner.projector.project(&job.snapshot())));
        let job_id = job.id.clone();
        let terminal = job.is_terminal();
        shared.job = Some(job);

        if terminal {
            inner.set_state(&mut shared, PollState::Stopped);
            return;
        }

        let timer = tokio::spawn(run_timer(Arc::clone(inner), job_id.clone(), generation));
        debug!(%job_id, generation, interval_ms = inner.interval.as_millis() as u64, "poll session started");
        shared.session = Some(PollSession::new(job_id, generation, timer.abort_handle()));
        inner.set_state(&mut shared, PollState::Polling);
    }
}

impl<A> Poller<A> {
    /// Cancels the running session, if any. Safe to call repeatedly.
    pub fn stop(&self) {
        let mut shared = self.inner.lock();
        if let Some(session) = shared.session.take() {
            debug!(job_id = %session.job_id, "poll session cancelled");
            session.cancel();
        }
        if shared.state != PollState::Stopped {
            self.inner.set_state(&mut shared, PollState::Stopped);
        }
    }

    /// Stops the running session and forgets its job and last view.
    pub fn reset(&self) {
        let mut shared = self.inner.lock();
        if let Some(session) = shared.session.take() {
            debug!(job_id = %session.job_id, "poll session cancelled");
            session.cancel();
        }
        if shared.state == PollState::Polling {
            self.inner.set_state(&mut shared, PollState::Stopped);
        }
        if let Some(job) = shared.job.take() {
            debug!(job_id = %job.id, "previous job discarded");
        }
        self.inner.views.send_replace(None);
    }

    pub fn state(&self) -> PollState {
        self.inner.lock().state
    }

    pub fn current_job(&self) -> Option<Job> {
        self.inner.lock().job.clone()
    }

    pub fn latest_view(&self) -> Option<JobView> {
        self.inner.views.borrow().clone()
    }

    /// Receiver of the latest view; intermediate views may be skipped.
    pub fn subscribe(&self) -> watch::Receiver<Option<JobView>> {
        self.inner.views.subscribe()
    }

    pub fn watch_state(&self) -> watch::Receiver<PollState> {
        self.inner.states.subscribe()
    }
}

impl<A> Drop for Poller<A> {
    fn drop(&mut self) {
        if let Some(session) = self.inner.lock().session.take() {
            session.cancel();
        }
    }
}

async fn run_timer<A: JobApi>(inner: Arc<Inner<A>>, job_id: String, generation: u64) {
    let mut ticker = tokio::time::interval(inner.interval);
    loop {
        ticker.tick().await;
        let active = inner.lock().is_active(generation);
        if !active {
            break;
        }
        let inner = Arc::clone(&inner);
        let job_id = job_id.clone();
        tokio::spawn(async move {
            let result = inner.api.get_status(&job_id).await;
            inner.apply(generation, &job_id, result);
        });
    }
}
