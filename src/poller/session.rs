use std::fmt;

use tokio::task::AbortHandle;

/// Lifecycle of the poll loop.
///
/// `Idle → Polling` on start, `Polling → Stopped` on a terminal snapshot or
/// an explicit stop. A new start from `Stopped` begins a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Stopped,
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollState::Idle => write!(f, "IDLE"),
            PollState::Polling => write!(f, "POLLING"),
            PollState::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// Binds a job id to the timer task that polls it.
///
/// `generation` identifies the session; responses carrying an older
/// generation are discarded. Dropping the session does not stop the timer,
/// [`cancel`](Self::cancel) does.
#[derive(Debug)]
pub struct PollSession {
    pub job_id: String,
    pub generation: u64,
    timer: AbortHandle,
}

impl PollSession {
    pub fn new(job_id: String, generation: u64, timer: AbortHandle) -> Self {
        Self {
            job_id,
            generation,
            timer,
        }
    }

    /// Stops future ticks. Requests already in flight are not aborted.
    pub fn cancel(self) {
        self.timer.abort();
    }

    #[cfg(test)]
    fn is_timer_finished(&self) -> bool {
        self.timer.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn state_display() {
        assert_eq!(PollState::Idle.to_string(), "IDLE");
        assert_eq!(PollState::Polling.to_string(), "POLLING");
        assert_eq!(PollState::Stopped.to_string(), "STOPPED");
    }

    #[tokio::test]
    async fn cancel_aborts_timer_task() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        let session = PollSession::new("job-1".into(), 1, task.abort_handle());
        assert!(!session.is_timer_finished());

        session.cancel();
        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
