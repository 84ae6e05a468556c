use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Error;
use crate::model::{BatchJob, Client};

/// Cadence of status fetches. External contract: the server expects to be
/// asked every 2000 ms, fixed-interval (next sleep starts after the
/// previous fetch resolved), no backoff, no attempt cap.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum PollState {
    /// Created but not started.
    Idle,
    /// Fetch loop running.
    Polling,
    /// Loop ended on its own: terminal job status, or a failed fetch.
    Terminal,
    /// Loop ended because cancellation was requested.
    Cancelled,
}

/// Why the fetch loop ended.
#[derive(Debug)]
pub enum PollEnd {
    /// The last applied snapshot had a terminal status.
    Terminal(Box<BatchJob>),
    /// A fetch failed. This terminates *observation* only: the job may
    /// well still be processing server-side and is never marked failed
    /// locally.
    FetchFailed(Error),
    Cancelled,
}

/// Drives repeated status fetches for one job until a terminal snapshot,
/// a fetch failure, or cancellation.
///
/// At most one fetch is in flight at a time, so snapshots are applied in
/// issue order. Each snapshot replaces the previous one wholesale via a
/// watch channel.
pub struct JobStatusPoller {
    cli: Arc<dyn Client>,
    job_id: String,
}

impl JobStatusPoller {
    pub fn new(cli: Arc<dyn Client>, job_id: impl Into<String>) -> Self {
        Self {
            cli,
            job_id: job_id.into(),
        }
    }

    /// Idle -> Polling. Fetches once immediately, then every
    /// [`POLL_INTERVAL`].
    pub fn start(self) -> PollHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let (state_tx, state_rx) = watch::channel(PollState::Idle);

        let job_id = self.job_id.clone();
        let task = tokio::spawn(run_poll_loop(
            self.cli,
            self.job_id,
            cancel_rx,
            snapshot_tx,
            state_tx,
        ));

        PollHandle {
            job_id,
            cancel_tx,
            snapshot_rx,
            state_rx,
            task,
        }
    }
}

/// Owner side of a running poll loop. Dropping the handle cancels the
/// loop; relying on that is fine, but callers that need the "no snapshot
/// after this point" guarantee at a known instant should call
/// [`PollHandle::cancel`] explicitly.
pub struct PollHandle {
    job_id: String,
    cancel_tx: watch::Sender<bool>,
    snapshot_rx: watch::Receiver<Option<BatchJob>>,
    state_rx: watch::Receiver<PollState>,
    task: JoinHandle<PollEnd>,
}

impl PollHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn state(&self) -> PollState {
        *self.state_rx.borrow()
    }

    /// Subscribe to job snapshots. The latest snapshot (if any) is
    /// immediately visible via `borrow()`.
    pub fn snapshots(&self) -> watch::Receiver<Option<BatchJob>> {
        self.snapshot_rx.clone()
    }

    /// Request cancellation. Idempotent. After this returns, no further
    /// snapshot will be published: an in-flight fetch result is discarded
    /// on arrival.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Wait for the loop to end and report why.
    pub async fn wait(self) -> PollEnd {
        let PollHandle {
            cancel_tx, task, ..
        } = self;
        let end = match task.await {
            Ok(end) => end,
            // The task neither panics nor gets aborted by us; a join
            // error can only mean runtime teardown.
            Err(e) => {
                log::warn!("Poll task vanished: {}", e);
                PollEnd::Cancelled
            }
        };
        drop(cancel_tx);
        end
    }
}

async fn run_poll_loop(
    cli: Arc<dyn Client>,
    job_id: String,
    mut cancel_rx: watch::Receiver<bool>,
    snapshot_tx: watch::Sender<Option<BatchJob>>,
    state_tx: watch::Sender<PollState>,
) -> PollEnd {
    let _ = state_tx.send(PollState::Polling);

    let end = loop {
        let fetched = tokio::select! {
            biased;
            _ = cancel_requested(&mut cancel_rx) => break PollEnd::Cancelled,
            res = cli.fetch_status(&job_id) => res,
        };

        // A cancel that raced the in-flight fetch wins; the result is
        // dropped unapplied.
        if *cancel_rx.borrow() {
            break PollEnd::Cancelled;
        }

        match fetched {
            Ok(snapshot) => {
                let terminal = snapshot.status.is_terminal();
                snapshot_tx.send_replace(Some(snapshot.clone()));
                if terminal {
                    log::info!("Job {} reached terminal status '{}'", job_id, snapshot.status);
                    break PollEnd::Terminal(Box::new(snapshot));
                }
            }
            Err(e) => {
                log::warn!("Stopped observing job {}: {}", job_id, e);
                break PollEnd::FetchFailed(e);
            }
        }

        tokio::select! {
            biased;
            _ = cancel_requested(&mut cancel_rx) => break PollEnd::Cancelled,
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    };

    let _ = state_tx.send(match end {
        PollEnd::Cancelled => PollState::Cancelled,
        _ => PollState::Terminal,
    });
    end
}

async fn cancel_requested(rx: &mut watch::Receiver<bool>) {
    // Err means every handle is gone, which is cancel-on-teardown.
    let _ = rx.wait_for(|&cancelled| cancelled).await;
}
