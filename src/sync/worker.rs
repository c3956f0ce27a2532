use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot},
};
use tracing::{debug, warn};

use super::{DocumentPatch, RemoteDocumentStore, SyncGate};
use crate::calendar::{RecurringTransaction, RecurringTransactionRecord};

enum SyncJob {
    Push(Vec<RecurringTransactionRecord>),
    Flush(oneshot::Sender<()>),
}

/// Background mirror of the calendar collection into the remote document.
///
/// Pushes are queued from the synchronous mutation path and sent by a single
/// worker task in submission order: at most once, best-effort, no retry.
pub struct RemoteSync {
    remote: Arc<dyn RemoteDocumentStore>,
    gate: Arc<dyn SyncGate>,
    jobs: mpsc::UnboundedSender<SyncJob>,
}

impl RemoteSync {
    /// Starts the push worker on `runtime`.
    pub fn spawn(
        remote: Arc<dyn RemoteDocumentStore>,
        gate: Arc<dyn SyncGate>,
        runtime: &Handle,
    ) -> Self {
        let (jobs, queue) = mpsc::unbounded_channel();
        runtime.spawn(run_worker(Arc::clone(&remote), queue));
        Self { remote, gate, jobs }
    }

    pub fn is_enabled(&self) -> bool {
        self.gate.cloud_sync_allowed()
    }

    /// Queues a wholesale push of `transactions`. Never blocks and never fails.
    pub fn submit(&self, transactions: &[RecurringTransaction]) {
        if !self.is_enabled() {
            debug!("cloud sync disabled; skipping remote push");
            return;
        }
        let records = transactions
            .iter()
            .map(RecurringTransactionRecord::from)
            .collect();
        if self.jobs.send(SyncJob::Push(records)).is_err() {
            warn!("remote sync worker is gone; dropping push");
        }
    }

    /// Resolves once every push submitted before this call has been attempted.
    pub async fn flush(&self) {
        let (done, finished) = oneshot::channel();
        if self.jobs.send(SyncJob::Flush(done)).is_ok() {
            let _ = finished.await;
        }
    }

    /// Remote `calendarEvents`, when sync is allowed and the remote has any.
    ///
    /// Remote failures are logged and reported as `None`.
    pub async fn fetch(&self) -> Option<Vec<RecurringTransactionRecord>> {
        if !self.is_enabled() {
            return None;
        }
        match self.remote.fetch().await {
            Ok(Some(document)) => document.calendar_events,
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "failed to fetch calendar events from remote");
                None
            }
        }
    }
}

async fn run_worker(
    remote: Arc<dyn RemoteDocumentStore>,
    mut queue: mpsc::UnboundedReceiver<SyncJob>,
) {
    while let Some(job) = queue.recv().await {
        match job {
            SyncJob::Push(records) => {
                let count = records.len();
                match remote.upsert(DocumentPatch::calendar_events(records)).await {
                    Ok(()) => debug!(count, "pushed calendar events to remote"),
                    Err(err) => warn!(error = %err, count, "failed to sync calendar to remote"),
                }
            }
            SyncJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("remote sync worker stopped");
}
