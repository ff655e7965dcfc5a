//! Deferred callout job runner
//!
//! Tokio-backed [`JobQueue`] implementation. `submit` hands the batch to an
//! unbounded channel and returns immediately; a single worker task receives
//! batches FIFO and drives [`CalloutClient::run_batch`] for each, so the
//! records of one batch run strictly sequentially and one batch runs at a
//! time. Jobs execute at-least-once with no ordering guarantee relative to
//! the mutation that triggered them.
//!
//! Shutdown is deterministic: [`CalloutJobRunner::shutdown`] closes the
//! queue, every already-submitted job still runs, and the worker is joined
//! before the call returns. Individual jobs cannot be cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::CalloutClient;
use crate::error::{Error, Result};
use crate::traits::{CalloutBatch, JobHandle, JobQueue};

enum WorkerCommand {
    Run(CalloutBatch),
    Drain,
}

/// Deferred job runner backed by a single Tokio worker task
pub struct CalloutJobRunner {
    tx: mpsc::UnboundedSender<WorkerCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
    next_job_id: AtomicU64,
}

impl CalloutJobRunner {
    /// Spawn the worker task and return the runner
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(client: Arc<CalloutClient>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    WorkerCommand::Run(batch) => client.run_batch(&batch).await,
                    WorkerCommand::Drain => break,
                }
            }
            debug!("callout worker drained, exiting");
        });

        Self {
            tx,
            worker: Mutex::new(Some(worker)),
            next_job_id: AtomicU64::new(0),
        }
    }

    /// Run every already-submitted job, then stop the worker
    ///
    /// Once the worker has stopped, `submit` returns `Error::Queue`; a
    /// submission racing with shutdown may be accepted but never run. Safe
    /// to call more than once; later calls are no-ops.
    pub async fn shutdown(&self) -> Result<()> {
        // The send fails only if the worker is already gone, which is fine.
        let _ = self.tx.send(WorkerCommand::Drain);

        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            handle
                .await
                .map_err(|e| Error::queue(format!("callout worker panicked: {}", e)))?;
        }
        Ok(())
    }
}

impl JobQueue for CalloutJobRunner {
    fn submit(&self, batch: CalloutBatch) -> Result<JobHandle> {
        let id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            "submitting {} job #{} ({} records)",
            batch.kind().as_str(),
            id,
            batch.len()
        );
        self.tx
            .send(WorkerCommand::Run(batch))
            .map_err(|_| Error::queue("callout worker is no longer running"))?;
        Ok(JobHandle::new(id))
    }
}
