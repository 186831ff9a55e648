//! Write Queue
//!
//! Runs mutations one at a time, in submission order, on a single worker task.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::error::{DataError, Result};

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Single-consumer FIFO queue of asynchronous operations.
///
/// Every operation runs on the queue's worker, never inline in the caller,
/// and the next one starts only after the previous one settled. A failing
/// operation reports to its own caller only; the worker logs it and moves on.
///
/// Must be created inside a Tokio runtime. Dropping the queue lets the worker
/// finish what was already submitted and exit.
#[derive(Debug)]
pub struct WriteQueue {
    name: String,
    jobs: mpsc::UnboundedSender<Job>,
    pending: Arc<AtomicUsize>,
}

impl WriteQueue {
    /// Creates the queue and spawns its worker.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (jobs, mut rx) = mpsc::unbounded_channel::<Job>();

        let worker_name = name.clone();
        tokio::spawn(async move {
            debug!("Write queue {} started", worker_name);
            while let Some(job) = rx.recv().await {
                // A panicking job must not take the worker down with it.
                if let Err(e) = tokio::spawn(job).await {
                    error!("Write queue {} job aborted: {}", worker_name, e);
                }
            }
            debug!("Write queue {} stopped", worker_name);
        });

        Self {
            name,
            jobs,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    // == Enqueue ==
    /// Submits `op` and returns a future resolving to its result.
    ///
    /// Submission happens when `enqueue` is called, not when the returned
    /// future is first polled, so call order is execution order.
    pub fn enqueue<F, Fut, T>(&self, op: F) -> impl Future<Output = Result<T>> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let name = self.name.clone();
        let guard = PendingGuard::new(Arc::clone(&self.pending));

        let job: Job = Box::pin(async move {
            let result = op().await;
            if let Err(e) = &result {
                warn!("Queued write on {} failed: {}", name, e);
            }
            drop(guard);
            // The caller may have stopped waiting; that is not an error.
            let _ = done_tx.send(result);
        });

        let submitted = self
            .jobs
            .send(job)
            .map_err(|_| DataError::Internal(format!("write queue {} is closed", self.name)));

        async move {
            submitted?;
            done_rx
                .await
                .map_err(|_| DataError::Internal("queued write was dropped".to_string()))?
        }
    }

    /// Operations submitted but not yet finished.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Counts a job as pending until it is dropped, whether it finished,
/// panicked or never reached the worker.
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
