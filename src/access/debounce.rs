//! Debouncer
//!
//! Coalesces rapid triggers into one delayed task, with generation tokens so
//! late completions of superseded work can be recognised and dropped.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Identifies one scheduling of a [`Debouncer`].
#[derive(Debug, Clone)]
pub struct GenerationToken {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl GenerationToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while nothing has been scheduled or cancelled since this token.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }
}

/// Cancellable delay timer: only the last scheduled task runs.
///
/// Scheduling aborts the previous task, whether it is still waiting out the
/// delay or already running. Must be used inside a Tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    // == Schedule ==
    /// Runs `task` after the quiet period unless superseded first.
    pub fn schedule<F, Fut>(&self, task: F) -> GenerationToken
    where
        F: FnOnce(GenerationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.next_generation();
        let delay = self.delay;
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if task_token.is_current() {
                task(task_token).await;
            }
        });

        if let Some(previous) = self.replace_pending(Some(handle)) {
            previous.abort();
        }
        token
    }

    // == Cancel ==
    /// Drops any pending task and invalidates all earlier tokens.
    ///
    /// Returns the new current token.
    pub fn cancel(&self) -> GenerationToken {
        let token = self.next_generation();
        if let Some(previous) = self.replace_pending(None) {
            previous.abort();
        }
        token
    }

    pub fn current_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    fn next_generation(&self) -> GenerationToken {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationToken {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    fn replace_pending(&self, next: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *pending, next)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.replace_pending(None) {
            handle.abort();
        }
    }
}
