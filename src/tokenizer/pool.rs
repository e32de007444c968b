//! Bounded offloading of blocking tokenizer work.
//!
//! Decoding a long generation can take several milliseconds of pure CPU time.
//! Running it on the async runtime would stall every other request scheduled on
//! the same worker, so decodes are moved onto tokio's blocking thread pool. A
//! semaphore caps how many of them run at once.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::Semaphore;

/// Default number of decodes allowed to run concurrently
pub const DEFAULT_MAX_CONCURRENT_DECODES: usize = 4;

/// Semaphore-bounded gateway onto `spawn_blocking`.
///
/// Cloning is cheap and clones share the same permits.
#[derive(Debug, Clone)]
pub struct DecodePool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl DecodePool {
    /// Create a pool allowing `max_concurrent` blocking jobs at once (minimum 1).
    pub fn new(max_concurrent: usize) -> Self {
        let capacity = max_concurrent.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by a running job
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `job` on the blocking pool once a permit is free.
    ///
    /// The permit moves into the blocking task, so it is held until the job
    /// actually finishes even if the awaiting future is dropped first. A
    /// dropped future never observes the job's output.
    pub async fn run<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| anyhow!("Decode pool closed: {}", e))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| anyhow!("Decode task panicked: {}", e))?
    }
}

impl Default for DecodePool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_DECODES)
    }
}
