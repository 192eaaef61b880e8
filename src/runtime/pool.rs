use std::{future::Future, sync::Arc};

use thiserror::Error;
use tokio::{sync::Semaphore, task::JoinHandle};
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("computation pool is shut down")]
    Closed,
}

/// Bounded pool shared by all connections.
///
/// At most `size` submitted jobs run at a time; the rest wait for a permit.
/// The pool itself never cancels a job: dropping the returned handle detaches
/// the job, which then keeps its permit until it finishes.
#[derive(Debug, Clone)]
pub struct ComputationPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl ComputationPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Permits not currently held by a running job.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn submit<F, T>(&self, job: F) -> JoinHandle<Result<T, PoolError>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permits = self.permits.clone();
        tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| PoolError::Closed)?;
            trace!("job acquired pool permit");
            Ok(job.await)
        })
    }

    /// Rejects queued and future jobs. Running jobs finish normally.
    pub fn close(&self) {
        self.permits.close();
    }
}
