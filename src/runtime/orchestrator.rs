//! Request entry point and the two-tier deadline around every computation.
//!
//! A computation request is submitted to the shared [`ComputationPool`].
//! Inside the pool job the pipeline runs on a dedicated blocking worker,
//! raced against the computation timeout; on expiry the worker's
//! [`CancelFlag`] is set and the job answers `ComputationTimeout`. The
//! caller races the whole job (queue wait included) against the queue
//! timeout; on expiry it answers `QueueTimeout` and walks away, leaving the
//! job running.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, instrument, warn};

use crate::config::ServerConfig;
use crate::request::{ComputeError, ComputeResult, Request, Response, StatKind};
use crate::stats::StatsCollector;

use super::cancel::CancelFlag;
use super::pool::ComputationPool;

pub struct Orchestrator {
    pool: ComputationPool,
    stats: Arc<StatsCollector>,
    computation_timeout: Duration,
    queue_timeout: Duration,
    max_domain_len: usize,
}

impl Orchestrator {
    pub fn new(config: &ServerConfig, stats: Arc<StatsCollector>) -> Self {
        Self {
            pool: ComputationPool::new(config.worker_count()),
            stats,
            computation_timeout: config.computation_timeout,
            queue_timeout: config.queue_timeout,
            max_domain_len: config.max_domain_len,
        }
    }

    pub fn pool(&self) -> &ComputationPool {
        &self.pool
    }

    pub fn stats(&self) -> &Arc<StatsCollector> {
        &self.stats
    }

    /// Handles one raw request line and records its latency. Never fails:
    /// every error becomes an `ERR;` response.
    #[instrument(level = "debug", skip(self))]
    pub async fn handle(&self, line: &str) -> Response {
        let start = Instant::now();
        let response = match Request::parse(line) {
            Ok(Request::Stat(kind)) => self.stat(kind, start).await,
            Ok(Request::Computation(request)) => {
                let max_domain_len = self.max_domain_len;
                self.execute(move |cancel| request.run(max_domain_len, cancel), start)
                    .await
            }
            Err(error) => Response::error(ComputeError::from(error)),
        };
        self.stats.record(start.elapsed()).await;
        debug!(%response, "request handled");
        response
    }

    async fn stat(&self, kind: StatKind, start: Instant) -> Response {
        let value = kind.value(&self.stats).await;
        Response::ok(start.elapsed(), value)
    }

    /// Runs `job` through the pool under both deadlines. `start` is when the
    /// request was received; the reported elapsed time is measured from it.
    pub async fn execute<F>(&self, job: F, start: Instant) -> Response
    where
        F: FnOnce(&CancelFlag) -> ComputeResult<f64> + Send + 'static,
    {
        let handle = self
            .pool
            .submit(run_with_deadline(job, self.computation_timeout));

        // Dropping the handle on expiry detaches the job; it is not aborted.
        let result = match tokio::time::timeout(self.queue_timeout, handle).await {
            Ok(Ok(Ok(result))) => result,
            Ok(Ok(Err(pool_error))) => Err(ComputeError::Worker(pool_error.to_string())),
            Ok(Err(join_error)) => Err(ComputeError::Worker(join_error.to_string())),
            Err(_) => {
                warn!(timeout = ?self.queue_timeout, "queue timeout");
                Err(ComputeError::QueueTimeout(self.queue_timeout))
            }
        };

        match result {
            Ok(value) => Response::ok(start.elapsed(), value),
            Err(error) => Response::error(error),
        }
    }

    /// Stops accepting new computations. Stat requests are still answered.
    pub fn shutdown(&self) {
        self.pool.close();
    }
}

async fn run_with_deadline<F>(job: F, deadline: Duration) -> ComputeResult<f64>
where
    F: FnOnce(&CancelFlag) -> ComputeResult<f64> + Send + 'static,
{
    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();
    let worker = tokio::task::spawn_blocking(move || job(&worker_cancel));

    match tokio::time::timeout(deadline, worker).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ComputeError::Worker(join_error.to_string())),
        Err(_) => {
            cancel.cancel();
            warn!(timeout = ?deadline, "computation timeout, worker cancelled");
            Err(ComputeError::ComputationTimeout(deadline))
        }
    }
}
