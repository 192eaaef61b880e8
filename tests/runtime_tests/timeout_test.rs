use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use expr_server::{
    request::{ComputeError, Response},
    runtime::CancelFlag,
    Orchestrator, ServerConfig, StatsCollector,
};
use pretty_assertions::assert_eq;

fn orchestrator(workers: usize, computation: Duration, queue: Duration) -> Arc<Orchestrator> {
    let config = ServerConfig {
        worker_threads: Some(workers),
        computation_timeout: computation,
        queue_timeout: queue,
        ..Default::default()
    };
    Arc::new(Orchestrator::new(&config, Arc::new(StatsCollector::new())))
}

/// Spins until cancelled, then reports that it saw the cancellation.
fn runaway_job(observed: Arc<AtomicBool>) -> impl FnOnce(&CancelFlag) -> Result<f64, ComputeError> {
    move |cancel: &CancelFlag| {
        while !cancel.is_cancelled() {
            std::thread::sleep(Duration::from_millis(5));
        }
        observed.store(true, Ordering::SeqCst);
        Err(ComputeError::Cancelled(expr_server::runtime::Cancelled))
    }
}

async fn wait_for(condition: impl Fn() -> bool, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_computation_timeout_cancels_worker() {
    let orchestrator = orchestrator(2, Duration::from_millis(100), Duration::from_secs(5));
    let observed = Arc::new(AtomicBool::new(false));

    let started = Instant::now();
    let response = orchestrator
        .execute(runaway_job(observed.clone()), Instant::now())
        .await;

    assert_eq!(
        response,
        Response::Err("(ComputationTimeout) The computation took longer than 0.1 seconds.".to_string())
    );
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(wait_for(|| observed.load(Ordering::SeqCst), Duration::from_secs(2)).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_huge_grid_times_out_instead_of_hanging() {
    let orchestrator = orchestrator(1, Duration::from_millis(200), Duration::from_secs(5));
    // 2000^3 tuples, far more than 200ms of work
    let response = orchestrator
        .handle("MAX_GRID;x:0:1:1999,y:0:1:1999,z:0:1:1999;((x*y)+z)")
        .await;
    assert_eq!(
        response,
        Response::Err("(ComputationTimeout) The computation took longer than 0.2 seconds.".to_string())
    );

    // the cancelled worker releases its permit
    let pool = orchestrator.pool().clone();
    assert!(wait_for(|| pool.available() == 1, Duration::from_secs(2)).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_queue_timeout_leaves_job_running() {
    let orchestrator = orchestrator(1, Duration::from_millis(600), Duration::from_millis(100));
    let observed = Arc::new(AtomicBool::new(false));

    let response = orchestrator
        .execute(runaway_job(observed.clone()), Instant::now())
        .await;
    assert_eq!(
        response,
        Response::Err(
            "(QueueTimeout) The computation request stayed in the queue for more than 0.1 seconds."
                .to_string()
        )
    );

    // not cancelled by the queue timeout, still holding the only permit
    assert!(!observed.load(Ordering::SeqCst));
    assert_eq!(orchestrator.pool().available(), 0);

    // a newly arriving request waits behind it and times out as well
    let response = orchestrator.handle("MIN_GRID;x:0:1:2;(x+1)").await;
    assert!(response
        .to_string()
        .starts_with("ERR;(QueueTimeout)"));

    // the inner deadline eventually stops the runaway job
    assert!(wait_for(|| observed.load(Ordering::SeqCst), Duration::from_secs(3)).await);
    let pool = orchestrator.pool().clone();
    assert!(wait_for(|| pool.available() == 1, Duration::from_secs(3)).await);

    assert_eq!(
        orchestrator.handle("MIN_GRID;x:0:1:2;(x+1)").await.value(),
        Some(1.0)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_pool() {
    let orchestrator = orchestrator(2, Duration::from_secs(5), Duration::from_secs(10));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .handle(&format!("MAX_GRID;x:0:1:{i};(x*2)"))
                    .await
            })
        })
        .collect();

    let responses = futures::future::join_all(handles).await;
    for (i, response) in responses.into_iter().enumerate() {
        assert_eq!(response.unwrap().value(), Some((i * 2) as f64));
    }
    assert_eq!(orchestrator.stats().total().await, 8);
}
