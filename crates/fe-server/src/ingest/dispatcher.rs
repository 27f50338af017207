//! Bounded work queue feeding a fixed pool of ingestion workers
//!
//! Submission waits only for queue capacity, never for a free worker.
//! Each worker parks a fresh single-slot channel in
//! the idle registry and waits; the dispatch loop pairs each queued
//! request with the next idle worker, blocking (in a spawned task) only
//! on worker availability. A stop signal is honored while a worker is
//! idle, never mid-task.

use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

use fe_srm::DbMap;

use super::fetch::{ArchiveFetcher, Fetch, RestFetcher};
use super::{tasks, IngestError};

/// Requests queued beyond this bound are rejected at submission.
pub const WORK_QUEUE_CAPACITY: usize = 1000;

type Action = Box<dyn FnOnce(Arc<dyn Fetch>) -> BoxFuture<'static, Result<(), IngestError>> + Send>;

/// One unit of ingestion work: a named target, the fetcher that
/// retrieves its feed, and the task to run against it.
pub struct WorkRequest {
    pub target: String,
    fetcher: Arc<dyn Fetch>,
    action: Action,
}

impl WorkRequest {
    pub async fn run(self) -> Result<(), IngestError> {
        (self.action)(self.fetcher).await
    }

    /// Map an ingestion target name to its work request.
    ///
    /// `vehicles` pulls the zipped vehicle and emissions feeds;
    /// `fuelprices` pulls the fuel price document. Anything else is
    /// rejected.
    pub fn for_target(target: &str, db: DbMap) -> Result<WorkRequest, IngestError> {
        match target {
            "vehicles" => Ok(WorkRequest {
                target: target.to_string(),
                fetcher: Arc::new(ArchiveFetcher::new()),
                action: Box::new(move |fetcher| {
                    Box::pin(async move { tasks::ingest_vehicles(&db, fetcher.as_ref()).await })
                }),
            }),
            "fuelprices" => Ok(WorkRequest {
                target: target.to_string(),
                fetcher: Arc::new(RestFetcher::new()),
                action: Box::new(move |fetcher| {
                    Box::pin(async move { tasks::ingest_fuel_prices(&db, fetcher.as_ref()).await })
                }),
            }),
            other => Err(IngestError::InvalidTarget(other.to_string())),
        }
    }
}

/// Handle used by request handlers to enqueue work.
#[derive(Clone)]
pub struct WorkQueue {
    tx: mpsc::Sender<WorkRequest>,
}

impl WorkQueue {
    /// Enqueue a work request, waiting for a slot when the queue is at
    /// capacity. The bounded queue is the backpressure point.
    pub async fn submit(&self, work: WorkRequest) -> Result<(), IngestError> {
        self.tx.send(work).await.map_err(|_| IngestError::QueueClosed)
    }
}

/// Owns the worker stop channels.
pub struct Dispatcher {
    quits: Vec<mpsc::Sender<()>>,
}

impl Dispatcher {
    /// Signal every worker to stop once it next goes idle.
    pub async fn stop(&self) {
        for quit in &self.quits {
            let _ = quit.send(()).await;
        }
    }
}

/// Start `nworkers` workers and the dispatch loop.
pub fn start(nworkers: usize) -> (WorkQueue, Dispatcher) {
    let (work_tx, mut work_rx) = mpsc::channel::<WorkRequest>(WORK_QUEUE_CAPACITY);
    let (idle_tx, idle_rx) = mpsc::channel::<mpsc::Sender<WorkRequest>>(nworkers.max(1));
    let idle_rx = Arc::new(Mutex::new(idle_rx));

    let mut quits = Vec::with_capacity(nworkers);
    for id in 1..=nworkers {
        info!(worker = id, "starting worker");
        let (quit_tx, quit_rx) = mpsc::channel::<()>(1);
        quits.push(quit_tx);
        tokio::spawn(run_worker(id, idle_tx.clone(), quit_rx));
    }

    tokio::spawn(async move {
        while let Some(work) = work_rx.recv().await {
            info!(target = %work.target, "received work request");
            let idle_rx = idle_rx.clone();
            // Waiting for an idle worker must not stall the queue, so
            // each pairing happens in its own task.
            tokio::spawn(async move {
                let mut work = work;
                loop {
                    let worker = { idle_rx.lock().await.recv().await };
                    let Some(worker) = worker else {
                        warn!(target = %work.target, "worker pool stopped, dropping work request");
                        return;
                    };
                    info!(target = %work.target, "dispatching work request");
                    match worker.send(work).await {
                        Ok(()) => return,
                        // Stale inbox: the worker stopped after
                        // registering idle. Pair with the next one.
                        Err(mpsc::error::SendError(returned)) => work = returned,
                    }
                }
            });
        }
    });

    (WorkQueue { tx: work_tx }, Dispatcher { quits })
}

async fn run_worker(
    id: usize,
    idle_tx: mpsc::Sender<mpsc::Sender<WorkRequest>>,
    mut quit_rx: mpsc::Receiver<()>,
) {
    loop {
        let (job_tx, mut job_rx) = mpsc::channel::<WorkRequest>(1);
        if idle_tx.send(job_tx).await.is_err() {
            return;
        }

        tokio::select! {
            job = job_rx.recv() => {
                let Some(work) = job else { return };
                let target = work.target.clone();
                let started = Instant::now();
                match work.run().await {
                    Ok(()) => info!(
                        worker = id,
                        target = %target,
                        elapsed = ?started.elapsed(),
                        "task succeeded"
                    ),
                    Err(err) => error!(worker = id, target = %target, %err, "task failed"),
                }
            }
            _ = quit_rx.recv() => {
                info!(worker = id, "worker stopping");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct NullFetcher;

    #[async_trait]
    impl Fetch for NullFetcher {
        async fn fetch(&self, _name: &str) -> Result<Vec<u8>, IngestError> {
            Ok(Vec::new())
        }
    }

    fn counting_request(
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        done: mpsc::Sender<()>,
    ) -> WorkRequest {
        WorkRequest {
            target: "test".to_string(),
            fetcher: Arc::new(NullFetcher),
            action: Box::new(move |_fetcher| {
                Box::pin(async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    let _ = done.send(()).await;
                    Ok(())
                })
            }),
        }
    }

    #[tokio::test]
    async fn test_pool_runs_all_jobs_with_bounded_concurrency() {
        let (queue, dispatcher) = start(2);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (done_tx, mut done_rx) = mpsc::channel::<()>(8);

        for _ in 0..6 {
            queue
                .submit(counting_request(
                    active.clone(),
                    peak.clone(),
                    done_tx.clone(),
                ))
                .await
                .unwrap();
        }
        for _ in 0..6 {
            tokio::time::timeout(Duration::from_secs(5), done_rx.recv())
                .await
                .expect("job did not finish")
                .expect("done channel closed");
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(active.load(Ordering::SeqCst), 0);
        dispatcher.stop().await;
    }

    #[tokio::test]
    async fn test_stale_idle_inboxes_are_skipped_after_stop() {
        let (queue, dispatcher) = start(2);
        // Let both workers park an idle inbox before stopping them;
        // those inboxes go stale once the workers exit.
        tokio::time::sleep(Duration::from_millis(20)).await;
        dispatcher.stop().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (done_tx, _done_rx) = mpsc::channel::<()>(1);
        queue
            .submit(counting_request(active.clone(), peak.clone(), done_tx))
            .await
            .unwrap();

        // The pairing task walks past the stale inboxes and drops the
        // job without executing it or wedging the dispatch loop.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(peak.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_target_is_rejected() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let db = DbMap::sqlite(pool);
        let result = WorkRequest::for_target("nonsense", db);
        assert!(matches!(result, Err(IngestError::InvalidTarget(t)) if t == "nonsense"));
    }

    #[tokio::test]
    async fn test_valid_targets_map_to_requests() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let db = DbMap::sqlite(pool);
        for target in ["vehicles", "fuelprices"] {
            let work = WorkRequest::for_target(target, db.clone()).unwrap();
            assert_eq!(work.target, target);
        }
    }
}
