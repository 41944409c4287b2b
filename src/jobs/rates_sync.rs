//! The ingestion run: a fixed pool of workers drains the source queue, each
//! job resolving its source identity, fetching quotes and reconciling them
//! as one batch. A failed job is logged and counted; it never stops the
//! pool or the other workers.

use sea_orm::DatabaseConnection;
use std::future::Future;
use std::sync::Arc;

use super::{JobQueue, RunReport};
use crate::error::IngestError;
use crate::scrapers;
use crate::services;

pub async fn run_ingestion(
    db: &DatabaseConnection,
    source_keys: &[String],
    workers: usize,
) -> Result<RunReport, IngestError> {
    if source_keys.is_empty() {
        return Err(IngestError::EmptySourceList);
    }

    // Validate the configuration before any worker starts
    for key in source_keys {
        if !scrapers::is_registered(key) {
            return Err(IngestError::UnsupportedSource(key.clone()));
        }
    }

    tracing::info!(
        "Starting {} workers for {} sources.",
        workers,
        source_keys.len()
    );

    let queue = Arc::new(JobQueue::new(source_keys.iter().cloned()));
    let db = db.clone();

    let report = run_workers(queue, workers, move |source_key| {
        let db = db.clone();

        async move { process_source(&db, &source_key).await }
    })
    .await;

    Ok(report)
}

/// Spawns `workers` tasks racing on the queue and blocks until every one of
/// them has drained it. Per-job errors are absorbed into the report.
pub async fn run_workers<F, Fut>(queue: Arc<JobQueue>, workers: usize, process: F) -> RunReport
where
    F: Fn(String) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<usize, IngestError>> + Send + 'static,
{
    let mut handles = Vec::with_capacity(workers);

    for worker in 0..workers {
        let queue = Arc::clone(&queue);
        let process = process.clone();

        handles.push(tokio::spawn(async move {
            let mut report = RunReport::default();

            tracing::info!("Worker {} started.", worker);

            while let Some(source_key) = queue.try_dequeue() {
                match process(source_key.clone()).await {
                    Ok(count) => {
                        tracing::info!(
                            "Worker {}: {} quotes from \"{}\" successfully reconciled.",
                            worker,
                            count,
                            source_key
                        );

                        report.succeeded += 1;
                    }
                    Err(error) => {
                        tracing::error!(
                            "Worker {}: \"{}\" failed: {}",
                            worker,
                            source_key,
                            error
                        );

                        report.failed += 1;
                    }
                }
            }

            tracing::info!(
                "Worker {} drained the queue. {} jobs succeeded, {} failed.",
                worker,
                report.succeeded,
                report.failed
            );

            report
        }));
    }

    let mut report = RunReport::default();

    for handle in handles {
        match handle.await {
            Ok(worker_report) => {
                report.succeeded += worker_report.succeeded;
                report.failed += worker_report.failed;
            }
            Err(error) => {
                tracing::error!("Worker task failed to join: {}", error);
            }
        }
    }

    report
}

/// One job: resolve identity, fetch, reconcile. The HTTP fetch happens
/// entirely outside the reconciliation transaction.
async fn process_source(db: &DatabaseConnection, source_key: &str) -> Result<usize, IngestError> {
    let source = services::sources::find_by_key(db, source_key).await?;

    let adapter = scrapers::create_adapter(source_key, source.id)?;

    let records = adapter.fetch().await?;

    tracing::info!("\"{}\" fetched {} quotes.", source_key, records.len());

    services::reconciliation::reconcile(db, &records).await?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|key| key.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_ingestion_rejects_empty_source_list() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let error = run_ingestion(&db, &[], 1).await.unwrap_err();

        assert!(matches!(error, IngestError::EmptySourceList));
    }

    #[tokio::test]
    async fn test_run_ingestion_rejects_unregistered_source() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let error = run_ingestion(&db, &keys(&["nbu", "monobank"]), 2)
            .await
            .unwrap_err();

        assert!(matches!(error, IngestError::UnsupportedSource(key) if key == "monobank"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_one_failing_job_does_not_stop_the_pool() {
        let queue = Arc::new(JobQueue::new(keys(&["a", "b", "c", "d"])));
        let processed = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&processed);
        let report = run_workers(queue, 4, move |key| {
            let seen = Arc::clone(&seen);

            async move {
                seen.lock().push(key.clone());

                if key == "b" {
                    Err(IngestError::Malformed("broken feed".to_string()))
                } else {
                    Ok(1)
                }
            }
        })
        .await;

        assert_eq!(report, RunReport { succeeded: 3, failed: 1 });

        let mut processed = processed.lock().clone();
        processed.sort();

        // Every job ran exactly once, the failing one included
        assert_eq!(processed, keys(&["a", "b", "c", "d"]));
    }

    #[tokio::test]
    async fn test_single_worker_processes_all_jobs() {
        let queue = Arc::new(JobQueue::new(keys(&["a", "b", "c"])));

        let report = run_workers(queue, 1, |_key| async { Ok::<usize, IngestError>(0) }).await;

        assert_eq!(report, RunReport { succeeded: 3, failed: 0 });
    }

    #[tokio::test]
    async fn test_more_workers_than_jobs_is_harmless() {
        let queue = Arc::new(JobQueue::new(keys(&["a"])));

        let report = run_workers(queue, 8, |_key| async { Ok::<usize, IngestError>(0) }).await;

        assert_eq!(report, RunReport { succeeded: 1, failed: 0 });
    }
}
