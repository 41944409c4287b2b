pub mod rates_sync;

use parking_lot::Mutex;
use std::collections::VecDeque;

/// Pending source keys, drained exactly once each. Workers race on
/// `try_dequeue`; the lock covers nothing but the single pop.
pub struct JobQueue {
    jobs: Mutex<VecDeque<String>>,
}

impl JobQueue {
    pub fn new(source_keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            jobs: Mutex::new(source_keys.into_iter().collect()),
        }
    }

    /// Next pending source key, or `None` once the queue is drained.
    pub fn try_dequeue(&self) -> Option<String> {
        self.jobs.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}

/// Aggregate outcome of one ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// One worker per job up to the machine's parallelism, and at least one.
pub fn worker_count(job_count: usize) -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    cpus.min(job_count).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn keys(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("source-{}", i)).collect()
    }

    #[test]
    fn test_queue_drains_in_fifo_order() {
        let queue = JobQueue::new(keys(3));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.try_dequeue().as_deref(), Some("source-0"));
        assert_eq!(queue.try_dequeue().as_deref(), Some("source-1"));
        assert_eq!(queue.try_dequeue().as_deref(), Some("source-2"));
        assert_eq!(queue.try_dequeue(), None);
        assert!(queue.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_workers_dequeue_each_key_exactly_once() {
        let expected: HashSet<String> = keys(100).into_iter().collect();

        let queue = Arc::new(JobQueue::new(keys(100)));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let queue = Arc::clone(&queue);

            handles.push(tokio::spawn(async move {
                let mut drained = Vec::new();

                while let Some(key) = queue.try_dequeue() {
                    drained.push(key);
                    tokio::task::yield_now().await;
                }

                drained
            }));
        }

        let mut seen = Vec::new();

        for handle in handles {
            seen.extend(handle.await.unwrap());
        }

        assert_eq!(seen.len(), 100);
        assert_eq!(seen.into_iter().collect::<HashSet<_>>(), expected);
    }

    #[test]
    fn test_worker_count_bounds() {
        assert_eq!(worker_count(0), 1);
        assert_eq!(worker_count(1), 1);

        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        assert_eq!(worker_count(usize::MAX), cpus);
        assert!(worker_count(3) <= 3);
    }
}
