//! Bounded worker pool for independent producer calls.
//!
//! Every task is spawned immediately and waits for a semaphore permit before
//! doing any work, so at most `size` calls are in flight. Results come back
//! in submission order.
//!
//! On cancellation the pool stops waiting: tasks already running are left to
//! finish on their own and their results are dropped, so a caller never sees
//! a partial batch.

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The batch was abandoned because the caller cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolCancelled;

#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// A pool of `size` workers (at least one).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run every task and return their outcomes in submission order.
    ///
    /// A panicking task yields `Err(JoinError)` in its slot; the other
    /// slots are unaffected.
    pub async fn run_all<T, F>(
        &self,
        tasks: Vec<F>,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Vec<Result<T, JoinError>>, PoolCancelled>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(PoolCancelled);
        }
        debug!("Dispatching {} tasks to {} workers", tasks.len(), self.size);

        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let semaphore = Arc::clone(&self.semaphore);
                tokio::spawn(async move {
                    // The semaphore is never closed, so acquiring only waits.
                    let _permit = semaphore.acquire_owned().await;
                    task.await
                })
            })
            .collect();

        match cancellation {
            Some(token) => tokio::select! {
                results = join_all(handles) => Ok(results),
                _ = token.cancelled() => {
                    debug!("Worker pool batch cancelled; discarding in-flight results");
                    Err(PoolCancelled)
                }
            },
            None => Ok(join_all(handles).await),
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_submission_order() {
        let pool = WorkerPool::new(2);
        let tasks: Vec<_> = (0..5u64)
            .map(|i| async move {
                tokio::time::sleep(Duration::from_millis(10 * (5 - i))).await;
                i
            })
            .collect();
        let results = pool.run_all(tasks, None).await.unwrap();
        let values: Vec<u64> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new(2);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                }
            })
            .collect();

        pool.run_all(tasks, None).await.unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_cancellation_discards_batch() {
        let pool = WorkerPool::new(2);
        let token = CancellationToken::new();
        let finished = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let finished = Arc::clone(&finished);
                async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    finished.fetch_add(1, Ordering::SeqCst);
                }
            })
            .collect();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            canceller.cancel();
        });

        let outcome = pool.run_all(tasks, Some(&token)).await;
        assert_eq!(outcome.unwrap_err(), PoolCancelled);

        // In-flight tasks still run to completion.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_size_pool_still_runs() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.size(), 1);
        let results = pool.run_all(vec![async { 7 }], None).await.unwrap();
        assert_eq!(results[0].as_ref().copied().unwrap(), 7);
    }
}
