//! Bounded worker pool for per-file extraction
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::fmt;

/// Process-wide pool shared by every `release` request
///
/// Immutable after construction; pass it into the [`Assembler`](crate::Assembler)
/// explicitly.
pub struct ExtractionPool {
    pool: ThreadPool,
    workers: usize,
}

impl ExtractionPool {
    /// Build a pool with `workers` threads
    pub fn new(workers: usize) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("mdreader-extract-{}", i))
            .build()?;
        Ok(Self { pool, workers })
    }

    /// Build a pool sized to the logical CPU count
    pub fn with_default_workers() -> Result<Self, ThreadPoolBuildError> {
        Self::new(num_cpus::get())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Apply `f` to every item on the pool, keeping input order in the output
    ///
    /// Returns only when every item has finished.
    pub fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        self.pool.install(|| items.par_iter().map(f).collect())
    }
}

impl fmt::Debug for ExtractionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionPool")
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}
