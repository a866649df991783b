//! Fixed size worker pool for batch processing of independent streams

use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::error::{DpError, Result};

/// Runs a batch of independent tasks on a dedicated rayon pool.
/// A pool of one worker gives the serial result.
pub struct Executor {
    pool: ThreadPool,
}

impl Executor {
    /// `workers == 0` sizes the pool to the available hardware parallelism
    pub fn new(workers: usize) -> Result<Executor> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rsdp-worker-{}", i))
            .build()?;
        log::debug!("worker pool with {} threads", pool.current_num_threads());
        Ok(Executor { pool })
    }

    pub fn serial() -> Result<Executor> {
        Executor::new(1)
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Evaluate `task(i)` for `i in 0..ntasks` and collect the results in
    /// task order. Every task runs to completion; if any of them fails, the
    /// failure with the lowest task index is returned and all outputs are
    /// dropped.
    pub fn run<T, F>(&self, ntasks: usize, task: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync,
    {
        log::debug!("dispatching {} tasks to {} workers", ntasks, self.workers());
        let results: Vec<Result<T>> = self
            .pool
            .install(|| (0..ntasks).into_par_iter().map(&task).collect());

        let mut outputs = Vec::with_capacity(ntasks);
        for (i, r) in results.into_iter().enumerate() {
            match r {
                Ok(x) => outputs.push(x),
                Err(e) => {
                    log::debug!("task {} failed: {}", i, e);
                    return Err(DpError::ProcessingFailure {
                        task: i,
                        source: Box::new(e),
                    });
                }
            }
        }
        Ok(outputs)
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("workers", &self.workers())
            .finish()
    }
}
