//! Parallel execution helpers for per-pin work
//!
//! Pin heights are independent of each other, so a pass maps over pin slots
//! on a rayon pool. Small grids stay on the calling thread where the pool
//! overhead would dominate.

use pinart_core::{Error, ParallelConfig, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

/// Thread pool configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Number of threads to use (None = automatic)
    pub num_threads: Option<usize>,
    /// Thread name prefix
    pub thread_name_prefix: String,
    /// Enable parallel processing (can be disabled for debugging)
    pub enabled: bool,
    /// Minimum number of items before work is split across threads
    pub min_parallel_len: usize,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "pinart-pass".to_string(),
            enabled: true,
            min_parallel_len: 1024,
        }
    }
}

impl ThreadPoolConfig {
    /// Set number of threads
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Enable or disable parallel processing
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the sequential cutoff
    pub fn with_min_parallel_len(mut self, min_parallel_len: usize) -> Self {
        self.min_parallel_len = min_parallel_len;
        self
    }
}

impl From<&ParallelConfig> for ThreadPoolConfig {
    fn from(config: &ParallelConfig) -> Self {
        Self {
            num_threads: config.num_threads,
            enabled: config.enabled,
            min_parallel_len: config.min_parallel_pins,
            ..Self::default()
        }
    }
}

/// Where and how per-pin work runs
#[derive(Debug, Clone)]
pub struct Parallelism {
    pool: Option<Arc<ThreadPool>>,
    enabled: bool,
    min_parallel_len: usize,
}

impl Parallelism {
    /// Everything on the calling thread
    pub fn sequential() -> Self {
        Self {
            pool: None,
            enabled: false,
            min_parallel_len: usize::MAX,
        }
    }

    /// Build a dedicated pool from configuration.
    ///
    /// With `num_threads` unset the work runs on rayon's global pool instead.
    pub fn from_config(config: &ThreadPoolConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::sequential());
        }

        let pool = match config.num_threads {
            Some(num_threads) => {
                let prefix = config.thread_name_prefix.clone();
                let pool = ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .thread_name(move |index| format!("{}-{}", prefix, index))
                    .build()
                    .map_err(|e| Error::Algorithm(format!("Failed to create thread pool: {}", e)))?;
                Some(Arc::new(pool))
            }
            None => None,
        };

        Ok(Self {
            pool,
            enabled: true,
            min_parallel_len: config.min_parallel_len,
        })
    }

    /// Whether `len` items would be split across threads
    pub fn is_parallel_for(&self, len: usize) -> bool {
        self.enabled && len >= self.min_parallel_len
    }

    /// Number of worker threads available to a parallel call
    pub fn current_num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn install<F, R>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Map `f` over `0..len`, preserving order
    pub fn map_range<U, F>(&self, len: usize, f: F) -> Vec<U>
    where
        U: Send,
        F: Fn(usize) -> U + Sync + Send,
    {
        if !self.is_parallel_for(len) {
            return (0..len).map(f).collect();
        }

        self.install(|| (0..len).into_par_iter().map(f).collect())
    }

    /// Map then reduce over a slice
    pub fn reduce<T, U, F, R>(&self, data: &[T], identity: U, map_op: F, reduce_op: R) -> U
    where
        T: Sync,
        U: Clone + Send + Sync,
        F: Fn(&T) -> U + Sync + Send,
        R: Fn(U, U) -> U + Sync + Send,
    {
        if !self.is_parallel_for(data.len()) {
            return data.iter().map(map_op).fold(identity, reduce_op);
        }

        self.install(|| {
            data.par_iter()
                .map(map_op)
                .reduce(|| identity.clone(), reduce_op)
        })
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        let config = ThreadPoolConfig::default();
        Self {
            pool: None,
            enabled: config.enabled,
            min_parallel_len: config.min_parallel_len,
        }
    }
}
