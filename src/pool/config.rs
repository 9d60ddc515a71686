//! Thread pool configuration

use crate::core::{Result, ThreadError};

/// Configuration for thread pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadPoolConfig {
    /// Number of worker threads, fixed for the pool's lifetime
    pub num_threads: usize,
    /// Thread name prefix. Workers are named `{prefix}{index + 1}`;
    /// an empty prefix leaves the threads unnamed.
    pub thread_name_prefix: String,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            thread_name_prefix: "worker-".to_string(),
        }
    }
}

impl ThreadPoolConfig {
    /// Create a new configuration with specified number of threads
    ///
    /// A count of zero is accepted here and rejected by [`validate`](Self::validate).
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads,
            ..Default::default()
        }
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Name of the worker with the given 0-based index, if the pool names its threads
    pub fn thread_name(&self, index: usize) -> Option<String> {
        if self.thread_name_prefix.is_empty() {
            None
        } else {
            Some(format!("{}{}", self.thread_name_prefix, index + 1))
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(ThreadError::invalid_config(
                "num_threads",
                "Number of threads must be greater than 0",
            ));
        }
        Ok(())
    }
}
