//! Error types for the thread pool

/// Result type for thread pool operations
pub type Result<T> = std::result::Result<T, ThreadError>;

/// Errors that can occur while configuring, starting or stopping a pool
///
/// Task failures never show up here: tasks have no result channel.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ThreadError {
    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// `start()` was called on a pool whose workers are already running
    #[error("Thread pool '{pool_name}' is already started with {worker_count} workers")]
    AlreadyStarted {
        /// Name prefix of the thread pool
        pool_name: String,
        /// Number of worker threads
        worker_count: usize,
    },

    /// The pool has been shut down and cannot be started again
    #[error("Thread pool '{pool_name}' has been shut down")]
    ShutDown {
        /// Name prefix of the thread pool
        pool_name: String,
    },

    /// Failed to spawn a worker thread with details
    #[error("Failed to spawn worker thread #{thread_id}: {message}")]
    SpawnError {
        /// Index of the thread that failed to spawn
        thread_id: usize,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },

    /// Failed to join a worker thread
    #[error("Failed to join worker thread #{thread_id}: {message}")]
    JoinError {
        /// Index of the thread that failed to join
        thread_id: usize,
        /// Error message
        message: String,
    },
}

impl ThreadError {
    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ThreadError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create an already started error
    pub fn already_started(pool_name: impl Into<String>, worker_count: usize) -> Self {
        ThreadError::AlreadyStarted {
            pool_name: pool_name.into(),
            worker_count,
        }
    }

    /// Create a shut down error
    pub fn shut_down(pool_name: impl Into<String>) -> Self {
        ThreadError::ShutDown {
            pool_name: pool_name.into(),
        }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(
        thread_id: usize,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        ThreadError::SpawnError {
            thread_id,
            message: message.into(),
            source,
        }
    }

    /// Create a join error
    pub fn join(thread_id: usize, message: impl Into<String>) -> Self {
        ThreadError::JoinError {
            thread_id,
            message: message.into(),
        }
    }
}
