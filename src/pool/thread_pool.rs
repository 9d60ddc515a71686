//! Thread pool implementation

use crate::core::{BoxedTask, ClosureTask, Result, Task, ThreadError};
use crate::pool::config::ThreadPoolConfig;
use crate::pool::queue::TaskQueue;
use crate::pool::worker::{Worker, WorkerStatSnapshot, WorkerStats};
use log::{debug, error, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Lifecycle of a pool. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolState {
    Created,
    Running,
    Stopped,
}

/// Snapshot of pool-wide statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolStats {
    /// Number of worker threads
    pub num_threads: usize,
    /// Tasks accepted by `add`
    pub tasks_submitted: u64,
    /// Tasks that ran to completion
    pub tasks_executed: u64,
    /// Tasks that panicked
    pub tasks_panicked: u64,
    /// Tasks waiting in the queue (advisory)
    pub tasks_pending: u64,
    /// Per-worker counters, indexed by worker id
    pub workers: Vec<WorkerStatSnapshot>,
}

impl PoolStats {
    /// Render the snapshot as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A fixed-size pool of worker threads fed from one FIFO queue
///
/// # Lifecycle
///
/// Construction spawns nothing. [`start`](Self::start) spawns every worker
/// and returns only once all of them are running. [`shutdown`](Self::shutdown)
/// (or dropping the pool) wakes every worker, waits for in-flight tasks to
/// finish and joins the threads.
///
/// # Shutdown Policy
///
/// Shutdown does not drain the queue: tasks still waiting when shutdown
/// begins are dropped without running.
pub struct ThreadPool {
    config: ThreadPoolConfig,
    queue: Arc<TaskQueue>,
    workers: Mutex<Vec<Worker>>,
    /// Held for the whole of `start()` and for the transition in `shutdown()`
    state: Mutex<PoolState>,
    /// Mirrors `state == Running`; readable while a transition is in progress
    running: AtomicBool,
    total_tasks_submitted: AtomicU64,
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("queue", &self.queue)
            .field(
                "total_tasks_submitted",
                &self.total_tasks_submitted.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl ThreadPool {
    /// Create a thread pool with a worker count and a thread name prefix
    ///
    /// # Errors
    ///
    /// Returns `ThreadError::InvalidConfig` if `num_threads` is zero.
    pub fn new<S: Into<String>>(num_threads: usize, name_prefix: S) -> Result<Self> {
        Self::with_config(ThreadPoolConfig::new(num_threads).with_thread_name_prefix(name_prefix))
    }

    /// Create a thread pool with specified number of threads
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::with_config(ThreadPoolConfig::new(num_threads))
    }

    /// Create a thread pool with custom configuration
    pub fn with_config(config: ThreadPoolConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            queue: Arc::new(TaskQueue::new()),
            workers: Mutex::new(Vec::new()),
            state: Mutex::new(PoolState::Created),
            running: AtomicBool::new(false),
            total_tasks_submitted: AtomicU64::new(0),
        })
    }

    /// Start the thread pool
    ///
    /// Spawns the workers one at a time, waiting for each to report that it
    /// is running before spawning the next.
    ///
    /// # Errors
    ///
    /// - `ThreadError::AlreadyStarted` - `start()` already succeeded
    /// - `ThreadError::ShutDown` - the pool has been shut down
    /// - `ThreadError::SpawnError` - the OS refused a thread; workers spawned
    ///   so far are shut down and joined before returning
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            PoolState::Created => {}
            PoolState::Running => {
                return Err(ThreadError::already_started(
                    &self.config.thread_name_prefix,
                    self.config.num_threads,
                ))
            }
            PoolState::Stopped => {
                return Err(ThreadError::shut_down(&self.config.thread_name_prefix))
            }
        }

        let mut workers = Vec::with_capacity(self.config.num_threads);
        for id in 0..self.config.num_threads {
            let name = self.config.thread_name(id);
            match Worker::spawn(id, name, Arc::clone(&self.queue)) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    error!("failed to start worker {}: {}", id, e);
                    *state = PoolState::Stopped;
                    self.queue.shutdown();
                    for worker in workers {
                        if let Err(join_err) = worker.join() {
                            error!("{}", join_err);
                        }
                    }
                    self.queue.clear();
                    return Err(e);
                }
            }
        }

        *self.workers.lock() = workers;
        *state = PoolState::Running;
        self.running.store(true, Ordering::Release);

        debug!(
            "thread pool '{}' started with {} workers",
            self.config.thread_name_prefix, self.config.num_threads
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_start(self.config.num_threads);

        Ok(())
    }

    /// Append a task to the queue and wake one worker
    ///
    /// Never waits for a worker to become free. Tasks added before
    /// [`start`](Self::start) stay queued until workers exist. Tasks added
    /// once shutdown has begun are dropped with a warning.
    pub fn add<T: Task + 'static>(&self, task: T) {
        self.add_boxed(Box::new(task));
    }

    /// Append an already boxed task to the queue
    pub fn add_boxed(&self, task: BoxedTask) {
        match self.queue.push(task) {
            Ok(()) => {
                self.total_tasks_submitted.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_submission(self.queue.len());
            }
            Err(task) => {
                warn!(
                    "thread pool '{}' is shut down, dropping task '{}'",
                    self.config.thread_name_prefix,
                    task.name()
                );
            }
        }
    }

    /// Submit a closure as a task
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.add(ClosureTask::new(f))
    }

    /// Number of tasks waiting to be picked up
    ///
    /// The value is a snapshot and may already be stale when returned;
    /// do not use it for synchronization.
    pub fn num_of_undone_task(&self) -> u64 {
        self.queue.len() as u64
    }

    /// Get the number of worker threads
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    /// Get the thread name prefix
    pub fn thread_name_prefix(&self) -> &str {
        &self.config.thread_name_prefix
    }

    /// Check if the pool is running
    ///
    /// Never waits on `start()` or `shutdown()`, so it is safe to call from
    /// a task, including one queued before `start()`. Reports `false` until
    /// `start()` has spawned every worker.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Get total number of tasks accepted by the queue
    pub fn total_tasks_submitted(&self) -> u64 {
        self.total_tasks_submitted.load(Ordering::Relaxed)
    }

    /// Get statistics for all workers
    pub fn get_stats(&self) -> Vec<Arc<WorkerStats>> {
        self.workers.lock().iter().map(|w| w.stats()).collect()
    }

    /// Get total tasks executed across all workers
    pub fn total_tasks_executed(&self) -> u64 {
        let workers = self.workers.lock();
        workers.iter().map(|w| w.stats().get_tasks_executed()).sum()
    }

    /// Get total tasks panicked across all workers
    pub fn total_tasks_panicked(&self) -> u64 {
        let workers = self.workers.lock();
        workers.iter().map(|w| w.stats().get_tasks_panicked()).sum()
    }

    /// Take a snapshot of pool-wide statistics
    ///
    /// Worker counters are only available while the pool is running.
    pub fn stats(&self) -> PoolStats {
        let workers: Vec<WorkerStatSnapshot> = self
            .workers
            .lock()
            .iter()
            .map(|w| w.stats().snapshot())
            .collect();

        PoolStats {
            num_threads: self.config.num_threads,
            tasks_submitted: self.total_tasks_submitted(),
            tasks_executed: workers.iter().map(|w| w.tasks_executed).sum(),
            tasks_panicked: workers.iter().map(|w| w.tasks_panicked).sum(),
            tasks_pending: self.num_of_undone_task(),
            workers,
        }
    }

    /// Shut the thread pool down and wait for all workers to exit
    ///
    /// 1. Sets the shutdown flag and wakes every worker
    /// 2. Joins the workers in index order; each finishes its current task first
    /// 3. Drops every task still queued
    ///
    /// Returns the number of queued tasks that were dropped. Calling it again
    /// is a no-op returning `Ok(0)`.
    ///
    /// # Errors
    ///
    /// Returns `ThreadError::JoinError` for the first worker that could not be
    /// joined. The remaining workers are still joined.
    pub fn shutdown(&self) -> Result<usize> {
        {
            let mut state = self.state.lock();
            if *state == PoolState::Stopped {
                return Ok(0);
            }
            *state = PoolState::Stopped;
            self.running.store(false, Ordering::Release);
        }

        self.queue.shutdown();

        let workers = std::mem::take(&mut *self.workers.lock());
        let mut tasks_executed = 0;
        let mut tasks_panicked = 0;
        let mut first_error = None;
        for worker in workers {
            let stats = worker.stats();
            if let Err(e) = worker.join() {
                error!("{}", e);
                first_error.get_or_insert(e);
            }
            tasks_executed += stats.get_tasks_executed();
            tasks_panicked += stats.get_tasks_panicked();
        }

        let dropped = self.queue.clear();
        if dropped > 0 {
            warn!(
                "thread pool '{}' dropped {} pending tasks at shutdown",
                self.config.thread_name_prefix, dropped
            );
        }
        debug!(
            "thread pool '{}' stopped: {} tasks executed, {} panicked",
            self.config.thread_name_prefix, tasks_executed, tasks_panicked
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_shutdown(tasks_executed, tasks_panicked, dropped);

        match first_error {
            Some(e) => Err(e),
            None => Ok(dropped),
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            error!(
                "failed to shut down thread pool '{}' during drop: {}",
                self.config.thread_name_prefix, e
            );
        }
    }
}
