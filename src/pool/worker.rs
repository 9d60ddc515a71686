//! Worker thread implementation

use crate::core::{BoxedTask, Latch, Result, ThreadError};
use crate::pool::queue::TaskQueue;
use log::{debug, error};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total number of tasks that ran to completion
    pub tasks_executed: AtomicU64,
    /// Total number of tasks that panicked
    pub tasks_panicked: AtomicU64,
    /// Total time spent running tasks (microseconds)
    pub total_busy_time_us: AtomicU64,
}

/// Point-in-time copy of a worker's statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkerStatSnapshot {
    /// Tasks that ran to completion
    pub tasks_executed: u64,
    /// Tasks that panicked
    pub tasks_panicked: u64,
    /// Time spent running tasks (microseconds)
    pub total_busy_time_us: u64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment tasks executed counter
    pub fn increment_executed(&self) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment tasks panicked counter
    pub fn increment_panicked(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Add busy time
    pub fn add_busy_time(&self, microseconds: u64) {
        self.total_busy_time_us
            .fetch_add(microseconds, Ordering::Relaxed);
    }

    /// Get total tasks executed
    pub fn get_tasks_executed(&self) -> u64 {
        self.tasks_executed.load(Ordering::Relaxed)
    }

    /// Get total tasks panicked
    pub fn get_tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    /// Get average time per task run (completed or panicked) in microseconds
    pub fn get_average_busy_time_us(&self) -> f64 {
        let total = self.total_busy_time_us.load(Ordering::Relaxed);
        let count = self.tasks_executed.load(Ordering::Relaxed)
            + self.tasks_panicked.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Take a snapshot of the counters
    pub fn snapshot(&self) -> WorkerStatSnapshot {
        WorkerStatSnapshot {
            tasks_executed: self.get_tasks_executed(),
            tasks_panicked: self.get_tasks_panicked(),
            total_busy_time_us: self.total_busy_time_us.load(Ordering::Relaxed),
        }
    }
}

/// A worker thread that takes tasks from the shared queue
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a worker and block until it is running
    ///
    /// # Arguments
    ///
    /// * `id` - 0-based index of this worker within its pool
    /// * `name` - OS thread name, or `None` to leave the thread unnamed
    /// * `queue` - Queue shared with the pool and the other workers
    ///
    /// The thread name is applied before the worker reports itself ready, so
    /// once this returns the thread is fully set up.
    pub fn spawn(id: usize, name: Option<String>, queue: Arc<TaskQueue>) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);
        let ready = Arc::new(Latch::new());
        let ready_clone = Arc::clone(&ready);

        let mut builder = thread::Builder::new();
        if let Some(name) = name {
            builder = builder.name(name);
        }

        let thread = builder
            .spawn(move || {
                ready_clone.notify();
                Self::run(id, &queue, &stats_clone);
            })
            .map_err(|e| ThreadError::spawn_with_source(id, "OS refused to spawn thread", e))?;

        ready.wait();
        debug!("worker {} running", id);

        Ok(Self {
            id,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    ///
    /// The worker only exits after the queue has been shut down; joining a
    /// worker of a live queue blocks forever.
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| ThreadError::join(self.id, "Worker panicked"))?;
        }
        Ok(())
    }

    /// Main worker loop
    ///
    /// Runs tasks until the queue reports shutdown. A `None` from the queue
    /// is not an error, the shutdown check decides whether to keep going.
    fn run(id: usize, queue: &TaskQueue, stats: &WorkerStats) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        while !queue.is_shutdown() {
            if let Some(task) = queue.take() {
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_worker_busy(id);

                Self::run_task(id, task, stats);

                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_worker_idle(id);
            }
        }

        debug!(
            "worker {} exiting after {} tasks ({} panicked, {:.1}us average)",
            id,
            stats.get_tasks_executed(),
            stats.get_tasks_panicked(),
            stats.get_average_busy_time_us()
        );
    }

    /// Run a single task, containing any panic it raises
    ///
    /// The task is consumed and dropped inside the unwind guard, so a panic
    /// from its `Drop` impl is contained and counted like one from `run`.
    fn run_task(id: usize, mut task: BoxedTask, stats: &WorkerStats) {
        let name = task.name().to_string();

        #[cfg(feature = "tracing")]
        let task_span = span!(Level::DEBUG, "task", task = name.as_str());
        #[cfg(feature = "tracing")]
        let _task_guard = task_span.enter();

        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(move || {
            task.run();
            drop(task);
        }));
        let elapsed = start.elapsed();
        stats.add_busy_time(elapsed.as_micros() as u64);

        match outcome {
            Ok(()) => {
                stats.increment_executed();
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(elapsed);
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!("worker {}: task '{}' panicked: {}", id, name, panic_msg);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_panic(elapsed);
                stats.increment_panicked();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureTask;
    use std::time::Duration;

    fn wait_until(mut condition: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_worker_creation() {
        let queue = Arc::new(TaskQueue::new());

        let worker = Worker::spawn(0, Some("test-worker-1".to_string()), Arc::clone(&queue))
            .expect("Failed to spawn worker");
        assert_eq!(worker.id(), 0);

        queue.shutdown();
        worker.join().expect("Failed to join worker");
    }

    /// Task whose destructor panics after a successful run
    struct PanicOnDrop {
        ran: Arc<Latch>,
    }

    impl crate::core::Task for PanicOnDrop {
        fn run(&mut self) {
            self.ran.notify();
        }

        fn name(&self) -> &str {
            "PanicOnDrop"
        }
    }

    impl Drop for PanicOnDrop {
        fn drop(&mut self) {
            panic!("destructor failure");
        }
    }

    #[test]
    fn test_worker_task_execution() {
        let queue = Arc::new(TaskQueue::new());
        let worker = Worker::spawn(0, None, Arc::clone(&queue)).expect("Failed to spawn worker");
        let stats = worker.stats();
        assert_eq!(stats.get_average_busy_time_us(), 0.0);

        queue
            .push(Box::new(ClosureTask::new(|| {
                thread::sleep(Duration::from_millis(5));
            })))
            .expect("Failed to push task");

        wait_until(|| stats.get_tasks_executed() == 1);
        assert_eq!(stats.get_tasks_panicked(), 0);
        wait_until(|| stats.get_average_busy_time_us() >= 5_000.0);

        queue.shutdown();
        worker.join().expect("Failed to join worker");
    }

    #[test]
    fn test_worker_panic_handling() {
        let queue = Arc::new(TaskQueue::new());
        let worker = Worker::spawn(0, None, Arc::clone(&queue)).expect("Failed to spawn worker");
        let stats = worker.stats();

        queue
            .push(Box::new(ClosureTask::new(|| {
                panic!("Intentional panic for testing");
            })))
            .expect("Failed to push panicking task");

        wait_until(|| stats.get_tasks_panicked() == 1);
        assert_eq!(stats.get_tasks_executed(), 0);

        // The worker keeps serving after a panic
        queue
            .push(Box::new(ClosureTask::new(|| {})))
            .expect("Failed to push normal task");

        wait_until(|| stats.get_tasks_executed() == 1);
        assert_eq!(stats.snapshot().tasks_panicked, 1);

        queue.shutdown();
        worker.join().expect("Failed to join worker");
    }

    #[test]
    fn test_worker_survives_panicking_drop() {
        let queue = Arc::new(TaskQueue::new());
        let worker = Worker::spawn(0, None, Arc::clone(&queue)).expect("Failed to spawn worker");
        let stats = worker.stats();

        let ran = Arc::new(Latch::new());
        queue
            .push(Box::new(PanicOnDrop {
                ran: Arc::clone(&ran),
            }))
            .expect("Failed to push task");

        let next = Arc::new(Latch::new());
        let next_clone = Arc::clone(&next);
        queue
            .push(Box::new(ClosureTask::new(move || next_clone.notify())))
            .expect("Failed to push task");

        assert!(ran.wait_timeout(Duration::from_secs(5)));
        assert!(next.wait_timeout(Duration::from_secs(5)));
        wait_until(|| stats.get_tasks_executed() == 1);
        assert_eq!(stats.get_tasks_panicked(), 1);

        queue.shutdown();
        worker.join().expect("Worker should survive a panicking destructor");
    }

    #[test]
    fn test_worker_thread_name() {
        let queue = Arc::new(TaskQueue::new());
        let (tx, rx) = crossbeam_channel::bounded(1);
        let worker = Worker::spawn(4, Some("named-5".to_string()), Arc::clone(&queue))
            .expect("Failed to spawn worker");

        queue
            .push(Box::new(ClosureTask::new(move || {
                let name = thread::current().name().map(str::to_string);
                tx.send(name).expect("receiver alive");
            })))
            .expect("Failed to push task");

        let name = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("task did not run");
        assert_eq!(name.as_deref(), Some("named-5"));

        queue.shutdown();
        worker.join().expect("Failed to join worker");
    }
}
