//! Tracing integration for observability.
//!
//! Without the `tracing` feature this module only provides [`TracedTask`],
//! which then behaves exactly like the task it wraps. With the feature
//! enabled, workers run inside a `worker` span, tasks inside a `task` span,
//! and the [`metrics`] events below are emitted.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixed_thread_pool::prelude::*;
//! use fixed_thread_pool::tracing::TracedTask;
//!
//! let pool = ThreadPool::new(4, "traced-")?;
//! pool.start()?;
//!
//! let span = tracing::info_span!("request", id = 42);
//! let _guard = span.enter();
//! // The task runs inside the `request` span on the worker thread
//! pool.add(TracedTask::new(ClosureTask::new(|| tracing::info!("handled"))));
//! ```

use crate::core::Task;

/// A task wrapper that carries the submitter's tracing span to the worker.
///
/// The current span is captured when the wrapper is created and entered
/// while the wrapped task runs.
pub struct TracedTask<T: Task> {
    inner: T,
    #[cfg(feature = "tracing")]
    span: tracing::Span,
}

impl<T: Task> TracedTask<T> {
    /// Wrap a task, capturing the current span
    pub fn new(task: T) -> Self {
        Self {
            inner: task,
            #[cfg(feature = "tracing")]
            span: tracing::Span::current(),
        }
    }

    /// Wrap a task with a specific span
    #[cfg(feature = "tracing")]
    pub fn with_span(task: T, span: tracing::Span) -> Self {
        Self { inner: task, span }
    }
}

impl<T: Task> Task for TracedTask<T> {
    fn run(&mut self) {
        #[cfg(feature = "tracing")]
        let _guard = self.span.enter();
        self.inner.run()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Metric events emitted by the pool and its workers.
///
/// These are plain tracing events; a subscriber such as
/// tracing-opentelemetry can turn the `counter.*`, `gauge.*` and
/// `histogram.*` fields into metrics.
#[cfg(feature = "tracing")]
pub mod metrics {
    use std::time::Duration;

    /// Records a task submission.
    #[inline]
    pub fn record_submission(queue_depth: usize) {
        tracing::trace!(
            counter.tasks_submitted = 1,
            gauge.queue_depth = queue_depth as i64,
            "task submitted"
        );
    }

    /// Records task completion with timing.
    #[inline]
    pub fn record_completion(duration: Duration) {
        tracing::trace!(
            counter.tasks_executed = 1,
            histogram.task_duration_us = duration.as_micros() as u64,
            "task executed"
        );
    }

    /// Records a task panic.
    #[inline]
    pub fn record_panic(duration: Duration) {
        tracing::trace!(
            counter.tasks_panicked = 1,
            histogram.task_duration_us = duration.as_micros() as u64,
            "task panicked"
        );
    }

    /// Records worker becoming busy.
    #[inline]
    pub fn record_worker_busy(worker_id: usize) {
        tracing::trace!(gauge.workers_busy = 1, worker_id = worker_id, "worker busy");
    }

    /// Records worker becoming idle.
    #[inline]
    pub fn record_worker_idle(worker_id: usize) {
        tracing::trace!(
            gauge.workers_busy = -1i64,
            worker_id = worker_id,
            "worker idle"
        );
    }

    /// Records pool startup.
    #[inline]
    pub fn record_pool_start(num_workers: usize) {
        tracing::info!(workers = num_workers, "thread pool started");
    }

    /// Records pool shutdown.
    #[inline]
    pub fn record_pool_shutdown(tasks_executed: u64, tasks_panicked: u64, tasks_dropped: usize) {
        tracing::info!(
            tasks_executed = tasks_executed,
            tasks_panicked = tasks_panicked,
            tasks_dropped = tasks_dropped,
            "thread pool shutdown complete"
        );
    }
}
