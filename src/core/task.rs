//! Task trait and related types

use std::fmt;

/// A unit of work executed by one of the pool's workers
///
/// Tasks take no arguments and return nothing. Whatever a task needs to
/// report back travels through its own captured state.
pub trait Task: Send {
    /// Run the task on the current worker thread
    fn run(&mut self);

    /// Get the task's name for diagnostics
    fn name(&self) -> &str {
        "Task"
    }
}

impl fmt::Debug for dyn Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.name())
    }
}

/// A boxed task that can be sent across threads
pub type BoxedTask = Box<dyn Task>;

/// Helper to create a task from a closure
pub struct ClosureTask<F>
where
    F: FnOnce() + Send,
{
    closure: Option<F>,
    name: String,
}

impl<F> ClosureTask<F>
where
    F: FnOnce() + Send,
{
    /// Create a new closure task
    pub fn new(closure: F) -> Self {
        Self {
            closure: Some(closure),
            name: "ClosureTask".to_string(),
        }
    }

    /// Create a new closure task with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure: Some(closure),
            name: name.into(),
        }
    }
}

impl<F> Task for ClosureTask<F>
where
    F: FnOnce() + Send,
{
    fn run(&mut self) {
        // A second run is a no-op: the closure was consumed by the first.
        if let Some(closure) = self.closure.take() {
            closure();
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_closure_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        let mut task = ClosureTask::new(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(task.name(), "ClosureTask");
        task.run();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closure_task_runs_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        let mut task = ClosureTask::new(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        task.run();
        task.run();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closure_task_with_name() {
        let task: BoxedTask = Box::new(ClosureTask::with_name(|| {}, "flush"));
        assert_eq!(task.name(), "flush");
        assert_eq!(format!("{:?}", task), "Task(flush)");
    }
}
