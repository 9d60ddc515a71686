//! Shared task queue guarded by a single mutex and condition variable
//!
//! The queue and the shutdown flag live behind the same lock, so a worker
//! checking "queue empty and not shutting down" can never miss the broadcast
//! that ends its wait.

use crate::core::BoxedTask;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<BoxedTask>,
    shutdown: bool,
}

/// An unbounded FIFO of tasks shared by all workers of one pool
#[derive(Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TaskQueue")
            .field("pending", &state.tasks.len())
            .field("shutdown", &state.shutdown)
            .finish()
    }
}

impl TaskQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to the tail and wake one waiting worker
    ///
    /// Returns the task back if shutdown has already been requested.
    pub fn push(&self, task: BoxedTask) -> std::result::Result<(), BoxedTask> {
        {
            let mut state = self.state.lock();
            if state.shutdown {
                return Err(task);
            }
            state.tasks.push_back(task);
        }
        self.available.notify_one();
        Ok(())
    }

    /// Wait for a task or for shutdown
    ///
    /// Returns `None` once shutdown has been requested, even if tasks remain
    /// queued. The lock is released before the caller runs the task.
    pub fn take(&self) -> Option<BoxedTask> {
        let mut state = self.state.lock();
        while !state.shutdown && state.tasks.is_empty() {
            self.available.wait(&mut state);
        }
        if state.shutdown {
            return None;
        }
        state.tasks.pop_front()
    }

    /// Number of tasks waiting to be taken (advisory)
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Check if no tasks are waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        self.state.lock().shutdown
    }

    /// Set the shutdown flag and wake every waiting worker
    ///
    /// The flag is monotonic. Returns `false` if it was already set.
    pub fn shutdown(&self) -> bool {
        let first = {
            let mut state = self.state.lock();
            !std::mem::replace(&mut state.shutdown, true)
        };
        self.available.notify_all();
        first
    }

    /// Discard every pending task, returning how many were dropped
    pub fn clear(&self) -> usize {
        let dropped = std::mem::take(&mut self.state.lock().tasks);
        dropped.len()
    }
}
