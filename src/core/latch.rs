//! One-shot wait/notify event
//!
//! The pool hands one [`Latch`] to every worker it spawns. The worker fires it
//! as soon as it is running, and `start()` waits on it before moving on, so
//! that no task can be submitted before a worker exists to pick it up.

use parking_lot::{Condvar, Mutex};
use std::time::Duration;

/// A one-shot event: once notified it stays fired
#[derive(Debug, Default)]
pub struct Latch {
    fired: Mutex<bool>,
    condvar: Condvar,
}

impl Latch {
    /// Create a latch that has not fired yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the latch, releasing every current and future waiter
    pub fn notify(&self) {
        let mut fired = self.fired.lock();
        *fired = true;
        self.condvar.notify_all();
    }

    /// Block until the latch has fired
    pub fn wait(&self) {
        let mut fired = self.fired.lock();
        while !*fired {
            self.condvar.wait(&mut fired);
        }
    }

    /// Block until the latch has fired or `timeout` elapses
    ///
    /// Returns `true` if the latch fired.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut fired = self.fired.lock();
        if !*fired {
            self.condvar
                .wait_while_for(&mut fired, |fired| !*fired, timeout);
        }
        *fired
    }

    /// Check whether the latch has fired
    pub fn is_fired(&self) -> bool {
        *self.fired.lock()
    }
}
