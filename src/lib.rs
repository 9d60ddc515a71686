//! # Fixed Thread Pool
//!
//! A fixed-size worker thread pool fed from one shared FIFO queue, plus a
//! small synchronous filepath helper for building the tasks it runs.
//!
//! ## Features
//!
//! - **Fixed Worker Set**: N named threads, created by `start()` and joined on shutdown
//! - **Monitor Queue**: one mutex and one condition variable guard the queue and the shutdown flag
//! - **Synchronous Start-up**: `start()` returns only once every worker is running
//! - **Fire-and-forget Submission**: `add()` never blocks and returns nothing
//! - **No Drain on Shutdown**: tasks still queued at shutdown are dropped
//! - **Worker Statistics**: executed/panicked counters per worker
//!
//! ## Quick Start
//!
//! ```rust
//! use fixed_thread_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Create and start a thread pool with 4 workers named "io-1" .. "io-4"
//! let pool = ThreadPool::new(4, "io-")?;
//! pool.start()?;
//!
//! // Submit tasks
//! for i in 0..10 {
//!     pool.execute(move || {
//!         println!("Task {} executing", i);
//!     });
//! }
//!
//! println!("{} tasks still queued", pool.num_of_undone_task());
//!
//! // Stop the workers; anything still queued is dropped
//! pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Tasks
//!
//! ```rust
//! use fixed_thread_pool::prelude::*;
//!
//! struct Flush {
//!     segment: u32,
//! }
//!
//! impl Task for Flush {
//!     fn run(&mut self) {
//!         println!("Flushing segment {}", self.segment);
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Flush"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = ThreadPool::with_threads(2)?;
//! # pool.start()?;
//! pool.add(Flush { segment: 7 });
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Waiting for Results
//!
//! The pool has no result channel. Tasks report back through their own
//! captured state, for example a [`Latch`]:
//!
//! ```rust
//! use fixed_thread_pool::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(2)?;
//! pool.start()?;
//!
//! let done = Arc::new(Latch::new());
//! let signal = Arc::clone(&done);
//! pool.execute(move || signal.notify());
//!
//! done.wait();
//! pool.shutdown()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod fs;
pub mod pool;
pub mod prelude;
pub mod tracing;

pub use crate::core::{BoxedTask, ClosureTask, Latch, Result, Task, ThreadError};
pub use crate::pool::{PoolStats, ThreadPool, ThreadPoolConfig, WorkerStats};
