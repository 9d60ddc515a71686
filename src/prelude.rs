//! Convenient re-exports for common types and traits

pub use crate::core::{BoxedTask, ClosureTask, Latch, Result, Task, ThreadError};
pub use crate::pool::{PoolStats, ThreadPool, ThreadPoolConfig, WorkerStats};
