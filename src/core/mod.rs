//! Core types and traits for the thread pool

pub mod error;
pub mod latch;
pub mod task;

pub use error::{Result, ThreadError};
pub use latch::Latch;
pub use task::{BoxedTask, ClosureTask, Task};
