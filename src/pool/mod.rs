//! Thread pool, its shared queue and worker implementations

pub mod config;
pub mod queue;
pub mod thread_pool;
pub mod worker;

pub use config::ThreadPoolConfig;
pub use queue::TaskQueue;
pub use thread_pool::{PoolStats, ThreadPool};
pub use worker::{Worker, WorkerStatSnapshot, WorkerStats};
