//! Basic thread pool usage example
//!
//! Demonstrates pool start-up, task submission, the advisory queue count,
//! statistics and the drop-on-shutdown policy.
//!
//! Run with: RUST_LOG=debug cargo run --example basic_usage

use fixed_thread_pool::fs;
use fixed_thread_pool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Fixed Thread Pool - Basic Usage Example ===\n");

    let pool = ThreadPool::new(4, "demo-")?;

    println!("1. Starting thread pool with {} threads", pool.num_threads());
    pool.start()?;

    println!("\n2. Submitting simple tasks:");
    // The pool has no completion handles; the last task to finish fires the latch
    let finished = Arc::new(AtomicUsize::new(0));
    let all_done = Arc::new(Latch::new());
    for i in 0..10 {
        let finished = Arc::clone(&finished);
        let all_done = Arc::clone(&all_done);
        pool.execute(move || {
            println!(
                "  Task {} executing on {}",
                i,
                thread::current().name().unwrap_or("<unnamed>")
            );
            thread::sleep(Duration::from_millis(50));
            if finished.fetch_add(1, Ordering::SeqCst) + 1 == 10 {
                all_done.notify();
            }
        });
    }
    println!("   Queued right after submission: {}", pool.num_of_undone_task());

    all_done.wait();

    println!("\n3. Writing files from tasks:");
    let dir = std::env::temp_dir().join("fixed_thread_pool_demo");
    let root = dir.to_string_lossy().into_owned();
    let written = Arc::new(Latch::new());
    {
        let root = root.clone();
        let written = Arc::clone(&written);
        pool.execute(move || {
            let path = fs::join(&root, "hello.txt");
            match fs::mkdir_recursive(&root).and_then(|_| fs::write_file(&path, "hello from a worker")) {
                Ok(()) => println!("  wrote {}", path),
                Err(e) => println!("  write failed: {}", e),
            }
            written.notify();
        });
    }
    written.wait();
    if let Ok(size) = fs::file_size(fs::join(&root, "hello.txt")) {
        println!("   File size: {} bytes", size);
    }
    let _ = fs::rm_dir_recursive(&root);

    println!("\n4. Statistics:");
    let stats = pool.stats();
    println!("   Total tasks submitted: {}", stats.tasks_submitted);
    println!("   Total tasks executed: {}", stats.tasks_executed);
    for (i, worker) in stats.workers.iter().enumerate() {
        println!("   Worker {}: {} executed", i, worker.tasks_executed);
    }
    if let Ok(json) = stats.to_json() {
        println!("   As JSON: {}", json);
    }

    println!("\n5. Shutting down with work still queued:");
    for _ in 0..20 {
        pool.execute(|| thread::sleep(Duration::from_millis(100)));
    }
    let dropped = pool.shutdown()?;
    println!("   {} queued tasks were dropped", dropped);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
