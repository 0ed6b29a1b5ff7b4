//! Shared environment configuration for all survey binaries.
//!
//! Consolidates `SURVEY_BASE_PATH`, `RAYON_NUM_THREADS`, and `SURVEY_LOG`
//! reads shared by every binary.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Install the fmt subscriber. Filter from `SURVEY_LOG` (fallback `RUST_LOG`,
/// default `info`). Logs go to stderr so stdout stays free for summaries.
pub fn init_logging() {
    let directives = std::env::var("SURVEY_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read `SURVEY_BASE_PATH` (default `"."`) and chdir into it.
pub fn init_base_path() -> Result<PathBuf> {
    let base_path = std::env::var("SURVEY_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    let path = PathBuf::from(&base_path);
    std::env::set_current_dir(&path).map_err(|e| Error::io(&path, e))?;
    if let Ok(cwd) = std::env::current_dir() {
        tracing::info!(base_path = %base_path, cwd = %cwd.display(), "working directory");
    }
    Ok(path)
}

/// Thread count from `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8).
pub fn thread_count() -> usize {
    std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(8)
}

/// Build the rayon global pool with [`thread_count`] workers.
/// Tolerates an already-initialized pool. Returns the thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = thread_count();
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        tracing::debug!("rayon global pool already initialized");
    }
    tracing::info!(threads = num_threads, "rayon threads");
    num_threads
}
