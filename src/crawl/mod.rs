// src/crawl/mod.rs
// =============================================================================
// This module contains the crawl core.
//
// Submodules:
// - coordinator: one crawl step (dedup, fetch, extract, resolve, enqueue)
// - worker: the fixed pool of tasks driving coordinator::crawl until the
//   shutdown flag is set
//
// This file (mod.rs) is the module root - it re-exports the pool API so
// callers write `crawl::run_pool()` instead of `crawl::worker::run_pool()`.
// The coordinator stays internal: only the workers drive it.
// =============================================================================

mod coordinator;
mod worker;

pub use worker::{run_pool, DEFAULT_WORKERS, WORKER_WAIT_INTERVAL};
