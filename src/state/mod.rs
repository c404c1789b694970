// src/state/mod.rs
// =============================================================================
// This module owns every piece of state the workers share:
//
// - the frontier: a FIFO queue of URLs waiting to be fetched
// - the visited ledger: every URL ever discovered and queued, plus the
//   crawl counter that enforces the max-count limit
// - the crawled registry: pages whose bodies were actually fetched
// - the shutdown flag: the cooperative kill switch every worker polls
//
// Everything lives in one CrawlState object that main() builds and hands
// to the pool behind an Arc; no ambient globals.
//
// Concurrency invariants:
// - "check visited, insert, bump counter, compare against max" is ONE
//   critical section (accept_link), so no link is counted twice and the
//   counter can only overshoot by links already accepted in flight
// - the in-flight gauge moves inside the frontier's critical section on
//   pop, so "frontier empty and nothing in flight" really means drained
//
// Rust concepts:
// - Arc<CrawlState>: shared ownership across worker tasks
// - AtomicBool/AtomicUsize: lock-free reads on the hot polling paths
// =============================================================================

mod registry;

pub use registry::Registry;

use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// The visited set and the crawl counter share one lock: marking a link
// visited and counting it must happen together or two workers racing at
// the limit boundary could blow past it unboundedly.
#[derive(Debug, Default)]
struct Ledger {
    visited: HashSet<String>,
    // Discovery order, for the output file
    order: Vec<String>,
    accepted: usize,
}

/// Outcome of trying to accept a newly-discovered link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// New link: it was recorded and counted, caller should enqueue it
    New,
    /// Already in the visited set, or the limit has been reached
    Rejected,
}

#[derive(Debug)]
pub struct CrawlState {
    frontier: Mutex<VecDeque<String>>,
    ledger: Mutex<Ledger>,
    crawled: Registry,
    max_count: Option<usize>,
    shutdown: AtomicBool,
    in_flight: AtomicUsize,
}

impl CrawlState {
    pub fn new(max_count: Option<usize>) -> Self {
        Self {
            frontier: Mutex::new(VecDeque::new()),
            ledger: Mutex::new(Ledger::default()),
            crawled: Registry::new(),
            max_count,
            shutdown: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
        }
    }

    // Records the seed URL as visited and puts it on the frontier.
    //
    // The seed is not counted against max_count: the counter tracks links
    // *discovered* during the crawl, and the seed was handed to us.
    pub fn seed(&self, url: &str) {
        let mut ledger = self.ledger.lock();
        if ledger.visited.insert(url.to_string()) {
            ledger.order.push(url.to_string());
        }
        drop(ledger);
        self.push_frontier(url.to_string());
    }

    /// Appends a URL at the tail of the frontier
    pub fn push_frontier(&self, url: String) {
        self.frontier.lock().push_back(url);
    }

    // Pops the next URL off the head of the frontier, non-blocking.
    //
    // A successful pop bumps the in-flight gauge inside the queue's
    // critical section; the worker must call finish_crawl() once the
    // crawl step for the popped URL has returned.
    pub fn pop_frontier(&self) -> Option<String> {
        let mut frontier = self.frontier.lock();
        let url = frontier.pop_front();
        if url.is_some() {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
        }
        url
    }

    /// Marks the crawl step for a previously popped URL as finished
    pub fn finish_crawl(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    // True when the frontier is empty and no popped URL is still being
    // crawled. Links are pushed while their page's crawl step is still
    // in flight, so once this returns true no new work can appear.
    pub fn is_drained(&self) -> bool {
        let frontier = self.frontier.lock();
        frontier.is_empty() && self.in_flight.load(Ordering::SeqCst) == 0
    }

    // Tries to accept a newly-discovered link as work.
    //
    // One critical section covers: the visited check, the insertion, the
    // counter increment, and the limit comparison. When the increment
    // makes the counter reach max_count the shutdown flag latches — the
    // boundary link itself is still accepted (soft ceiling), everything
    // after it is rejected.
    pub fn accept_link(&self, url: &str) -> Accept {
        let mut ledger = self.ledger.lock();
        if ledger.visited.contains(url) {
            return Accept::Rejected;
        }
        if self.is_shutdown() {
            return Accept::Rejected;
        }
        ledger.visited.insert(url.to_string());
        ledger.order.push(url.to_string());
        ledger.accepted += 1;
        if let Some(max) = self.max_count {
            if ledger.accepted >= max {
                println!("🛑 Maximum count reached, stopping workers");
                self.request_shutdown();
            }
        }
        Accept::New
    }

    // Checks whether the limit still has room, latching the shutdown flag
    // when it does not. Called by the coordinator before it commits to
    // marking a page as crawled.
    pub fn checkmax(&self) -> bool {
        let ledger = self.ledger.lock();
        match self.max_count {
            Some(max) if ledger.accepted >= max => {
                self.request_shutdown();
                false
            }
            _ => true,
        }
    }

    /// Fast membership pre-check against the visited set
    pub fn is_visited(&self, url: &str) -> bool {
        self.ledger.lock().visited.contains(url)
    }

    /// The crawled registry: pages whose bodies were actually fetched
    pub fn crawled(&self) -> &Registry {
        &self.crawled
    }

    /// Number of links accepted so far (the seed is not counted)
    pub fn accepted_count(&self) -> usize {
        self.ledger.lock().accepted
    }

    /// Sets the cooperative kill switch; write-once, never reset
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Every visited URL, in discovery order (what the output file holds)
    pub fn visited_urls(&self) -> Vec<String> {
        self.ledger.lock().order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_frontier_is_fifo() {
        let state = CrawlState::new(None);
        state.push_frontier("http://a.com".to_string());
        state.push_frontier("http://b.com".to_string());
        state.push_frontier("http://c.com".to_string());
        assert_eq!(state.pop_frontier().as_deref(), Some("http://a.com"));
        assert_eq!(state.pop_frontier().as_deref(), Some("http://b.com"));
        assert_eq!(state.pop_frontier().as_deref(), Some("http://c.com"));
        assert_eq!(state.pop_frontier(), None);
    }

    #[test]
    fn test_seed_is_visited_but_not_counted() {
        let state = CrawlState::new(Some(5));
        state.seed("http://example.com");
        assert!(state.is_visited("http://example.com"));
        assert_eq!(state.accepted_count(), 0);
        assert_eq!(state.pop_frontier().as_deref(), Some("http://example.com"));
    }

    #[test]
    fn test_accept_link_dedups() {
        let state = CrawlState::new(None);
        assert_eq!(state.accept_link("http://a.com"), Accept::New);
        assert_eq!(state.accept_link("http://a.com"), Accept::Rejected);
        assert_eq!(state.accepted_count(), 1);
    }

    #[test]
    fn test_limit_latches_shutdown() {
        let state = CrawlState::new(Some(2));
        assert_eq!(state.accept_link("http://a.com"), Accept::New);
        assert!(!state.is_shutdown());
        // The boundary link is still accepted, then the flag latches
        assert_eq!(state.accept_link("http://b.com"), Accept::New);
        assert!(state.is_shutdown());
        assert_eq!(state.accept_link("http://c.com"), Accept::Rejected);
        assert_eq!(state.accepted_count(), 2);
    }

    #[test]
    fn test_checkmax_under_limit() {
        let state = CrawlState::new(Some(1));
        assert!(state.checkmax());
        state.accept_link("http://a.com");
        assert!(!state.checkmax());
        assert!(state.is_shutdown());
    }

    #[test]
    fn test_checkmax_unbounded() {
        let state = CrawlState::new(None);
        for i in 0..100 {
            state.accept_link(&format!("http://example.com/{}", i));
        }
        assert!(state.checkmax());
        assert!(!state.is_shutdown());
    }

    #[test]
    fn test_drain_tracking() {
        let state = CrawlState::new(None);
        state.push_frontier("http://a.com".to_string());
        assert!(!state.is_drained());
        let _ = state.pop_frontier();
        // Popped but the crawl step has not finished: not drained yet
        assert!(!state.is_drained());
        state.push_frontier("http://b.com".to_string());
        state.finish_crawl();
        assert!(!state.is_drained());
        let _ = state.pop_frontier();
        state.finish_crawl();
        assert!(state.is_drained());
    }

    #[test]
    fn test_visited_urls_keep_discovery_order() {
        let state = CrawlState::new(None);
        state.seed("http://seed.com");
        state.accept_link("http://b.com");
        state.accept_link("http://a.com");
        assert_eq!(
            state.visited_urls(),
            vec!["http://seed.com", "http://b.com", "http://a.com"]
        );
    }

    #[test]
    fn test_concurrent_push_pop_no_loss_no_duplication() {
        // N producers and N consumers hammer the frontier; every pushed
        // item must come out exactly once
        let state = Arc::new(CrawlState::new(None));
        let producers = 4;
        let per_producer = 1000;

        let mut handles = Vec::new();
        for p in 0..producers {
            let state = Arc::clone(&state);
            handles.push(std::thread::spawn(move || {
                for i in 0..per_producer {
                    state.push_frontier(format!("http://example.com/{}/{}", p, i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let mut consumers = Vec::new();
        for _ in 0..producers {
            let state = Arc::clone(&state);
            consumers.push(std::thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(url) = state.pop_frontier() {
                    seen.push(url);
                    state.finish_crawl();
                }
                seen
            }));
        }

        let mut all: Vec<String> = Vec::new();
        for consumer in consumers {
            all.extend(consumer.join().unwrap());
        }
        assert_eq!(all.len(), producers * per_producer);
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), producers * per_producer);
    }

    #[test]
    fn test_concurrent_accept_soft_ceiling() {
        // Workers racing to accept links may overshoot the limit only by
        // what was accepted in flight; with accept_link's single critical
        // section the count never exceeds the max at all
        let state = Arc::new(CrawlState::new(Some(50)));
        let mut handles = Vec::new();
        for t in 0..8 {
            let state = Arc::clone(&state);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let _ = state.accept_link(&format!("http://example.com/{}/{}", t, i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(state.accepted_count(), 50);
        assert!(state.is_shutdown());
    }
}
