// src/state/registry.rs
// =============================================================================
// A tiny concurrent set of URL strings.
//
// Both the "crawled" registry (pages actually fetched) and, inside the
// ledger, the "visited" set (links discovered and queued) need the same
// operation: check membership and insert in one atomic step, so two
// workers racing on the same URL cannot both win.
//
// Rust concepts:
// - Mutex<HashSet<String>>: the whole check-then-mark sequence runs under
//   one lock, turning it into a single critical section
// =============================================================================

use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashSet<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // Atomically checks membership and inserts when absent.
    //
    // Returns true when the URL was new (this caller owns it now) and
    // false when some other caller already marked it. Exactly one caller
    // ever gets true for a given URL.
    pub fn check_and_mark(&self, url: &str) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains(url) {
            false
        } else {
            entries.insert(url.to_string());
            true
        }
    }

    /// Plain membership test, for fast pre-checks before doing real work
    pub fn contains(&self, url: &str) -> bool {
        self.entries.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_check_and_mark_first_wins() {
        let registry = Registry::new();
        assert!(registry.check_and_mark("http://example.com"));
        assert!(!registry.check_and_mark("http://example.com"));
        assert!(registry.contains("http://example.com"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_contains_does_not_insert() {
        let registry = Registry::new();
        assert!(!registry.contains("http://example.com"));
        assert!(registry.check_and_mark("http://example.com"));
    }

    #[test]
    fn test_concurrent_mark_single_winner() {
        // Many threads race to mark the same URL; exactly one may win
        let registry = Arc::new(Registry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                let mut wins = 0;
                for i in 0..1000 {
                    if registry.check_and_mark(&format!("http://example.com/{}", i)) {
                        wins += 1;
                    }
                }
                wins
            }));
        }
        let total_wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total_wins, 1000);
        assert_eq!(registry.len(), 1000);
    }
}
