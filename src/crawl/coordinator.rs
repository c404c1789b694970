// src/crawl/coordinator.rs
// =============================================================================
// One crawl step, start to finish:
//
// 1. Drop invalid and already-crawled URLs (no side effects)
// 2. Fetch the body with a short timeout; any failure is logged and ends
//    the step — a bad URL must never take a worker down
// 3. Extract the raw anchor hrefs
// 4. Reserve a crawled slot: if the limit is already spent, abort before
//    marking anything
// 5. Mark the page crawled
// 6. Resolve each link against this page, try to accept it as new work,
//    and stop early once the limit latches the shutdown flag
//
// Nothing in here returns an error: every fault is handled where it
// happens, which is what keeps the worker loop fault-free.
// =============================================================================

use std::time::Duration;

use crate::extract;
use crate::fetch::Fetcher;
use crate::state::{Accept, CrawlState};
use crate::urls::{self, ParsedUrl};

// Crawls a single URL: fetch, extract, and feed new links back into the
// frontier. Infallible by design; see the module header.
pub async fn crawl<F: Fetcher>(
    state: &CrawlState,
    fetcher: &F,
    url: &ParsedUrl,
    timeout: Duration,
) {
    // Step 1: never fetch an invalid URL, never refetch a crawled one
    if !url.valid {
        return;
    }
    if state.crawled().contains(url.raw()) {
        return;
    }

    // Step 2: bounded fetch; each failure category gets its own log line
    let body = match fetcher.fetch(url.raw(), timeout).await {
        Ok(body) => body,
        Err(error) => {
            eprintln!("  ⚠️  Failed to fetch {}: {}", url.raw(), error);
            return;
        }
    };

    // Step 3: raw hrefs in document order; malformed pages yield nothing
    let links = extract::extract_links(&body);

    // Step 4: reserve a crawled slot. If the limit was spent while our
    // fetch was in flight, abort without marking anything.
    if !state.checkmax() {
        return;
    }

    // Step 5: a racing worker may have fetched the same page while we
    // were; only the winner processes its links
    if !state.crawled().check_and_mark(url.raw()) {
        return;
    }

    // Step 6
    process_links(state, url, &links);
}

// Resolves each raw link against the page it was found on and pushes the
// new ones onto the frontier.
//
// The accept (visited check + counter + limit comparison) is atomic in
// CrawlState; here we only decide the order: accepted links are enqueued,
// and once the shutdown flag latches we stop reading further links from
// this page — without reverting anything already queued.
pub fn process_links(state: &CrawlState, base: &ParsedUrl, links: &[String]) {
    for raw_link in links {
        let (resolved, skip) = urls::resolve(base, raw_link);
        if skip {
            continue;
        }

        // Fast pre-check before taking the ledger lock
        if state.is_visited(&resolved) {
            continue;
        }

        if state.accept_link(&resolved) == Accept::New {
            println!("  🔗 Found child link {}", resolved);
            state.push_frontier(resolved);
        }

        if state.is_shutdown() {
            break;
        }
    }
}
