// src/crawl/worker.rs
// =============================================================================
// The fixed worker pool.
//
// Each worker is a tokio task looping through three states:
//
//   IDLE     -> FETCHING   when the frontier yields a URL
//   FETCHING -> IDLE       when the crawl step returns (ok or handled error)
//   IDLE     -> STOPPED    when the shutdown flag is set
//
// The flag is checked once per wait-interval tick; STOPPED is terminal.
// The pool is started once at a fixed size — no dynamic resizing.
//
// Drain detection: a worker that finds the frontier empty with no crawl
// step in flight knows no new work can ever appear, and latches the
// shutdown flag so the whole pool exits instead of polling forever.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures::future;

use crate::crawl::coordinator;
use crate::fetch::Fetcher;
use crate::state::CrawlState;
use crate::urls::ParsedUrl;

/// Fixed number of workers started at initialization
pub const DEFAULT_WORKERS: usize = 4;

/// How long an idle worker waits before re-checking the frontier
pub const WORKER_WAIT_INTERVAL: Duration = Duration::from_secs(1);

// Starts `workers` tasks and blocks until every one of them has stopped.
//
// Workers only ever stop through the shutdown flag (limit reached, crawl
// drained, or Ctrl-C), so joining the pool is the "crawl finished" signal
// the caller persists output on.
pub async fn run_pool<F>(
    state: Arc<CrawlState>,
    fetcher: Arc<F>,
    workers: usize,
    wait_interval: Duration,
    fetch_timeout: Duration,
) where
    F: Fetcher + 'static,
{
    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let state = Arc::clone(&state);
        let fetcher = Arc::clone(&fetcher);
        handles.push(tokio::spawn(worker_loop(
            state,
            fetcher,
            worker_id,
            wait_interval,
            fetch_timeout,
        )));
    }

    // A panicking worker only takes its own task down; the join error is
    // logged and the rest of the pool keeps draining
    for result in future::join_all(handles).await {
        if let Err(error) = result {
            eprintln!("⚠️  Worker task failed: {}", error);
        }
    }
}

// One worker's loop. Every fault below the fetch boundary is handled
// inside crawl(); a single bad URL never ends the loop.
async fn worker_loop<F: Fetcher>(
    state: Arc<CrawlState>,
    fetcher: Arc<F>,
    worker_id: usize,
    wait_interval: Duration,
    fetch_timeout: Duration,
) {
    while !state.is_shutdown() {
        match state.pop_frontier() {
            Some(raw) => {
                println!("🕷️  Worker {} crawling {}", worker_id, raw);
                let url = ParsedUrl::parse(&raw);
                coordinator::crawl(state.as_ref(), fetcher.as_ref(), &url, fetch_timeout).await;
                state.finish_crawl();
            }
            None => {
                // Empty frontier and nothing in flight: the crawl is done.
                // Links are pushed before finish_crawl(), so this check
                // cannot miss late arrivals.
                if state.is_drained() {
                    state.request_shutdown();
                    break;
                }
            }
        }
        tokio::time::sleep(wait_interval).await;
    }
    println!("🛑 Stopping worker {}", worker_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use std::collections::HashMap;

    struct StubFetcher {
        pages: HashMap<String, String>,
    }

    impl StubFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            }
        }
    }

    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or(FetchError::ConnectionRefused)
        }
    }

    const FAST_TICK: Duration = Duration::from_millis(5);
    const TIMEOUT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_pool_drains_and_stops_on_finite_site() {
        // End-to-end scenario: one page, four hrefs, three of which
        // survive normalization and dedup
        let state = Arc::new(CrawlState::new(None));
        state.seed("http://example.com");
        let body = concat!(
            r#"<a href="/about">About</a>"#,
            r#"<a href="http://example.com/about">Same</a>"#,
            r#"<a href="javascript:x">JS</a>"#,
            r#"<a href="http://other.com/">Other</a>"#,
        );
        let fetcher = Arc::new(StubFetcher::new(&[("http://example.com", body)]));

        run_pool(Arc::clone(&state), fetcher, 4, FAST_TICK, TIMEOUT).await;

        assert_eq!(
            state.visited_urls(),
            vec!["http://example.com", "http://example.com/about", "http://other.com/"]
        );
        // The discovered pages were attempted (and failed to fetch), so
        // only the seed made it into the crawled registry
        assert!(state.crawled().contains("http://example.com"));
        assert!(state.is_shutdown());
    }

    #[tokio::test]
    async fn test_pool_honors_max_count() {
        let state = Arc::new(CrawlState::new(Some(3)));
        state.seed("http://a.test/");
        // Every page links to three fresh pages; without the limit this
        // crawl would fan out forever
        let fetcher = Arc::new(StubFetcher::new(&[
            (
                "http://a.test/",
                r#"<a href="/1">1</a><a href="/2">2</a><a href="/3">3</a><a href="/4">4</a>"#,
            ),
            ("http://a.test/1", r#"<a href="/5">5</a><a href="/6">6</a>"#),
            ("http://a.test/2", r#"<a href="/7">7</a>"#),
            ("http://a.test/3", r#"<a href="/8">8</a>"#),
        ]));

        run_pool(Arc::clone(&state), fetcher, 2, FAST_TICK, TIMEOUT).await;

        // Seed plus exactly max_count accepted links
        assert_eq!(state.accepted_count(), 3);
        assert_eq!(state.visited_urls().len(), 4);
        assert!(state.is_shutdown());
    }

    #[tokio::test]
    async fn test_pool_stops_on_external_shutdown() {
        // An already-latched flag (e.g. Ctrl-C before any work) means the
        // pool starts, observes it, and exits without crawling
        let state = Arc::new(CrawlState::new(None));
        state.seed("http://example.com");
        state.request_shutdown();
        let fetcher = Arc::new(StubFetcher::new(&[(
            "http://example.com",
            r#"<a href="/a">a</a>"#,
        )]));

        run_pool(Arc::clone(&state), fetcher, 4, FAST_TICK, TIMEOUT).await;

        assert!(!state.crawled().contains("http://example.com"));
        assert_eq!(state.visited_urls(), vec!["http://example.com"]);
    }

    #[tokio::test]
    async fn test_workers_survive_bad_urls() {
        // A junk URL in the frontier must not kill the pool; the crawl
        // still drains and the good page still gets fetched
        let state = Arc::new(CrawlState::new(None));
        state.push_frontier("::::not-a-url::::".to_string());
        state.seed("http://example.com");
        let fetcher = Arc::new(StubFetcher::new(&[("http://example.com", "<p>leaf</p>")]));

        run_pool(Arc::clone(&state), fetcher, 2, FAST_TICK, TIMEOUT).await;

        assert!(state.crawled().contains("http://example.com"));
    }
}
