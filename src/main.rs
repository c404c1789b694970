// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the seed URL and build the shared crawl state
// 3. Start the worker pool and a Ctrl-C watcher
// 4. When every worker has stopped, persist the visited-URL list
// 5. Exit with proper code (0 = crawl completed, 2 = startup error)
//
// Rust concepts used:
// - async/await: The workers fetch many pages concurrently
// - Arc: Shared ownership of the crawl state across tasks
// - Result<T, E>: For error handling at the application boundary
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - coordinator + worker pool
mod extract; // src/extract/ - anchor-href extraction
mod fetch; // src/fetch/ - HTTP fetching
mod output; // src/output.rs - visited-list persistence
mod state; // src/state/ - frontier, registries, counter, flag
mod urls; // src/urls/ - URL parsing and link resolution

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;

use cli::Cli;
use fetch::HttpFetcher;
use state::CrawlState;
use urls::ParsedUrl;

// The #[tokio::main] attribute creates a tokio runtime and runs our async
// code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Startup errors (bad seed, unparseable arguments) land here
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// The final summary, printable as a table line or as JSON with --json
#[derive(Debug, Serialize)]
struct CrawlSummary {
    seed_url: String,
    visited: usize,
    crawled: usize,
    accepted_links: usize,
    output_file: Option<String>,
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Reject a seed the crawler could never fetch before starting anything
    let seed = ParsedUrl::parse(&cli.seed_url);
    if !seed.valid {
        bail!(
            "invalid seed URL '{}': a scheme and a host are both required",
            cli.seed_url
        );
    }

    let max_count = cli.max_count.map(|n| n as usize);
    let state = Arc::new(CrawlState::new(max_count));
    state.seed(&cli.seed_url);

    let fetcher = Arc::new(HttpFetcher::new()?);

    println!("🕸️  Crawling from seed: {}", cli.seed_url);
    match max_count {
        Some(max) => println!("📊 Link limit: {}", max),
        None => println!("📊 Link limit: unbounded"),
    }

    // Ctrl-C must not leak workers: the watcher latches the shutdown flag
    // and the pool drains cooperatively, after which output is written as
    // on a normal run
    let interrupt_state = Arc::clone(&state);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("🛑 Interrupt received, stopping all workers");
            interrupt_state.request_shutdown();
        }
    });

    // Blocks until every worker has reached its STOPPED state
    crawl::run_pool(
        Arc::clone(&state),
        fetcher,
        cli.workers,
        crawl::WORKER_WAIT_INTERVAL,
        Duration::from_secs(cli.timeout),
    )
    .await;

    // Persist first, report second. A write failure is logged but the
    // crawl already finished, so the exit code stays 0.
    let visited = state.visited_urls();
    let output_file = match output::save_visited(&cli.output, &visited) {
        Ok(()) => {
            println!("💾 Links saved to {}", cli.output.display());
            Some(cli.output.display().to_string())
        }
        Err(e) => {
            eprintln!("⚠️  Unable to save links: {:#}", e);
            None
        }
    };

    let summary = CrawlSummary {
        seed_url: cli.seed_url,
        visited: visited.len(),
        crawled: state.crawled().len(),
        accepted_links: state.accepted_count(),
        output_file,
    };
    print_summary(&summary, cli.json)?;

    Ok(0)
}

// Prints the summary either as plain text or JSON
fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        // Serialize the summary to JSON and print
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("📊 Summary:");
        println!("   🔗 Visited: {}", summary.visited);
        println!("   📄 Crawled: {}", summary.crawled);
        println!("   ➕ Accepted links: {}", summary.accepted_links);
    }
    Ok(())
}
