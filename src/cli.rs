// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Usage shape:
//   crawlbound <seed_url> [max_count] [--workers N] [--output PATH]
//              [--timeout SECS] [--json]
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate parsing code for our types
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "crawlbound",
    version = "0.1.0",
    about = "A bounded multi-worker web crawler",
    long_about = "crawlbound starts at a seed URL, follows every link it discovers with a \
                  fixed pool of workers, and writes the list of visited URLs to a file. \
                  An optional maximum link count bounds how far the crawl spreads."
)]
pub struct Cli {
    /// Seed URL to start crawling from (e.g., http://example.com)
    ///
    /// Must have both a scheme and a host; anything else is rejected
    /// before any worker starts.
    pub seed_url: String,

    /// Maximum number of links to accept (unset = unbounded)
    ///
    /// This is a positional argument, matching `crawlbound <url> <count>`.
    /// The bound is a soft ceiling: pages already being fetched when the
    /// limit is reached may still contribute a few links.
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub max_count: Option<u64>,

    /// Number of concurrent workers
    ///
    /// #[arg(long, default_value_t = ...)] creates a --workers flag
    #[arg(long, default_value_t = crate::crawl::DEFAULT_WORKERS)]
    pub workers: usize,

    /// File the visited-URL list is written to, one URL per line
    #[arg(long, default_value = "output.txt")]
    pub output: PathBuf,

    /// Per-request fetch timeout in seconds
    #[arg(long, default_value_t = 2)]
    pub timeout: u64,

    /// Print the final summary as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}
