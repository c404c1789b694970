// src/output.rs
// =============================================================================
// This module persists the final visited-URL list.
//
// The format is deliberately trivial: one URL per line, in discovery
// order, written after every worker has stopped. A write failure is
// reported to the caller with context but must not change the crawl's
// exit semantics — main() logs it and exits 0 regardless, because the
// crawl itself already finished.
// =============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// Writes the visited URLs to `path`, one per line.
pub fn save_visited(path: &Path, urls: &[String]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for url in urls {
        writeln!(writer, "{}", url)
            .with_context(|| format!("could not write to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("could not flush {}", path.display()))?;
    Ok(())
}
