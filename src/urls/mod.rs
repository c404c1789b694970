// src/urls/mod.rs
// =============================================================================
// This module handles URL parsing and link normalization.
//
// Two jobs live here:
// - ParsedUrl: parse a raw string once, extract scheme and host, and decide
//   whether the URL is even crawlable (valid = has both scheme and host)
// - resolve(): turn a raw href found on a page into an absolute URL by
//   attaching the missing pieces from the page it was found on
//
// We use the `url` crate to:
// - Parse absolute URLs into their components
// - Detect relative references (the crate refuses to parse them standalone,
//   which is exactly the signal we need to classify them)
//
// Rust concepts:
// - Option<T>: scheme/host might be absent
// - Tuples: resolve() returns (resolved, skip) as a pair
// - Pattern matching on error variants
// =============================================================================

use url::Url;

// A URL parsed exactly once at construction time.
//
// Immutable after construction: workers hand these around but never edit
// them. `valid` is the gate the coordinator checks before fetching —
// a URL without both a scheme and a host is never fetched.
#[derive(Debug, Clone)]
pub struct ParsedUrl {
    raw: String,
    scheme: Option<String>,
    host: Option<String>,
    pub valid: bool,
}

impl ParsedUrl {
    // Parses a raw URL string into its components.
    //
    // This never fails: a string the `url` crate cannot parse (or one
    // missing a host, like "mailto:x@y.com") simply comes back with
    // valid = false. Callers decide what to do with invalid URLs;
    // the coordinator drops them silently.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(parsed) => {
                let scheme = Some(parsed.scheme().to_string()).filter(|s| !s.is_empty());
                let host = parsed.host_str().map(str::to_string).filter(|h| !h.is_empty());
                let valid = scheme.is_some() && host.is_some();
                Self {
                    raw: raw.to_string(),
                    scheme,
                    host,
                    valid,
                }
            }
            // Relative references ("/path") and garbage both land here
            Err(_) => Self {
                raw: raw.to_string(),
                scheme: None,
                host: None,
                valid: false,
            },
        }
    }

    /// The original string this URL was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

// Resolves a raw href from a page against the URL of that page.
//
// Returns (resolved, skip):
//   skip = true  -> the link must not be queued or counted (javascript
//                   pseudo-links, anchors, structurally broken links)
//   skip = false -> `resolved` is the absolute form to dedup and enqueue
//
// Classification:
//   javascript:...   -> skip (logged; these never lead anywhere fetchable)
//   "" or "#..."     -> skip (points back at the page it was found on)
//   mailto:, tel:..  -> skip (a scheme without a host can never be fetched)
//   /path            -> attach base scheme + base host
//   //host/path      -> attach base scheme only, host comes from the link
//   https://x.com/y  -> already absolute, passed through unchanged
pub fn resolve(base: &ParsedUrl, raw_link: &str) -> (String, bool) {
    let trimmed = raw_link.trim();

    // Anchors and empty hrefs would just re-crawl the current page
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return (trimmed.to_string(), true);
    }

    match Url::parse(trimmed) {
        Ok(parsed) => {
            // javascript:void(0) and friends parse fine but are pseudo-links
            if parsed.scheme().contains("javascript") {
                println!("  ⛔ Javascript found in scheme, skipping {}", trimmed);
                return (trimmed.to_string(), true);
            }
            // A scheme without a host (mailto:, tel:, data:) would be
            // rejected by the validity gate anyway; skipping it here keeps
            // it out of the frontier and off the link budget
            if parsed.host_str().map_or(true, str::is_empty) {
                return (trimmed.to_string(), true);
            }
            // Already absolute: pass the raw string through unchanged so we
            // dedup on exactly what the page author wrote
            (trimmed.to_string(), false)
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => resolve_relative(base, trimmed),
        // Structurally invalid (bad port, bad IPv6 literal, ...): skip
        // rather than propagating a fault into the crawl loop
        Err(_) => (trimmed.to_string(), true),
    }
}

// Attaches the missing scheme/host from the base URL to a relative link.
//
// Only reachable for links the `url` crate classified as relative
// references, so the link has no scheme of its own.
fn resolve_relative(base: &ParsedUrl, link: &str) -> (String, bool) {
    // A base we could not parse cannot lend out its scheme and host
    let (Some(scheme), Some(host)) = (base.scheme(), base.host()) else {
        return (link.to_string(), true);
    };

    if let Some(rest) = link.strip_prefix("//") {
        // Protocol-relative: the link carries its own host, we only
        // attach the scheme ("//y.com/p" -> "http://y.com/p")
        (format!("{}://{}", scheme, rest), false)
    } else if link.starts_with('/') {
        // Site-relative: attach scheme and host
        (format!("{}://{}{}", scheme, host, link), false)
    } else {
        // Bare path like "about.html": treat it as site-relative too
        (format!("{}://{}/{}", scheme, host, link), false)
    }
}
