//! # textharvest
//!
//! Builds small text datasets from public sources and runs simple analysis
//! over them:
//!
//! - Scrapes heterogeneous news sources: discovers an RSS/Atom feed when a
//!   page declares one, falls back to scanning `<article>` listing blocks,
//!   and extracts main article text with a readability heuristic
//! - Pulls arXiv preprint metadata and Codeforces problem metadata from
//!   their public APIs
//! - Persists every dataset as a flat CSV table
//! - Computes top-N word frequencies over a text column of such a table
//!
//! ## Architecture
//!
//! The news pipeline is the interesting part and flows source by source:
//!
//! 1. **Locate**: fetch the source page and look for a declared feed
//! 2. **Parse**: feed items when a feed exists, listing blocks otherwise
//! 3. **Extract**: fetch each article and isolate its main content, with
//!    the item's own summary as fallback
//! 4. **Emit**: one CSV row per article, deduplicated by URL across the run
//!
//! Everything runs sequentially with one request in flight at a time, and no
//! failure is fatal: fetch and parse problems are logged warnings that read
//! as "no data here", and the run always completes.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extract;
pub mod feed;
pub mod fetch;
pub mod listing;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod utils;
