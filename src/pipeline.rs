//! The news pipeline: feed discovery, item parsing, article extraction, and
//! CSV emission.
//!
//! Sources are processed strictly in the order given, one request in flight
//! at a time. Failures never abort the run: a dead source or article is
//! logged and skipped, and the pipeline always completes, possibly with zero
//! rows.

use crate::extract::extract_article_text;
use crate::fetch::Fetcher;
use crate::feed::{locate_feed, parse_feed};
use crate::listing::{parse_listing, NO_TITLE};
use crate::models::SourceRecord;
use crate::utils::truncate_for_log;
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Short label for a source: its host with a leading `www.` stripped.
///
/// Unparseable input is passed through unchanged so the label is never empty
/// for a non-empty source string.
pub fn source_label(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| url.to_string()),
        Err(_) => url.to_string(),
    }
}

/// Scrape every source and write the combined dataset to `out_path`.
///
/// Per source: discover a feed and parse it; when that yields nothing but the
/// source page itself was fetched, fall back to scanning its `<article>`
/// blocks. Each surviving item is fetched and its main content extracted,
/// with the item's own summary as fallback text. At most `max_per_source`
/// rows are emitted per source, counted after URL deduplication, and a URL is
/// never emitted twice within one run, across all sources.
///
/// Returns the number of rows written.
#[instrument(level = "info", skip(fetcher, sources), fields(sources = sources.len()))]
pub async fn scrape_news(
    fetcher: &Fetcher,
    sources: &[String],
    max_per_source: usize,
    out_path: &Path,
) -> Result<usize, Box<dyn Error>> {
    // The header is written up front so an all-empty run still produces a
    // valid table; has_headers(false) keeps serialize from repeating it.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(out_path)?;
    writer.write_record(["source", "title", "date", "url", "content"])?;

    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut rows = 0usize;

    for source_url in sources {
        let source = source_label(source_url);
        let base = match Url::parse(source_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(url = %source_url, error = %e, "Skipping unparseable source URL");
                continue;
            }
        };

        let (feed_url, page_html) = locate_feed(fetcher, &base).await;

        let mut items = Vec::new();
        if let Some(feed_url) = feed_url {
            match fetcher.text(feed_url.as_str()).await {
                Ok(feed_xml) => items = parse_feed(&feed_xml),
                Err(e) => warn!(feed = %feed_url, error = %e, "Failed to fetch feed"),
            }
        }

        if items.is_empty() {
            if let Some(ref html) = page_html {
                items = parse_listing(html, &base);
            }
        }

        if items.is_empty() {
            warn!(source = %source_url, "No items found for source");
            continue;
        }
        info!(source = %source, count = items.len(), "Collected candidate items");

        let mut emitted = 0usize;
        for item in items {
            if emitted >= max_per_source {
                break;
            }

            let raw_url = if item.url.is_empty() {
                source_url.as_str()
            } else {
                item.url.as_str()
            };
            let article_url = match base.join(raw_url) {
                Ok(resolved) => resolved,
                Err(e) => {
                    debug!(url = %raw_url, error = %e, "Skipping unresolvable item URL");
                    continue;
                }
            };
            if !seen_urls.insert(article_url.to_string()) {
                debug!(url = %article_url, "Skipping already-emitted URL");
                continue;
            }

            let mut content = match fetcher.text(article_url.as_str()).await {
                Ok(html) => extract_article_text(&html, &article_url),
                Err(e) => {
                    warn!(url = %article_url, error = %e, "Failed to fetch article");
                    String::new()
                }
            };
            if content.is_empty() {
                content = item.summary;
            }
            debug!(
                url = %article_url,
                preview = %truncate_for_log(&content, 120),
                "Emitting row"
            );

            writer.serialize(SourceRecord {
                source: source.clone(),
                title: if item.title.is_empty() {
                    NO_TITLE.to_string()
                } else {
                    item.title
                },
                date: item.date,
                url: article_url.to_string(),
                content,
            })?;
            emitted += 1;
            rows += 1;
        }

        info!(source = %source, emitted, "Finished source");
    }

    writer.flush()?;
    info!(rows, path = %out_path.display(), "Wrote news dataset");
    Ok(rows)
}
