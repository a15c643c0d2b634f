//! Listing-page extraction for sources without a discoverable feed.
//!
//! Scans `<article>` blocks on a rendered page and pulls out a best-effort
//! title, date, summary, and link for each one. Strictly the fallback path;
//! the pipeline only reaches here when feed discovery and parsing produced
//! nothing.

use crate::models::ArticleItem;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());
static H3: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Placeholder used when an article block has no usable heading.
pub const NO_TITLE: &str = "No Title";

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract candidate articles from a rendered listing page.
///
/// Per `<article>` block: the first `h2` (else `h3`) supplies the title,
/// falling back to the literal `"No Title"`; the first `<time>` supplies the
/// date; all paragraph texts are space-joined into the summary; the first
/// anchor's href is resolved against `base_url`, defaulting to `base_url`
/// itself when the block has no link.
#[instrument(level = "debug", skip(html))]
pub fn parse_listing(html: &str, base_url: &Url) -> Vec<ArticleItem> {
    let document = Html::parse_document(html);

    let mut items = Vec::new();
    for block in document.select(&ARTICLE) {
        let title = block
            .select(&H2)
            .next()
            .or_else(|| block.select(&H3).next())
            .map(element_text)
            .unwrap_or_else(|| NO_TITLE.to_string());

        let date = block
            .select(&TIME)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let summary = block
            .select(&PARAGRAPH)
            .map(element_text)
            .collect::<Vec<_>>()
            .join(" ");

        let url = block
            .select(&ANCHOR)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| base_url.join(href).ok())
            .unwrap_or_else(|| base_url.clone())
            .to_string();

        items.push(ArticleItem {
            title,
            url,
            date,
            summary,
        });
    }

    debug!(count = items.len(), "Parsed listing blocks");
    items
}
