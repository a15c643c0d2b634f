//! Syndication feed discovery and parsing.
//!
//! Feeds are strongly preferred over scraping rendered listings: they are
//! structured and stable. Discovery is two-tier — explicit `<link
//! rel="alternate">` declarations first, informal `rss`/`feed` anchors as a
//! fallback. Parsing tolerates the two schema families in the wild,
//! item-based (RSS) and entry-based (Atom), and never errors: a malformed or
//! unrecognized document simply yields no items.

use crate::extract::visible_text;
use crate::fetch::Fetcher;
use crate::models::ArticleItem;
use itertools::Itertools;
use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

/// Which schema family a feed document belongs to.
///
/// Decided once per document; item-based wins when a document somehow
/// declares both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// RSS-style: `<rss>`/`<channel>` root with `<item>` children.
    ItemBased,
    /// Atom-style: `<feed>` root with `<entry>` children.
    EntryBased,
}

/// Classify a feed document by scanning for its root elements.
///
/// `rss` or `channel` anywhere marks the document item-based and short
/// circuits; `feed` marks it entry-based only when no item-based marker
/// appeared. Anything else (including unparseable input) is `None`.
pub fn detect_kind(xml: &str) -> Option<FeedKind> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entry_based = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"rss" | b"channel" => return Some(FeedKind::ItemBased),
                b"feed" => entry_based = true,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    entry_based.then_some(FeedKind::EntryBased)
}

/// Parse a feed document into article items.
///
/// Missing sub-elements yield empty strings, never an error. A document with
/// no recognizable feed root yields an empty list.
#[instrument(level = "debug", skip_all)]
pub fn parse_feed(xml: &str) -> Vec<ArticleItem> {
    let items = match detect_kind(xml) {
        Some(FeedKind::ItemBased) => parse_items(xml),
        Some(FeedKind::EntryBased) => parse_entries(xml),
        None => {
            debug!("Document has no rss/channel/feed root");
            Vec::new()
        }
    };
    debug!(count = items.len(), "Parsed feed items");
    items
}

fn decoded_text(t: &BytesText) -> String {
    match t.decode() {
        Ok(s) => s.into_owned(),
        Err(_) => String::from_utf8_lossy(t).into_owned(),
    }
}

/// Resolve a general entity reference (`&amp;`, `&#8217;`, ...) to its text.
/// Unknown entities resolve to nothing rather than leaking their names.
pub(crate) fn entity_text(r: &quick_xml::events::BytesRef) -> Option<String> {
    if let Ok(Some(ch)) = r.resolve_char_ref() {
        return Some(ch.to_string());
    }
    let name = r.decode().ok()?;
    quick_xml::escape::resolve_predefined_entity(&name).map(str::to_string)
}

/// Collapse runs of whitespace to single spaces and trim the edges.
///
/// Captured text accumulates raw, with entity references spliced in right
/// where they occurred, so mid-word references (`AT&amp;T`) reassemble
/// without a seam; this pass then flattens source-formatting whitespace.
pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// RSS items: url from `<link>` text with `<guid>` fallback, date from
/// `<pubDate>` with `<date>` fallback, summary from `<description>`.
fn parse_items(xml: &str) -> Vec<ArticleItem> {
    #[derive(Default)]
    struct Acc {
        title: Option<String>,
        link: Option<String>,
        guid: Option<String>,
        pub_date: Option<String>,
        date: Option<String>,
        description: Option<String>,
    }

    let mut reader = Reader::from_str(xml);

    let mut items = Vec::new();
    let mut acc: Option<Acc> = None;
    // (destination slot, extra nesting inside it)
    let mut capture: Option<(&'static str, usize)> = None;
    let mut buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if let Some((_, depth)) = capture.as_mut() {
                    *depth += 1;
                    buf.push(' ');
                } else if acc.is_none() {
                    if name.as_ref() == b"item" {
                        acc = Some(Acc::default());
                    }
                } else if let Some(item) = acc.as_ref() {
                    let slot = match name.as_ref() {
                        b"title" if item.title.is_none() => Some("title"),
                        b"link" if item.link.is_none() => Some("link"),
                        b"guid" if item.guid.is_none() => Some("guid"),
                        b"pubDate" if item.pub_date.is_none() => Some("pubDate"),
                        b"date" if item.date.is_none() => Some("date"),
                        b"description" if item.description.is_none() => Some("description"),
                        _ => None,
                    };
                    if let Some(slot) = slot {
                        capture = Some((slot, 0));
                        buf.clear();
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if capture.is_some() {
                    buf.push_str(&decoded_text(&t));
                }
            }
            Ok(Event::CData(cd)) => {
                if capture.is_some() {
                    buf.push_str(&String::from_utf8_lossy(&cd.into_inner()));
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if capture.is_some() {
                    if let Some(text) = entity_text(&r) {
                        buf.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => {
                if let Some((slot, depth)) = capture.as_mut() {
                    if *depth > 0 {
                        *depth -= 1;
                        buf.push(' ');
                    } else {
                        let value = normalize_ws(&buf);
                        buf.clear();
                        if let Some(item) = acc.as_mut() {
                            match *slot {
                                "title" => item.title = Some(value),
                                "link" => item.link = Some(value),
                                "guid" => item.guid = Some(value),
                                "pubDate" => item.pub_date = Some(value),
                                "date" => item.date = Some(value),
                                "description" => item.description = Some(value),
                                _ => unreachable!(),
                            }
                        }
                        capture = None;
                    }
                } else if e.local_name().as_ref() == b"item" {
                    if let Some(item) = acc.take() {
                        let url = match item.link {
                            Some(link) if !link.is_empty() => link,
                            _ => item.guid.unwrap_or_default(),
                        };
                        items.push(ArticleItem {
                            title: item.title.unwrap_or_default(),
                            url,
                            date: item.pub_date.or(item.date).unwrap_or_default(),
                            summary: item
                                .description
                                .map(|d| visible_text(&d))
                                .unwrap_or_default(),
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "Malformed feed document, keeping items parsed so far");
                break;
            }
            _ => {}
        }
    }
    items
}

/// Atom entries: url from the first `<link>` carrying an `href` attribute
/// (never its text), date from `<published>` with `<updated>` fallback,
/// summary from `<summary>` with `<content>` fallback.
fn parse_entries(xml: &str) -> Vec<ArticleItem> {
    #[derive(Default)]
    struct Acc {
        title: Option<String>,
        link_href: Option<String>,
        published: Option<String>,
        updated: Option<String>,
        summary: Option<String>,
        content: Option<String>,
    }

    let mut reader = Reader::from_str(xml);

    let mut items = Vec::new();
    let mut acc: Option<Acc> = None;
    let mut capture: Option<(&'static str, usize)> = None;
    let mut buf = String::new();

    fn link_href_of(e: &quick_xml::events::BytesStart) -> Option<String> {
        match e.try_get_attribute("href") {
            Ok(Some(attr)) => Some(
                attr.unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned()),
            ),
            _ => None,
        }
    }

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if let Some((_, depth)) = capture.as_mut() {
                    *depth += 1;
                    buf.push(' ');
                } else if acc.is_none() {
                    if name.as_ref() == b"entry" {
                        acc = Some(Acc::default());
                    }
                } else if let Some(entry) = acc.as_mut() {
                    match name.as_ref() {
                        b"link" => {
                            if entry.link_href.is_none() {
                                entry.link_href = link_href_of(&e);
                            }
                        }
                        b"title" if entry.title.is_none() => {
                            capture = Some(("title", 0));
                            buf.clear();
                        }
                        b"published" if entry.published.is_none() => {
                            capture = Some(("published", 0));
                            buf.clear();
                        }
                        b"updated" if entry.updated.is_none() => {
                            capture = Some(("updated", 0));
                            buf.clear();
                        }
                        b"summary" if entry.summary.is_none() => {
                            capture = Some(("summary", 0));
                            buf.clear();
                        }
                        b"content" if entry.content.is_none() => {
                            capture = Some(("content", 0));
                            buf.clear();
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                // Self-closing tags never nest and carry no text; only the
                // Atom link's href attribute matters here.
                if capture.is_none() {
                    if let Some(entry) = acc.as_mut() {
                        if e.local_name().as_ref() == b"link" && entry.link_href.is_none() {
                            entry.link_href = link_href_of(&e);
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if capture.is_some() {
                    buf.push_str(&decoded_text(&t));
                }
            }
            Ok(Event::CData(cd)) => {
                if capture.is_some() {
                    buf.push_str(&String::from_utf8_lossy(&cd.into_inner()));
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if capture.is_some() {
                    if let Some(text) = entity_text(&r) {
                        buf.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => {
                if let Some((slot, depth)) = capture.as_mut() {
                    if *depth > 0 {
                        *depth -= 1;
                        buf.push(' ');
                    } else {
                        let value = normalize_ws(&buf);
                        buf.clear();
                        if let Some(entry) = acc.as_mut() {
                            match *slot {
                                "title" => entry.title = Some(value),
                                "published" => entry.published = Some(value),
                                "updated" => entry.updated = Some(value),
                                "summary" => entry.summary = Some(value),
                                "content" => entry.content = Some(value),
                                _ => unreachable!(),
                            }
                        }
                        capture = None;
                    }
                } else if e.local_name().as_ref() == b"entry" {
                    if let Some(entry) = acc.take() {
                        items.push(ArticleItem {
                            title: entry.title.unwrap_or_default(),
                            url: entry.link_href.unwrap_or_default(),
                            date: entry.published.or(entry.updated).unwrap_or_default(),
                            summary: entry
                                .summary
                                .or(entry.content)
                                .map(|s| visible_text(&s))
                                .unwrap_or_default(),
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "Malformed feed document, keeping entries parsed so far");
                break;
            }
            _ => {}
        }
    }
    items
}

/// Find a declared or informal feed URL in a fetched page.
///
/// Tier one: `<link>` elements whose `rel` contains `alternate` and whose
/// `type` contains `rss`, `atom`, or `xml` (case-insensitive substrings).
/// Tier two, only when tier one finds nothing: anchors whose lowercased href
/// contains `rss` or `feed`. The winner is resolved against `base`; a feed
/// URL is never invented, only resolved from what the page declares.
pub fn discover_feed_in_page(html: &str, base: &Url) -> Option<Url> {
    let document = Html::parse_document(html);

    let link_selector = Selector::parse("link").unwrap();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let rel = element.value().attr("rel").unwrap_or("").to_ascii_lowercase();
        let kind = element
            .value()
            .attr("type")
            .unwrap_or("")
            .to_ascii_lowercase();
        if rel.contains("alternate")
            && ["rss", "atom", "xml"].iter().any(|x| kind.contains(x))
        {
            if let Ok(resolved) = base.join(href) {
                return Some(resolved);
            }
        }
    }

    let anchor_selector = Selector::parse("a[href]").unwrap();
    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let lowered = href.to_ascii_lowercase();
        if lowered.contains("rss") || lowered.contains("feed") {
            if let Ok(resolved) = base.join(href) {
                return Some(resolved);
            }
        }
    }

    None
}

/// Fetch a source page and look for its feed.
///
/// Returns the discovered feed URL, if any, together with the fetched page
/// text so callers can fall back to listing extraction. A failed fetch yields
/// `(None, None)`.
#[instrument(level = "debug", skip(fetcher))]
pub async fn locate_feed(fetcher: &Fetcher, page_url: &Url) -> (Option<Url>, Option<String>) {
    let html = match fetcher.text(page_url.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            warn!(url = %page_url, error = %e, "Failed to fetch source page");
            return (None, None);
        }
    };

    let feed_url = discover_feed_in_page(&html, page_url);
    if let Some(ref url) = feed_url {
        debug!(feed = %url, "Discovered feed");
    }
    (feed_url, Some(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kind_rss() {
        let xml = r#"<rss version="2.0"><channel></channel></rss>"#;
        assert_eq!(detect_kind(xml), Some(FeedKind::ItemBased));
    }

    #[test]
    fn test_detect_kind_atom() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        assert_eq!(detect_kind(xml), Some(FeedKind::EntryBased));
    }

    #[test]
    fn test_detect_kind_item_based_wins() {
        // A channel element anywhere takes precedence over a feed element.
        let xml = r#"<feed><channel></channel></feed>"#;
        assert_eq!(detect_kind(xml), Some(FeedKind::ItemBased));
    }

    #[test]
    fn test_detect_kind_unrecognized() {
        assert_eq!(detect_kind("<html><body/></html>"), None);
        assert_eq!(detect_kind("not xml at all"), None);
    }

    #[test]
    fn test_parse_rss_items() {
        let xml = r#"<rss version="2.0"><channel>
            <title>Site</title>
            <item>
                <title>A</title>
                <link>https://x.com/a</link>
                <pubDate>Mon, 05 Jan 2026 10:00:00 GMT</pubDate>
                <description>First story.</description>
            </item>
            <item>
                <title>B</title>
                <link>https://x.com/b</link>
            </item>
        </channel></rss>"#;

        let items = parse_feed(xml);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "A");
        assert_eq!(items[0].url, "https://x.com/a");
        assert_eq!(items[0].date, "Mon, 05 Jan 2026 10:00:00 GMT");
        assert_eq!(items[0].summary, "First story.");
        assert_eq!(items[1].title, "B");
        assert_eq!(items[1].url, "https://x.com/b");
        assert_eq!(items[1].date, "");
        assert_eq!(items[1].summary, "");
    }

    #[test]
    fn test_rss_guid_fallback_when_link_missing() {
        let xml = r#"<rss><channel><item>
            <title>A</title>
            <guid>https://x.com/guid-a</guid>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].url, "https://x.com/guid-a");
    }

    #[test]
    fn test_rss_guid_fallback_when_link_empty() {
        let xml = r#"<rss><channel><item>
            <link></link>
            <guid>https://x.com/guid-a</guid>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].url, "https://x.com/guid-a");
    }

    #[test]
    fn test_rss_link_preferred_over_guid() {
        let xml = r#"<rss><channel><item>
            <link>https://x.com/a</link>
            <guid>https://x.com/guid-a</guid>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].url, "https://x.com/a");
    }

    #[test]
    fn test_rss_date_fallback() {
        let xml = r#"<rss><channel><item>
            <date>2026-01-05</date>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].date, "2026-01-05");
    }

    #[test]
    fn test_rss_title_entity_resolved() {
        let xml = r#"<rss><channel><item>
            <title>Tom &amp; Jerry</title>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].title, "Tom & Jerry");
    }

    #[test]
    fn test_rss_title_entity_joins_adjacent_text() {
        // References split a title into several text events; the pieces must
        // reassemble exactly, with no seam around the resolved reference.
        let xml = r#"<rss><channel><item>
            <title>AT&amp;T earnings</title>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].title, "AT&T earnings");
    }

    #[test]
    fn test_rss_title_char_ref_mid_word() {
        let xml = r#"<rss><channel><item>
            <title>It&#8217;s official</title>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].title, "It\u{2019}s official");
    }

    #[test]
    fn test_rss_title_internal_whitespace_collapsed() {
        let xml = "<rss><channel><item>\n  <title>Across\n      two lines</title>\n</item></channel></rss>";
        let items = parse_feed(xml);
        assert_eq!(items[0].title, "Across two lines");
    }

    #[test]
    fn test_atom_title_entity_joins_adjacent_text() {
        let xml = r#"<feed><entry>
            <title>AT&amp;T earnings</title>
            <link href="https://x.com/a"/>
        </entry></feed>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].title, "AT&T earnings");
    }

    #[test]
    fn test_rss_description_markup_stripped_and_joined() {
        let xml = r#"<rss><channel><item>
            <description><![CDATA[<p>One.</p><p>Two.</p>]]></description>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].summary, "One. Two.");
    }

    #[test]
    fn test_atom_entries_use_href_attribute() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry>
                <title>A</title>
                <link href="https://x.com/a"/>
                <published>2026-01-05T10:00:00Z</published>
                <summary>Short.</summary>
            </entry>
        </feed>"#;
        let items = parse_feed(xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "A");
        assert_eq!(items[0].url, "https://x.com/a");
        assert_eq!(items[0].date, "2026-01-05T10:00:00Z");
        assert_eq!(items[0].summary, "Short.");
    }

    #[test]
    fn test_atom_link_without_href_skipped() {
        // The first link element lacks href; the second carries it.
        let xml = r#"<feed>
            <entry>
                <link>https://x.com/not-this</link>
                <link href="https://x.com/this"/>
            </entry>
        </feed>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].url, "https://x.com/this");
    }

    #[test]
    fn test_atom_updated_and_content_fallbacks() {
        let xml = r#"<feed>
            <entry>
                <updated>2026-01-06T00:00:00Z</updated>
                <content>Full body text.</content>
            </entry>
        </feed>"#;
        let items = parse_feed(xml);
        assert_eq!(items[0].date, "2026-01-06T00:00:00Z");
        assert_eq!(items[0].summary, "Full body text.");
    }

    #[test]
    fn test_parse_feed_unrecognized_root_yields_nothing() {
        assert!(parse_feed("<html><body><p>hi</p></body></html>").is_empty());
    }

    #[test]
    fn test_discover_declared_alternate_link() {
        let base = Url::parse("https://x.com/news").unwrap();
        let html = r#"<html><head>
            <link rel="stylesheet" href="/style.css">
            <link rel="alternate" type="application/rss+xml" href="/feed.xml">
        </head><body></body></html>"#;
        let found = discover_feed_in_page(html, &base);
        assert_eq!(found.unwrap().as_str(), "https://x.com/feed.xml");
    }

    #[test]
    fn test_discover_matches_atom_type() {
        let base = Url::parse("https://x.com/").unwrap();
        let html = r#"<link rel="alternate" type="application/atom+xml" href="atom.xml">"#;
        let found = discover_feed_in_page(html, &base);
        assert_eq!(found.unwrap().as_str(), "https://x.com/atom.xml");
    }

    #[test]
    fn test_discover_requires_alternate_rel() {
        let base = Url::parse("https://x.com/").unwrap();
        let html = r#"<link rel="canonical" type="application/rss+xml" href="/feed.xml">"#;
        assert!(discover_feed_in_page(html, &base).is_none());
    }

    #[test]
    fn test_discover_anchor_fallback() {
        let base = Url::parse("https://x.com/news").unwrap();
        let html = r#"<html><body>
            <a href="/about">About</a>
            <a href="/RSS/index.xml">Subscribe</a>
        </body></html>"#;
        let found = discover_feed_in_page(html, &base);
        assert_eq!(found.unwrap().as_str(), "https://x.com/RSS/index.xml");
    }

    #[test]
    fn test_discover_anchor_feed_substring() {
        let base = Url::parse("https://x.com/").unwrap();
        let html = r#"<a href="https://x.com/feeds/all">all posts</a>"#;
        let found = discover_feed_in_page(html, &base);
        assert_eq!(found.unwrap().as_str(), "https://x.com/feeds/all");
    }

    #[test]
    fn test_discover_declared_link_beats_anchor() {
        let base = Url::parse("https://x.com/").unwrap();
        let html = r#"
            <a href="/other/feed">feed link</a>
            <link rel="alternate" type="text/xml" href="/real-feed.xml">
        "#;
        let found = discover_feed_in_page(html, &base);
        assert_eq!(found.unwrap().as_str(), "https://x.com/real-feed.xml");
    }

    #[test]
    fn test_discover_nothing() {
        let base = Url::parse("https://x.com/").unwrap();
        let html = r#"<html><body><a href="/about">About</a></body></html>"#;
        assert!(discover_feed_in_page(html, &base).is_none());
    }
}
