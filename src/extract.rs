//! Main-content extraction from article pages.
//!
//! Wraps the `readability` content-isolation heuristic with a raw-text
//! fallback: when the heuristic errors out, the whole page is used instead,
//! so extraction never fails outright. Either way the result is reduced to
//! tag-stripped, whitespace-joined visible text.

use scraper::Html;
use tracing::debug;
use url::Url;

/// Reduce markup to its visible text, trimming each text node and joining
/// the non-empty ones with single spaces.
pub fn visible_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Isolate and flatten the main content of an article page.
///
/// The readability pass produces partial markup for the main content block;
/// if it errors, the raw page stands in for it. Empty input yields an empty
/// string.
pub fn extract_article_text(html: &str, url: &Url) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    match readability::extractor::extract(&mut html.as_bytes(), url) {
        Ok(product) => visible_text(&product.content),
        Err(e) => {
            // Not a warning: the raw-text fallback is expected behavior.
            debug!(%url, error = %e, "Readability failed, using raw page text");
            visible_text(html)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_strips_tags() {
        let html = "<div><h1>Title</h1><p>First   paragraph.</p><p>Second.</p></div>";
        assert_eq!(visible_text(html), "Title First   paragraph. Second.");
    }

    #[test]
    fn test_visible_text_skips_whitespace_nodes() {
        let html = "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>";
        assert_eq!(visible_text(html), "one two");
    }

    #[test]
    fn test_visible_text_plain_string_passes_through() {
        assert_eq!(visible_text("just words"), "just words");
    }

    #[test]
    fn test_extract_empty_input() {
        let url = Url::parse("https://example.com/a").unwrap();
        assert_eq!(extract_article_text("", &url), "");
        assert_eq!(extract_article_text("   \n ", &url), "");
    }

    #[test]
    fn test_extract_article_body() {
        let url = Url::parse("https://example.com/a").unwrap();
        let html = r#"<html><head><title>t</title></head><body>
            <article>
              <h1>Big Story</h1>
              <p>Something happened today and this paragraph describes it in
                 enough detail to count as article content for this page.</p>
              <p>A second paragraph keeps the story going with more text so the
                 content block is clearly the main part of the document.</p>
            </article>
        </body></html>"#;
        let text = extract_article_text(html, &url);
        assert!(text.contains("Something happened today"));
        assert!(!text.contains('<'));
    }
}
