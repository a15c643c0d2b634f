//! arXiv preprint metadata via the export API.
//!
//! One Atom query per run: `search_query=cat:{category}`. Each entry becomes
//! a row of `title,authors,summary,published,link`.

use crate::fetch::Fetcher;
use crate::models::ArxivPaper;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

const API_BASE: &str = "https://export.arxiv.org/api/query";

/// Build the export API query URL for a category.
pub fn query_url(category: &str, max_results: usize) -> String {
    format!(
        "{API_BASE}?search_query=cat:{}&start=0&max_results={}",
        urlencoding::encode(category),
        max_results
    )
}

/// Parse an arXiv Atom response into paper rows.
///
/// Author names are joined with `", "`; the entry `id` doubles as the
/// abstract link. Missing elements yield empty fields.
pub fn parse_response(xml: &str) -> Vec<ArxivPaper> {
    let mut reader = Reader::from_str(xml);

    let mut papers = Vec::new();
    let mut current: Option<ArxivPaper> = None;
    let mut authors: Vec<String> = Vec::new();
    let mut in_author = false;
    let mut capture: Option<&'static str> = None;
    let mut buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"entry" if current.is_none() => {
                    current = Some(ArxivPaper::default());
                    authors.clear();
                }
                b"author" if current.is_some() => in_author = true,
                b"name" if in_author => {
                    capture = Some("name");
                    buf.clear();
                }
                b"title" | b"summary" | b"published" | b"id" if current.is_some() && !in_author => {
                    capture = Some(match e.local_name().as_ref() {
                        b"title" => "title",
                        b"summary" => "summary",
                        b"published" => "published",
                        _ => "id",
                    });
                    buf.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if capture.is_some() {
                    buf.push_str(&t.decode().unwrap_or_default());
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if capture.is_some() {
                    if let Some(text) = crate::feed::entity_text(&r) {
                        buf.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if let Some(slot) = capture.take() {
                    // Raw text with references spliced in place; source
                    // line-wrapping collapses to single spaces.
                    let value = crate::feed::normalize_ws(&buf);
                    buf.clear();
                    if slot == "name" {
                        authors.push(value);
                    } else if let Some(paper) = current.as_mut() {
                        match slot {
                            "title" => paper.title = value,
                            "summary" => paper.summary = value,
                            "published" => paper.published = value,
                            "id" => paper.link = value,
                            _ => unreachable!(),
                        }
                    }
                } else if name.as_ref() == b"author" {
                    in_author = false;
                } else if name.as_ref() == b"entry" {
                    if let Some(mut paper) = current.take() {
                        paper.authors = authors.join(", ");
                        papers.push(paper);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "Malformed arXiv response, keeping entries parsed so far");
                break;
            }
            _ => {}
        }
    }
    papers
}

/// Pull one category's recent preprints and write them to `out_path`.
///
/// A failed fetch or an unreadable response leaves only the header row;
/// returns the number of data rows written.
#[instrument(level = "info", skip(fetcher))]
pub async fn scrape_arxiv(
    fetcher: &Fetcher,
    category: &str,
    max_results: usize,
    out_path: &Path,
) -> Result<usize, Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(out_path)?;
    writer.write_record(["title", "authors", "summary", "published", "link"])?;

    let url = query_url(category, max_results);
    let papers = match fetcher.text(&url).await {
        Ok(xml) => parse_response(&xml),
        Err(e) => {
            warn!(error = %e, "Failed to fetch arXiv feed");
            Vec::new()
        }
    };

    let count = papers.len();
    for paper in papers {
        writer.serialize(paper)?;
    }
    writer.flush()?;
    info!(count, category, path = %out_path.display(), "Wrote arXiv dataset");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <feed xmlns="http://www.w3.org/2005/Atom">
          <title>ArXiv Query Results</title>
          <entry>
            <id>http://arxiv.org/abs/2601.00001v1</id>
            <title>Learning Things
               From Data</title>
            <summary>We learn things
               from data.</summary>
            <published>2026-01-02T00:00:00Z</published>
            <author><name>Ada Lovelace</name></author>
            <author><name>Alan Turing</name></author>
          </entry>
        </feed>"#;

    #[test]
    fn test_parse_entry_fields() {
        let papers = parse_response(SAMPLE);
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].title, "Learning Things From Data");
        assert_eq!(papers[0].summary, "We learn things from data.");
        assert_eq!(papers[0].published, "2026-01-02T00:00:00Z");
        assert_eq!(papers[0].link, "http://arxiv.org/abs/2601.00001v1");
    }

    #[test]
    fn test_title_entity_joins_adjacent_text() {
        let xml = r#"<feed><entry>
            <id>http://arxiv.org/abs/2601.00002v1</id>
            <title>R&amp;D pipelines at scale</title>
        </entry></feed>"#;
        let papers = parse_response(xml);
        assert_eq!(papers[0].title, "R&D pipelines at scale");
    }

    #[test]
    fn test_authors_joined() {
        let papers = parse_response(SAMPLE);
        assert_eq!(papers[0].authors, "Ada Lovelace, Alan Turing");
    }

    #[test]
    fn test_feed_title_not_confused_with_entry_title() {
        let papers = parse_response(SAMPLE);
        assert_ne!(papers[0].title, "ArXiv Query Results");
    }

    #[test]
    fn test_query_url_encodes_category() {
        let url = query_url("cs.AI", 50);
        assert_eq!(
            url,
            "https://export.arxiv.org/api/query?search_query=cat:cs.AI&start=0&max_results=50"
        );
    }

    #[test]
    fn test_empty_response() {
        assert!(parse_response("<feed></feed>").is_empty());
        assert!(parse_response("").is_empty());
    }
}
