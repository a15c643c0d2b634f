//! Data models for scraped items and output rows.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`ArticleItem`]: A candidate article as discovered in a feed or listing page
//! - [`SourceRecord`]: One finished row of the news dataset
//! - [`ArxivPaper`]: One row of the arXiv dataset
//! - [`ProblemRow`]: One row of the Codeforces problem dataset
//!
//! The row structs derive `Serialize` so the CSV writer emits the header row
//! from their field names; field order is the column order.

use serde::Serialize;

/// A candidate article produced by the feed or listing parser.
///
/// All fields are plain text and default to the empty string when the source
/// document omits them. Instances live only long enough for the pipeline to
/// turn them into a [`SourceRecord`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArticleItem {
    /// Article headline; may be empty, the pipeline substitutes a placeholder.
    pub title: String,
    /// Raw link as it appeared in the document; resolved to an absolute URL
    /// by the pipeline before use.
    pub url: String,
    /// Publication date, passed through verbatim without parsing.
    pub date: String,
    /// Feed description or listing paragraph text; used as fallback content
    /// when full-article extraction comes back empty.
    pub summary: String,
}

/// One row of the news dataset.
///
/// Every field is always present; `content` may be the empty string when both
/// extraction and the summary fallback produced nothing.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SourceRecord {
    /// Short label for where the row came from: the source URL's host with a
    /// leading `www.` stripped.
    pub source: String,
    pub title: String,
    pub date: String,
    /// Absolute article URL, unique within one run.
    pub url: String,
    /// Extracted article text, or the item summary, or empty.
    pub content: String,
}

/// One row of the arXiv dataset.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ArxivPaper {
    pub title: String,
    /// Author names joined with `", "`.
    pub authors: String,
    pub summary: String,
    pub published: String,
    /// The entry's `id` element, which arXiv uses as the abstract URL.
    pub link: String,
}

/// One row of the Codeforces problem dataset.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProblemRow {
    /// `{contestId}{index}` when both are present, otherwise the title.
    pub problem_id: String,
    pub title: String,
    /// Problem tags joined with `", "`.
    pub tags: String,
    /// Difficulty rating, empty when Codeforces has not assigned one.
    pub rating: String,
    pub url: String,
}
