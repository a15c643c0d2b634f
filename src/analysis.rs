//! Word-frequency statistics over a text column of a dataset.
//!
//! The downstream consumer of the scraped tables: reads one CSV, tokenizes a
//! chosen column, filters stopwords and noise, and reports the most frequent
//! tokens. A missing file or column is a warning and an empty result, never
//! an error, to match the rest of the crate's no-fatal-path contract.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());

/// Common English words and scraping artifacts excluded from the counts.
pub static DEFAULT_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "could", "did",
        "do", "does", "doing", "done", "for", "from", "had", "has", "have", "having", "he", "her",
        "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "like",
        "may", "might", "more", "most", "much", "no", "not", "of", "on", "one", "or", "other",
        "our", "out", "over", "said", "says", "she", "should", "so", "some", "such", "than",
        "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "to",
        "too", "up", "us", "use", "used", "using", "very", "was", "were", "what", "when", "which",
        "who", "why", "will", "with", "would", "you", "your", "we", "via", "also", "about", "new",
        "news", "http", "https", "www", "com",
    ]
    .into_iter()
    .collect()
});

/// Tokenizer and ranking settings.
#[derive(Debug, Clone)]
pub struct KeywordOptions {
    /// Name of the text-bearing column to analyze.
    pub column: String,
    /// How many tokens to report.
    pub top_n: usize,
    /// Minimum token length; shorter runs are dropped.
    pub min_token_len: usize,
    /// Tokens excluded from counting, lowercased.
    pub stopwords: HashSet<String>,
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self {
            column: "content".to_string(),
            top_n: 20,
            min_token_len: 3,
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl KeywordOptions {
    /// Merge caller-supplied stopwords into the active set, lowercased.
    pub fn with_extra_stopwords<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in extra {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
        self
    }
}

/// Split text into counted tokens.
///
/// A token is a lowercase alphanumeric run of at least `min_token_len`
/// characters that is not purely numeric and not a stopword.
pub fn tokenize(text: &str, options: &KeywordOptions) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_ALPHANUMERIC.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .filter(|word| word.len() >= options.min_token_len)
        .filter(|word| !options.stopwords.contains(*word))
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// Count tokens in one column of a CSV file and return the top-N
/// `(token, count)` pairs, ordered by descending count with ties broken
/// alphabetically for determinism.
///
/// Rows with an empty value in the column are skipped. A missing file or an
/// absent column logs a warning and yields an empty result.
#[instrument(level = "info", skip(options), fields(column = %options.column))]
pub fn keyword_frequency(
    path: &Path,
    options: &KeywordOptions,
) -> Result<Vec<(String, u64)>, Box<dyn Error>> {
    if !path.exists() {
        warn!(path = %path.display(), "Missing dataset file");
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let column_index = match reader
        .headers()?
        .iter()
        .position(|header| header == options.column)
    {
        Some(index) => index,
        None => {
            warn!(path = %path.display(), column = %options.column, "Missing column in dataset");
            return Ok(Vec::new());
        }
    };

    let mut counts: HashMap<String, u64> = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let Some(text) = record.get(column_index) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        for token in tokenize(text, options) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let top = counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(options.top_n)
        .collect::<Vec<_>>();
    info!(tokens = top.len(), "Computed keyword frequencies");
    Ok(top)
}
