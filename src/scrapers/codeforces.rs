//! Codeforces problem metadata via the problemset API.
//!
//! One JSON request per run. The payload carries an application-level status
//! alongside the HTTP status; a non-OK payload is a warning, not an error.

use crate::fetch::Fetcher;
use crate::models::ProblemRow;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

const API_URL: &str = "https://codeforces.com/api/problemset.problems";

#[derive(Debug, Deserialize)]
pub struct ProblemsetResponse {
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub result: Option<ProblemsetResult>,
}

#[derive(Debug, Deserialize)]
pub struct ProblemsetResult {
    #[serde(default)]
    pub problems: Vec<Problem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub contest_id: Option<i64>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Flatten an OK payload into dataset rows, capped at `max_results`.
///
/// Problems without a contest id and index fall back to the title as their
/// identifier and get an empty URL.
pub fn rows_from_response(response: &ProblemsetResponse, max_results: usize) -> Vec<ProblemRow> {
    let Some(result) = response.result.as_ref() else {
        return Vec::new();
    };

    result
        .problems
        .iter()
        .take(max_results)
        .map(|problem| {
            let title = problem.name.clone().unwrap_or_else(|| "Unknown".to_string());
            let (problem_id, url) = match (problem.contest_id, problem.index.as_deref()) {
                (Some(contest), Some(index)) => (
                    format!("{contest}{index}"),
                    format!("https://codeforces.com/problemset/problem/{contest}/{index}"),
                ),
                _ => (title.clone(), String::new()),
            };
            ProblemRow {
                problem_id,
                title,
                tags: problem.tags.join(", "),
                rating: problem.rating.map(|r| r.to_string()).unwrap_or_default(),
                url,
            }
        })
        .collect()
}

/// Pull the problemset and write it to `out_path`.
///
/// API failures of any kind (transport, malformed JSON, non-OK payload)
/// leave only the header row; returns the number of data rows written.
#[instrument(level = "info", skip(fetcher))]
pub async fn scrape_problems(
    fetcher: &Fetcher,
    max_results: usize,
    out_path: &Path,
) -> Result<usize, Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(out_path)?;
    writer.write_record(["problem_id", "title", "tags", "rating", "url"])?;

    let rows = match fetcher.text(API_URL).await {
        Ok(body) => match serde_json::from_str::<ProblemsetResponse>(&body) {
            Ok(response) if response.status == "OK" => rows_from_response(&response, max_results),
            Ok(response) => {
                warn!(
                    status = %response.status,
                    comment = response.comment.as_deref().unwrap_or(""),
                    "Codeforces API returned a non-OK payload"
                );
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse Codeforces API response");
                Vec::new()
            }
        },
        Err(e) => {
            warn!(error = %e, "Failed to fetch Codeforces problemset API");
            Vec::new()
        }
    };

    let count = rows.len();
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(count, path = %out_path.display(), "Wrote problem dataset");
    Ok(count)
}
