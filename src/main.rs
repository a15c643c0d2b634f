use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use textharvest::analysis::{keyword_frequency, KeywordOptions};
use textharvest::cli::{Cli, Command};
use textharvest::config::FetchConfig;
use textharvest::fetch::Fetcher;
use textharvest::pipeline::scrape_news;
use textharvest::scrapers::{arxiv, codeforces};
use textharvest::utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();

    match args.command {
        Command::News {
            sources,
            max_per_source,
            output_dir,
        } => {
            ensure_writable_dir(&output_dir).await?;
            let fetcher = Fetcher::new(&FetchConfig::default())?;
            let out_path = Path::new(&output_dir).join("news.csv");
            let rows = scrape_news(&fetcher, &sources, max_per_source, &out_path).await?;
            info!(rows, "News scrape finished");
        }
        Command::Arxiv {
            category,
            max_results,
            output_dir,
        } => {
            ensure_writable_dir(&output_dir).await?;
            let fetcher = Fetcher::new(&FetchConfig::default())?;
            let out_path = Path::new(&output_dir).join("arxiv.csv");
            let rows = arxiv::scrape_arxiv(&fetcher, &category, max_results, &out_path).await?;
            info!(rows, "arXiv scrape finished");
        }
        Command::Problems {
            max_results,
            output_dir,
        } => {
            ensure_writable_dir(&output_dir).await?;
            let fetcher = Fetcher::new(&FetchConfig::default())?;
            let out_path = Path::new(&output_dir).join("cp_problems.csv");
            let rows = codeforces::scrape_problems(&fetcher, max_results, &out_path).await?;
            info!(rows, "Problemset scrape finished");
        }
        Command::Keywords {
            file,
            column,
            top_n,
            min_len,
            extra_stopwords,
        } => {
            let options = KeywordOptions {
                column,
                top_n,
                min_token_len: min_len,
                ..KeywordOptions::default()
            }
            .with_extra_stopwords(&extra_stopwords);
            let top = keyword_frequency(Path::new(&file), &options)?;
            for (token, count) in top {
                println!("{token}\t{count}");
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}
