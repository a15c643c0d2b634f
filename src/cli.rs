//! Command-line interface definitions.
//!
//! One subcommand per dataset plus the keyword utility, defined with `clap`
//! derive. Defaults mirror the datasets' conventional shapes: twenty
//! articles per news source, fifty arXiv papers, five hundred problems.

use clap::{Parser, Subcommand};

/// Build small text datasets and analyze them.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape news sources into a CSV of extracted article text
    News {
        /// Source page URLs, processed in order
        #[arg(required = true)]
        sources: Vec<String>,

        /// Maximum number of articles emitted per source
        #[arg(long, default_value_t = 20)]
        max_per_source: usize,

        /// Directory the dataset is written into
        #[arg(short, long, default_value = "output/datasets")]
        output_dir: String,
    },

    /// Pull recent arXiv preprints for one category
    Arxiv {
        /// arXiv category, e.g. cs.AI or math.CO
        #[arg(long, default_value = "cs.AI")]
        category: String,

        /// Maximum number of papers to request
        #[arg(long, default_value_t = 50)]
        max_results: usize,

        /// Directory the dataset is written into
        #[arg(short, long, default_value = "output/datasets")]
        output_dir: String,
    },

    /// Pull the Codeforces problemset
    Problems {
        /// Maximum number of problems to keep
        #[arg(long, default_value_t = 500)]
        max_results: usize,

        /// Directory the dataset is written into
        #[arg(short, long, default_value = "output/datasets")]
        output_dir: String,
    },

    /// Report the most frequent words in a dataset column
    Keywords {
        /// Path to a CSV dataset
        file: String,

        /// Column holding the text to analyze
        #[arg(long, default_value = "content")]
        column: String,

        /// How many tokens to report
        #[arg(long, default_value_t = 20)]
        top_n: usize,

        /// Minimum token length
        #[arg(long, default_value_t = 3)]
        min_len: usize,

        /// Additional stopwords to exclude (repeatable)
        #[arg(long = "stopword")]
        extra_stopwords: Vec<String>,
    },
}
