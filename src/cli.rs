use std::path::PathBuf;

use clap::Parser;

use crate::process::QUOTA_TARGET;
use crate::query::SearchQuery;
use crate::{Result, MAX_PAGE_SIZE};

/// Collect highly-voted, answered Stack Exchange question ids.
#[derive(Debug, Parser)]
#[command(name = "sx-collect", version, about)]
pub struct Cli {
    /// Tag to filter on (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Minimum question score
    #[arg(long, default_value_t = 20)]
    pub min_score: u32,

    /// Minimum number of answers
    #[arg(long, default_value_t = 2)]
    pub min_answers: u32,

    /// Only questions with an accepted answer
    #[arg(long)]
    pub require_accepted: bool,

    /// Results per page (clamped to 100)
    #[arg(long, default_value_t = MAX_PAGE_SIZE)]
    pub page_size: u32,

    /// Maximum number of pages to request
    #[arg(long, default_value_t = 1)]
    pub max_pages: u32,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the ids, one per line
    #[arg(short, long, default_value = "data/raw/question_ids.txt")]
    pub output: PathBuf,

    /// Log the remaining API quota after each page
    #[arg(long)]
    pub print_quota: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Filter directives for the log subscriber.
/// `RUST_LOG` wins over `-v`; the quota report stays visible at any verbosity.
pub fn log_directives(verbose: u8, rust_log: Option<&str>, print_quota: bool) -> String {
    let mut directives = match rust_log.filter(|s| !s.trim().is_empty()) {
        Some(env) => env.to_string(),
        None => match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string(),
    };
    if print_quota {
        directives.push_str(&format!(",{QUOTA_TARGET}=info"));
    }
    directives
}

impl Cli {
    pub fn search_query(&self) -> Result<SearchQuery> {
        SearchQuery::builder()
            .tags(self.tags.iter().cloned())
            .min_score(self.min_score)
            .min_answers(self.min_answers)
            .require_accepted(self.require_accepted)
            .page_size(self.page_size)
            .max_pages(self.max_pages)
            .build()
    }
}
