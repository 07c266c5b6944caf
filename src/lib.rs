//! Stack Exchange question-id collector.
//!
//! Walks the `/search/advanced` pages for a [`SearchQuery`] and returns the
//! unique question ids in the order they were found.

pub mod cli;
pub mod config;
mod error;
mod macros;
pub mod parse;
pub mod process;
pub mod query;
pub mod request;

pub use config::CollectorConfig;
pub use error::{Error, Result};
pub use process::{QuestionIdSearcher, SearchReport, StopReason};
pub use query::{QuestionId, ResultSet, SearchQuery};
pub use request::{ApiClient, PageSource};

pub const DEFAULT_BASE_URL: &str = "https://api.stackexchange.com/2.3";
pub const DEFAULT_SITE: &str = "stackoverflow";
const SEARCH_ENDPOINT: &str = "/search/advanced";
/// The API refuses page sizes above this.
pub const MAX_PAGE_SIZE: u32 = 100;
const START_PAGE: u32 = 1;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
