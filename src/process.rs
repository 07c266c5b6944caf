use std::fmt;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::parse::SearchPage;
use crate::query::{QuestionId, ResultSet, SearchQuery};
use crate::request::PageSource;
use crate::{info_time, Error, START_PAGE};

/// Log target of the quota report, so it can be enabled on its own.
pub const QUOTA_TARGET: &str = "sx_collect::quota";

/// Why the page loop ended.
#[derive(Debug)]
pub enum StopReason {
    /// The service reported no further pages.
    Exhausted,
    /// `max_pages` pages were requested and the service still had more.
    PageLimit,
    /// A page came back without any identifiable items.
    EmptyPage,
    /// A page could not be fetched or decoded. Ids from earlier pages are kept.
    Failed(Error),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "no more results"),
            StopReason::PageLimit => write!(f, "page limit reached"),
            StopReason::EmptyPage => write!(f, "empty page"),
            StopReason::Failed(e) => write!(f, "request failed: {e}"),
        }
    }
}

/// Outcome of one search, with the detail `search` throws away.
#[derive(Debug)]
pub struct SearchReport {
    pub ids: ResultSet,
    pub pages_requested: u32,
    pub stop: StopReason,
}

/// Walks the search pages of a [`PageSource`] and collects unique question ids.
pub struct QuestionIdSearcher<S> {
    source: S,
    min_request_delay: Duration,
    print_quota: bool,
}

impl<S: PageSource> QuestionIdSearcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            min_request_delay: Duration::ZERO,
            print_quota: false,
        }
    }

    /// Minimum pause between two page requests.
    pub fn with_min_request_delay(mut self, delay: Duration) -> Self {
        self.min_request_delay = delay;
        self
    }

    /// Log the remaining API quota after every page.
    pub fn with_print_quota(mut self, print_quota: bool) -> Self {
        self.print_quota = print_quota;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the unique ids matching `query`, in discovery order.
    /// Failures only shorten the result; use [`Self::search_report`] to tell them apart.
    pub async fn search(&self, query: &SearchQuery) -> ResultSet {
        self.search_report(query).await.ids
    }

    pub async fn search_report(&self, query: &SearchQuery) -> SearchReport {
        let start_time = Local::now();
        let last_page = START_PAGE.saturating_add(query.max_pages() - 1);

        let mut discovered: Vec<QuestionId> =
            Vec::with_capacity(query.page_size().saturating_mul(query.max_pages()).min(1_000) as usize);
        let mut pages_requested = 0;
        let mut pause = Duration::ZERO;

        let stop = 'pages: {
            for page_num in START_PAGE..=last_page {
                if !pause.is_zero() {
                    debug!(?pause, "waiting before next page");
                    tokio::time::sleep(pause).await;
                }

                pages_requested += 1;
                let page = match self.source.fetch_page(&query.to_params(page_num)).await {
                    Ok(page) => page,
                    Err(e) => {
                        warn!(page = page_num, error = %e, "page request failed, keeping partial results");
                        break 'pages StopReason::Failed(e);
                    }
                };

                if self.print_quota {
                    if let Some(report) = quota_report(&page) {
                        info!(target: QUOTA_TARGET, page = page_num, "{report}");
                    }
                }

                let before = discovered.len();
                discovered.extend(page.question_ids());
                let found = discovered.len() - before;
                debug!(page = page_num, found, has_more = page.has_more, "received page");

                if found == 0 {
                    break 'pages StopReason::EmptyPage;
                }
                if !page.has_more {
                    break 'pages StopReason::Exhausted;
                }

                let backoff = page.backoff.map(Duration::from_secs).unwrap_or_default();
                if !backoff.is_zero() {
                    warn!(page = page_num, ?backoff, "service asked to back off");
                }
                pause = self.min_request_delay.max(backoff);
            }
            StopReason::PageLimit
        };

        let ids = ResultSet::from_discovered(discovered);
        info_time!(
            start_time,
            "Collected {} unique ids from {} page(s): {}",
            ids.len(),
            pages_requested,
            stop
        );

        SearchReport {
            ids,
            pages_requested,
            stop,
        }
    }
}

fn quota_report(page: &SearchPage) -> Option<String> {
    let remaining = page.quota_remaining?;
    match page.quota_max {
        Some(max) => Some(format!("API quota: {remaining}/{max} remaining")),
        None => Some(format!("API quota: {remaining} remaining")),
    }
}
