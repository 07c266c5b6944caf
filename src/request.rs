use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::parse::{parse_error, parse_page, SearchPage};
use crate::query::Params;
use crate::{Result, DEFAULT_BASE_URL, DEFAULT_SITE, DEFAULT_TIMEOUT_SECS, SEARCH_ENDPOINT};

/// Anything that can answer a single page of a question search.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches one page. `params` already carries the filter and the page number.
    async fn fetch_page(&self, params: &[(&'static str, String)]) -> Result<SearchPage>;
}

/// Stack Exchange API client. Owns one `reqwest::Client` that is reused for every page.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    site: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Client for stackoverflow on the public API, no key.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    /// Site and key are appended to the query's own parameters.
    fn full_params(&self, params: &[(&'static str, String)]) -> Params {
        let mut full = Vec::with_capacity(params.len() + 2);
        full.push(("site", self.site.clone()));
        full.extend(params.iter().cloned());
        if let Some(key) = &self.api_key {
            full.push(("key", key.clone()));
        }
        full
    }
}

#[async_trait]
impl PageSource for ApiClient {
    async fn fetch_page(&self, params: &[(&'static str, String)]) -> Result<SearchPage> {
        let url = format!("{}{SEARCH_ENDPOINT}", self.base_url);
        debug!(%url, "requesting search page");

        let res = self
            .client
            .get(&url)
            .query(&self.full_params(params))
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &body));
        }
        parse_page(&body)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    base_url: String,
    site: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site: DEFAULT_SITE.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    /// Empty keys are ignored.
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ApiClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            site: self.site,
            api_key: self.api_key,
        })
    }
}
