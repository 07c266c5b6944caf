//! Collector configuration, merged from several sources with figment.
//!
//! Priority (highest to lowest):
//! 1. `STACKEXCHANGE_API_KEY` (the key only)
//! 2. `SX_COLLECT_*` environment variables
//! 3. Explicit config path (`--config`)
//! 4. `./sx-collect.toml`
//! 5. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::request::{ApiClient, ApiClientBuilder};
use crate::{Result, DEFAULT_BASE_URL, DEFAULT_SITE, DEFAULT_TIMEOUT_SECS};

pub const CONFIG_FILE: &str = "sx-collect.toml";
pub const ENV_PREFIX: &str = "SX_COLLECT_";
pub const API_KEY_ENV: &str = "STACKEXCHANGE_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub base_url: String,
    /// Stack Exchange site parameter, e.g. `stackoverflow` or `superuser`.
    pub site: String,
    pub api_key: Option<String>,
    pub min_request_delay_ms: u64,
    pub timeout_secs: u64,
    pub print_quota: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site: DEFAULT_SITE.to_string(),
            api_key: None,
            min_request_delay_ms: 200,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            print_quota: false,
        }
    }
}

impl CollectorConfig {
    /// Loads the configuration from all sources.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = Self::figment(config_path).extract()?;
        Ok(config)
    }

    /// The merged provider stack, before extraction.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(CollectorConfig::default()));

        let project = PathBuf::from(CONFIG_FILE);
        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Env::raw().only(&[API_KEY_ENV]).map(|_| "api_key".into()))
    }

    pub fn min_request_delay(&self) -> Duration {
        Duration::from_millis(self.min_request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn client_builder(&self) -> ApiClientBuilder {
        ApiClient::builder()
            .base_url(self.base_url.clone())
            .site(self.site.clone())
            .api_key(self.api_key.clone())
            .timeout(self.timeout())
    }
}
