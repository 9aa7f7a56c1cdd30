// Tunables for fetching, crawling and ranking

use crate::rank::{DEFAULT_DAMPING, DEFAULT_ITERATIONS, RankParams};
use linkrank_scanner::fetcher::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, FetcherSettings,
};
use linkrank_scanner::{CrawlOptions, MAX_LINKS_PER_PAGE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// What a caller asks for: a seed and the size of the neighbourhood to map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRequest {
    pub url: String,
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default)]
    pub same_domain_only: bool,
}

fn default_max_hops() -> usize {
    2
}

fn default_max_pages() -> usize {
    300
}

impl GraphRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_hops: default_max_hops(),
            max_pages: default_max_pages(),
            same_domain_only: false,
        }
    }
}

/// Engine settings that are not part of an individual request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub max_concurrency: usize,
    pub connect_timeout_secs: f64,
    pub read_timeout_secs: f64,
    pub max_links_per_page: usize,
    pub max_redirects: usize,
    pub user_agent: String,
    pub drop_failed_pages: bool,
    pub damping: f64,
    pub iterations: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            connect_timeout_secs: 5.0,
            read_timeout_secs: 10.0,
            max_links_per_page: MAX_LINKS_PER_PAGE,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            drop_failed_pages: false,
            damping: DEFAULT_DAMPING,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl CrawlConfig {
    /// Load a JSON config file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CrawlConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid("max_concurrency must be at least 1".into()));
        }
        if self.max_links_per_page == 0 {
            return Err(ConfigError::Invalid("max_links_per_page must be at least 1".into()));
        }
        if !(self.damping.is_finite() && (0.0..1.0).contains(&self.damping)) {
            return Err(ConfigError::Invalid(format!(
                "damping must be within [0, 1), got {}",
                self.damping
            )));
        }
        for (name, secs) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("read_timeout_secs", self.read_timeout_secs),
        ] {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number of seconds, got {}",
                    name, secs
                )));
            }
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent must not be empty".into()));
        }
        Ok(())
    }

    pub fn fetcher_settings(&self) -> FetcherSettings {
        FetcherSettings {
            max_concurrency: self.max_concurrency,
            connect_timeout: Duration::from_secs_f64(self.connect_timeout_secs),
            read_timeout: Duration::from_secs_f64(self.read_timeout_secs),
            user_agent: self.user_agent.clone(),
            max_redirects: self.max_redirects,
        }
    }

    pub fn crawl_options(&self, request: &GraphRequest) -> CrawlOptions {
        CrawlOptions {
            max_hops: request.max_hops,
            max_pages: request.max_pages,
            same_domain_only: request.same_domain_only,
            max_links_per_page: self.max_links_per_page,
            drop_failed_pages: self.drop_failed_pages,
        }
    }

    pub fn rank_params(&self) -> RankParams {
        RankParams {
            damping: self.damping,
            iterations: self.iterations,
        }
    }
}
