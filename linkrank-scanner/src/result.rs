use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Why a fetch produced no usable page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchFailure {
    Timeout,
    Connect(String),
    Transport(String),
    Status(u16),
    NotHtml(Option<String>),
    Body(String),
    /// The concurrency limiter was closed before a permit was granted.
    Unavailable,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "timed out"),
            FetchFailure::Connect(e) => write!(f, "connection failed: {}", e),
            FetchFailure::Transport(e) => write!(f, "transport error: {}", e),
            FetchFailure::Status(code) => write!(f, "HTTP status {}", code),
            FetchFailure::NotHtml(Some(ct)) => write!(f, "not HTML ({})", ct),
            FetchFailure::NotHtml(None) => write!(f, "not HTML (no content-type)"),
            FetchFailure::Body(e) => write!(f, "failed to read body: {}", e),
            FetchFailure::Unavailable => write!(f, "fetcher unavailable"),
        }
    }
}

/// Result of fetching a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(String),
    Failure(FetchFailure),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// The page body, or `None` for any failure.
    pub fn into_html(self) -> Option<String> {
        match self {
            FetchOutcome::Success(html) => Some(html),
            FetchOutcome::Failure(_) => None,
        }
    }
}

/// Counters gathered by the crawl driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub hops_completed: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub links_seen: usize,
    pub cap_reached: bool,
}

/// Everything a finished crawl discovered.
///
/// `depths` holds every discovered canonical URL with the hop at which it was
/// first seen; the seed is always present at depth 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub seed: String,
    pub depths: BTreeMap<String, usize>,
    pub edges: BTreeSet<(String, String)>,
    pub stats: CrawlStats,
}

impl CrawlResult {
    pub fn new(seed: String) -> Self {
        let mut depths = BTreeMap::new();
        depths.insert(seed.clone(), 0);
        Self {
            seed,
            depths,
            edges: BTreeSet::new(),
            stats: CrawlStats::default(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.depths.len()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.depths.contains_key(url)
    }

    pub fn depth_of(&self, url: &str) -> Option<usize> {
        self.depths.get(url).copied()
    }
}
