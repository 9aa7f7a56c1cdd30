use crate::error::{Result, ScanError};
use crate::result::{FetchFailure, FetchOutcome};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; linkrank/0.1)";
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Anything the crawler can pull pages from.
pub trait PageSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchOutcome> + Send;
}

#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub max_concurrency: usize,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// HTTP page fetcher sharing one client and one concurrency limiter across
/// all clones.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    limiter: Arc<Semaphore>,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_settings(FetcherSettings::default())
    }

    pub fn with_settings(settings: FetcherSettings) -> Result<Self> {
        if settings.max_concurrency == 0 {
            return Err(ScanError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .pool_max_idle_per_host(settings.max_concurrency * 2)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
            .build()?;

        Ok(Self {
            client,
            limiter: Arc::new(Semaphore::new(settings.max_concurrency)),
        })
    }

    /// Permits currently free in the limiter.
    pub fn available_permits(&self) -> usize {
        self.limiter.available_permits()
    }

    /// GET a page and keep it only if it is a successful HTML response.
    ///
    /// Never returns an error: timeouts, transport failures, error statuses
    /// and non-HTML content all come back as [`FetchOutcome::Failure`]. The
    /// limiter permit is held for the whole request, including the body read,
    /// and is released when this function returns on any path.
    pub async fn fetch_page(&self, url: &str) -> FetchOutcome {
        let Ok(_permit) = self.limiter.acquire().await else {
            return FetchOutcome::Failure(FetchFailure::Unavailable);
        };

        debug!("Fetching {}", url);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failure(classify(&e)),
        };

        let status = response.status().as_u16();
        if status >= 400 {
            return FetchOutcome::Failure(FetchFailure::Status(status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        if !is_html_content_type(content_type.as_deref()) {
            return FetchOutcome::Failure(FetchFailure::NotHtml(content_type));
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success(body),
            Err(e) if e.is_timeout() => FetchOutcome::Failure(FetchFailure::Timeout),
            Err(e) => FetchOutcome::Failure(FetchFailure::Body(e.to_string())),
        }
    }
}

impl PageSource for Fetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        self.fetch_page(url).await
    }
}

fn classify(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_connect() {
        FetchFailure::Connect(error.to_string())
    } else {
        FetchFailure::Transport(error.to_string())
    }
}

pub fn is_html_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml+xml")
        })
        .unwrap_or(false)
}
