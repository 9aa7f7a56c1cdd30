pub mod canonical;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod result;

pub use canonical::{canonicalize, canonicalize_seed, domain_of};
pub use crawler::{CrawlOptions, Crawler, HopCallback, HopProgress};
pub use error::ScanError;
pub use extract::{MAX_LINKS_PER_PAGE, extract_links};
pub use fetcher::{Fetcher, FetcherSettings, PageSource};
pub use result::{CrawlResult, CrawlStats, FetchFailure, FetchOutcome};
