use crate::canonical::{canonicalize_seed, domain_of};
use crate::extract::{MAX_LINKS_PER_PAGE, extract_links_with_limit};
use crate::fetcher::PageSource;
use crate::result::{CrawlResult, FetchOutcome};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Reported to the [`HopCallback`] after every completed hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopProgress {
    pub hop: usize,
    pub fetched: usize,
    pub failed: usize,
    pub discovered: usize,
    pub next_frontier: usize,
}

pub type HopCallback = Arc<dyn Fn(HopProgress) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    pub max_hops: usize,
    pub max_pages: usize,
    pub same_domain_only: bool,
    pub max_links_per_page: usize,
    /// Remove non-seed pages whose fetch failed, with their edges.
    pub drop_failed_pages: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_hops: 2,
            max_pages: 300,
            same_domain_only: false,
            max_links_per_page: MAX_LINKS_PER_PAGE,
            drop_failed_pages: false,
        }
    }
}

/// Hop-by-hop breadth-first crawler.
///
/// The driver owns the discovered set, the frontier and the edge set. Fetches
/// of one hop run concurrently (bounded by the source's own limiter) and only
/// hand back their outcomes; every mutation happens after the whole hop has
/// resolved.
pub struct Crawler<S> {
    source: S,
    options: CrawlOptions,
    hop_callback: Option<HopCallback>,
}

impl<S: PageSource> Crawler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: CrawlOptions::default(),
            hop_callback: None,
        }
    }

    pub fn with_options(mut self, options: CrawlOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.options.max_hops = max_hops;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.options.max_pages = max_pages;
        self
    }

    pub fn with_same_domain_only(mut self, same_domain_only: bool) -> Self {
        self.options.same_domain_only = same_domain_only;
        self
    }

    pub fn with_hop_callback(mut self, callback: HopCallback) -> Self {
        self.hop_callback = Some(callback);
        self
    }

    pub async fn crawl(&self, seed_url: &str) -> CrawlResult {
        let seed = canonicalize_seed(seed_url);
        let seed_domain = domain_of(&seed);
        let opts = &self.options;
        info!(
            "Starting crawl of {} (max_hops={}, max_pages={}, same_domain_only={})",
            seed, opts.max_hops, opts.max_pages, opts.same_domain_only
        );

        let mut result = CrawlResult::new(seed.clone());
        let mut failed: BTreeSet<String> = BTreeSet::new();
        let mut frontier = vec![seed.clone()];

        for hop in 0..opts.max_hops {
            if frontier.is_empty() {
                debug!("Frontier empty before hop {}", hop);
                break;
            }
            if result.node_count() >= opts.max_pages {
                result.stats.cap_reached = true;
                debug!("Page cap reached before hop {}", hop);
                break;
            }

            let outcomes = join_all(frontier.iter().map(|url| self.source.fetch(url))).await;

            let mut next_frontier = Vec::new();
            let mut hop_fetched = 0;
            let mut hop_failed = 0;

            for (source_url, outcome) in frontier.iter().zip(outcomes) {
                let html = match outcome {
                    FetchOutcome::Success(html) => html,
                    FetchOutcome::Failure(reason) => {
                        debug!("Skipping {}: {}", source_url, reason);
                        hop_failed += 1;
                        failed.insert(source_url.clone());
                        continue;
                    }
                };
                hop_fetched += 1;

                let links = extract_links_with_limit(source_url, &html, opts.max_links_per_page);
                result.stats.links_seen += links.len();

                for target in links {
                    if opts.same_domain_only && domain_of(&target) != seed_domain {
                        continue;
                    }

                    if !result.contains(&target) {
                        if result.node_count() >= opts.max_pages {
                            result.stats.cap_reached = true;
                            continue;
                        }
                        result.depths.insert(target.clone(), hop + 1);
                        next_frontier.push(target.clone());
                    }

                    result.edges.insert((source_url.clone(), target));
                }
            }

            result.stats.hops_completed = hop + 1;
            result.stats.pages_fetched += hop_fetched;
            result.stats.pages_failed += hop_failed;

            let progress = HopProgress {
                hop,
                fetched: hop_fetched,
                failed: hop_failed,
                discovered: result.node_count(),
                next_frontier: next_frontier.len(),
            };
            debug!("Hop {} finished: {:?}", hop, progress);
            if let Some(ref callback) = self.hop_callback {
                callback(progress);
            }

            frontier = next_frontier;
        }

        if opts.drop_failed_pages {
            failed.remove(&seed);
            drop_pages(&mut result, &failed);
        }

        info!(
            "Crawl complete. {} pages, {} edges ({} fetched, {} failed)",
            result.node_count(),
            result.edges.len(),
            result.stats.pages_fetched,
            result.stats.pages_failed
        );
        result
    }
}

fn drop_pages(result: &mut CrawlResult, pages: &BTreeSet<String>) {
    if pages.is_empty() {
        return;
    }
    result.depths.retain(|url, _| !pages.contains(url));
    result
        .edges
        .retain(|(source, target)| !pages.contains(source) && !pages.contains(target));
}
