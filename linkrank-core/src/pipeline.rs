use crate::config::{CrawlConfig, GraphRequest};
use crate::graph::{RankedGraph, assemble};
use linkrank_scanner::error::Result;
use linkrank_scanner::{Crawler, Fetcher, HopCallback, PageSource};
use tracing::info;

/// Crawl from `request.url`, rank what was found and assemble the graph.
///
/// The request's hop and page limits are used as given; range checks belong
/// to the caller. The only error is failing to build the HTTP client.
pub async fn build_ranked_graph(
    request: &GraphRequest,
    config: &CrawlConfig,
    hop_callback: Option<HopCallback>,
) -> Result<RankedGraph> {
    let fetcher = Fetcher::with_settings(config.fetcher_settings())?;
    Ok(build_ranked_graph_with_source(fetcher, request, config, hop_callback).await)
}

/// Same as [`build_ranked_graph`] with a caller-supplied page source.
pub async fn build_ranked_graph_with_source<S: PageSource>(
    source: S,
    request: &GraphRequest,
    config: &CrawlConfig,
    hop_callback: Option<HopCallback>,
) -> RankedGraph {
    let mut crawler = Crawler::new(source).with_options(config.crawl_options(request));
    if let Some(callback) = hop_callback {
        crawler = crawler.with_hop_callback(callback);
    }

    let result = crawler.crawl(&request.url).await;
    let graph = assemble(&result, config.rank_params());
    info!(
        "Ranked graph for {}: {} nodes, {} edges",
        graph.seed,
        graph.nodes.len(),
        graph.edges.len()
    );
    graph
}
