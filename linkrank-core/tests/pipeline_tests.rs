// Tests for the crawl -> rank -> assemble pipeline

use linkrank_core::config::{CrawlConfig, GraphRequest};
use linkrank_core::graph::node_id;
use linkrank_core::pipeline::{build_ranked_graph, build_ranked_graph_with_source};
use linkrank_scanner::{FetchFailure, FetchOutcome, PageSource, domain_of};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Fixtures
// ============================================================================

/// Deterministic in-memory site. Each page can be given a delay so that
/// fetch completion order can be shuffled between runs.
#[derive(Default, Clone)]
struct Site {
    pages: HashMap<String, String>,
    delays: HashMap<String, u64>,
}

impl Site {
    fn page(mut self, url: &str, links: &[&str]) -> Self {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="{}">link</a>"#, l))
            .collect();
        self.pages.insert(url.to_string(), format!("<html><body>{}</body></html>", anchors));
        self
    }

    fn with_delays(mut self, delays: &[(&str, u64)]) -> Self {
        for (url, ms) in delays {
            self.delays.insert(url.to_string(), *ms);
        }
        self
    }
}

impl PageSource for Site {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        if let Some(ms) = self.delays.get(url) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        match self.pages.get(url) {
            Some(body) => FetchOutcome::Success(body.clone()),
            None => FetchOutcome::Failure(FetchFailure::Status(404)),
        }
    }
}

fn mixed_site() -> Site {
    Site::default()
        .page("https://home.test", &["/a", "/b", "/c", "https://ext.test/x", "mailto:me@home.test"])
        .page("https://home.test/a", &["/b", "/d", "https://home.test/#top"])
        .page("https://home.test/b", &["/a", "/e/", "https://ext.test/y"])
        .page("https://home.test/c", &["/a"])
        .page("https://home.test/d", &["/f"])
        .page("https://ext.test/x", &["https://home.test/a", "/z"])
}

fn request(max_hops: usize, max_pages: usize, same_domain_only: bool) -> GraphRequest {
    GraphRequest {
        url: "https://home.test/".to_string(),
        max_hops,
        max_pages,
        same_domain_only,
    }
}

// ============================================================================
// Graph Properties
// ============================================================================

#[tokio::test]
async fn test_seed_is_first_node() {
    let graph = build_ranked_graph_with_source(
        mixed_site(),
        &request(2, 100, false),
        &CrawlConfig::default(),
        None,
    )
    .await;

    assert_eq!(graph.seed, "https://home.test");
    assert_eq!(graph.nodes[0].url, "https://home.test");
    assert_eq!(graph.nodes[0].depth, 0);
    assert_eq!(graph.nodes[0].id, node_id("https://home.test"));
}

#[tokio::test]
async fn test_ranks_sum_to_one() {
    let graph = build_ranked_graph_with_source(
        mixed_site(),
        &request(3, 100, false),
        &CrawlConfig::default(),
        None,
    )
    .await;

    assert!(graph.nodes.len() > 1);
    assert!((graph.total_rank() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_depth_is_non_decreasing_in_output() {
    let graph = build_ranked_graph_with_source(
        mixed_site(),
        &request(3, 100, false),
        &CrawlConfig::default(),
        None,
    )
    .await;

    for pair in graph.nodes.windows(2) {
        assert!(pair[0].depth <= pair[1].depth);
        if pair[0].depth == pair[1].depth {
            assert!(pair[0].url < pair[1].url);
        }
    }
}

#[tokio::test]
async fn test_edges_reference_nodes() {
    let graph = build_ranked_graph_with_source(
        mixed_site(),
        &request(3, 100, false),
        &CrawlConfig::default(),
        None,
    )
    .await;

    assert!(!graph.edges.is_empty());
    for edge in &graph.edges {
        assert!(graph.node_by_id(&edge.source).is_some());
        assert!(graph.node_by_id(&edge.target).is_some());
    }
}

#[tokio::test]
async fn test_cap_respected_for_every_limit() {
    for max_pages in [1, 2, 3, 5, 8, 100] {
        let graph = build_ranked_graph_with_source(
            mixed_site(),
            &request(3, max_pages, false),
            &CrawlConfig::default(),
            None,
        )
        .await;
        assert!(
            graph.nodes.len() <= max_pages,
            "{} nodes for cap {}",
            graph.nodes.len(),
            max_pages
        );
        assert!(graph.node("https://home.test").is_some());
    }
}

#[tokio::test]
async fn test_same_domain_filter() {
    let graph = build_ranked_graph_with_source(
        mixed_site(),
        &request(3, 100, true),
        &CrawlConfig::default(),
        None,
    )
    .await;

    let seed_domain = domain_of(&graph.seed);
    for edge in &graph.edges {
        let target = graph.node_by_id(&edge.target).unwrap();
        assert_eq!(target.domain, seed_domain);
    }
    assert!(graph.nodes.iter().all(|n| n.domain == "home.test"));
}

#[tokio::test]
async fn test_cross_domain_followed_by_default() {
    let graph = build_ranked_graph_with_source(
        mixed_site(),
        &request(2, 100, false),
        &CrawlConfig::default(),
        None,
    )
    .await;

    let external = graph.node("https://ext.test/x").unwrap();
    assert_eq!(external.domain, "ext.test");
    assert_eq!(external.depth, 1);
    assert!(graph.node("https://ext.test/z").is_some());
}

// ============================================================================
// Determinism
// ============================================================================

#[tokio::test]
async fn test_identical_output_regardless_of_completion_order() {
    let fast_first = mixed_site().with_delays(&[
        ("https://home.test/a", 5),
        ("https://home.test/b", 30),
        ("https://home.test/c", 60),
        ("https://ext.test/x", 90),
    ]);
    let slow_first = mixed_site().with_delays(&[
        ("https://home.test/a", 90),
        ("https://home.test/b", 60),
        ("https://home.test/c", 30),
        ("https://ext.test/x", 5),
    ]);

    let config = CrawlConfig::default();
    let req = request(3, 100, false);
    let first = build_ranked_graph_with_source(fast_first, &req, &config, None).await;
    let second = build_ranked_graph_with_source(slow_first, &req, &config, None).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_repeated_runs_identical() {
    let config = CrawlConfig::default();
    let req = request(3, 6, false);
    let first = build_ranked_graph_with_source(mixed_site(), &req, &config, None).await;
    let second = build_ranked_graph_with_source(mixed_site(), &req, &config, None).await;

    let ids: Vec<&str> = first.nodes.iter().map(|n| n.id.as_str()).collect();
    let ids_again: Vec<&str> = second.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ids_again);
    for (a, b) in first.nodes.iter().zip(&second.nodes) {
        assert_eq!(a.rank.to_bits(), b.rank.to_bits());
    }
    assert_eq!(first.edges, second.edges);
}

// ============================================================================
// Degenerate Graphs
// ============================================================================

#[tokio::test]
async fn test_unreachable_seed_is_single_node_with_full_rank() {
    let graph = build_ranked_graph_with_source(
        Site::default(),
        &request(3, 100, false),
        &CrawlConfig::default(),
        None,
    )
    .await;

    assert_eq!(graph.nodes.len(), 1);
    assert!((graph.nodes[0].rank - 1.0).abs() < 1e-9);
    assert!(graph.edges.is_empty());
}

#[tokio::test]
async fn test_page_without_links_is_single_node() {
    let site = Site::default().page("https://home.test", &[]);
    let graph =
        build_ranked_graph_with_source(site, &request(3, 100, false), &CrawlConfig::default(), None)
            .await;

    assert_eq!(graph.nodes.len(), 1);
    assert!((graph.nodes[0].rank - 1.0).abs() < 1e-9);
}

// ============================================================================
// Network Failure Isolation
// ============================================================================

async fn mount_isolation_site(mock_server: &MockServer) {
    let root_html = format!(
        r#"<html><body><a href="{0}/a">A</a><a href="{0}/b">B</a></body></html>"#,
        mock_server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(root_html),
        )
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html><body>A</body></html>"),
        )
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html><body>B</body></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(mock_server)
        .await;
}

fn isolation_config(drop_failed_pages: bool) -> CrawlConfig {
    CrawlConfig {
        read_timeout_secs: 0.3,
        connect_timeout_secs: 0.5,
        drop_failed_pages,
        ..CrawlConfig::default()
    }
}

#[tokio::test]
async fn test_timed_out_page_is_dropped_when_requested() {
    let mock_server = MockServer::start().await;
    mount_isolation_site(&mock_server).await;

    let req = GraphRequest {
        max_hops: 2,
        ..GraphRequest::new(mock_server.uri())
    };
    let graph = build_ranked_graph(&req, &isolation_config(true), None)
        .await
        .unwrap();

    let seed = graph.node(&graph.seed).unwrap();
    let a = graph.node(&format!("{}/a", mock_server.uri())).unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert!(graph.node(&format!("{}/b", mock_server.uri())).is_none());
    assert!(
        graph
            .edges
            .iter()
            .any(|e| e.source == seed.id && e.target == a.id)
    );
}

#[tokio::test]
async fn test_timed_out_page_kept_as_leaf_by_default() {
    let mock_server = MockServer::start().await;
    mount_isolation_site(&mock_server).await;

    let req = GraphRequest {
        max_hops: 2,
        ..GraphRequest::new(mock_server.uri())
    };
    let graph = build_ranked_graph(&req, &isolation_config(false), None)
        .await
        .unwrap();

    let b = graph.node(&format!("{}/b", mock_server.uri())).unwrap();
    assert_eq!(b.depth, 1);
    assert!(graph.edges.iter().all(|e| e.source != b.id));
    assert_eq!(graph.nodes.len(), 3);
}
