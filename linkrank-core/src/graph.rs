// Turns a finished crawl into the ranked node/edge graph handed to callers

use crate::rank::{RankParams, pagerank};
use linkrank_scanner::{CrawlResult, domain_of};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Length of the hex prefix used as a node identifier.
pub const NODE_ID_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub url: String,
    pub domain: String,
    pub depth: usize,
    pub rank: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGraph {
    pub seed: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Stable short identifier for a canonical URL.
pub fn node_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..NODE_ID_LEN].to_string()
}

/// Discovered URLs with their depth, sorted by depth and then URL.
pub fn order_nodes(result: &CrawlResult) -> Vec<(String, usize)> {
    let mut ordered: Vec<(String, usize)> = result
        .depths
        .iter()
        .map(|(url, depth)| (url.clone(), *depth))
        .collect();
    ordered.sort_by(|(url_a, depth_a), (url_b, depth_b)| {
        depth_a.cmp(depth_b).then_with(|| url_a.cmp(url_b))
    });
    ordered
}

/// Rank the crawl and lay it out as a [`RankedGraph`].
///
/// Edges are kept only when both endpoints are nodes, and are listed in node
/// order (source first, then target).
pub fn assemble(result: &CrawlResult, params: RankParams) -> RankedGraph {
    let ordered = order_nodes(result);
    let urls: Vec<String> = ordered.iter().map(|(url, _)| url.clone()).collect();
    let position: HashMap<&str, usize> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| (url.as_str(), i))
        .collect();

    let mut edge_positions: Vec<(usize, usize)> = result
        .edges
        .iter()
        .filter_map(|(source, target)| {
            Some((*position.get(source.as_str())?, *position.get(target.as_str())?))
        })
        .collect();
    edge_positions.sort_unstable();
    edge_positions.dedup();

    let edge_urls: Vec<(String, String)> = edge_positions
        .iter()
        .map(|&(s, t)| (urls[s].clone(), urls[t].clone()))
        .collect();
    let ranks = pagerank(&urls, &edge_urls, params);

    let nodes: Vec<GraphNode> = ordered
        .into_iter()
        .map(|(url, depth)| GraphNode {
            id: node_id(&url),
            domain: domain_of(&url),
            rank: ranks.get(&url).copied().unwrap_or(0.0),
            url,
            depth,
        })
        .collect();

    let edges = edge_positions
        .into_iter()
        .map(|(s, t)| GraphEdge {
            source: nodes[s].id.clone(),
            target: nodes[t].id.clone(),
        })
        .collect();

    RankedGraph {
        seed: result.seed.clone(),
        nodes,
        edges,
    }
}

impl RankedGraph {
    pub fn node(&self, url: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.url == url)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn total_rank(&self) -> f64 {
        self.nodes.iter().map(|n| n.rank).sum()
    }

    /// Highest-ranked nodes first; ties broken by URL.
    pub fn top(&self, limit: usize) -> Vec<&GraphNode> {
        let mut sorted: Vec<&GraphNode> = self.nodes.iter().collect();
        sorted.sort_by(|a, b| b.rank.total_cmp(&a.rank).then_with(|| a.url.cmp(&b.url)));
        sorted.truncate(limit);
        sorted
    }

    /// Number of distinct domains among the nodes.
    pub fn domain_count(&self) -> usize {
        let mut domains: Vec<&str> = self.nodes.iter().map(|n| n.domain.as_str()).collect();
        domains.sort_unstable();
        domains.dedup();
        domains.len()
    }
}
