// Fixed-iteration PageRank over the crawled link graph

use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_DAMPING: f64 = 0.85;
pub const DEFAULT_ITERATIONS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankParams {
    pub damping: f64,
    pub iterations: usize,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Score every node with `params.iterations` power-method steps.
///
/// Each step computes `(1 - d) / n + d * sum(score(v) / outdeg(v))` over the
/// in-links of a node. The score held by a node without out-links is not
/// passed on to anyone, so that mass leaks out of the graph on every step.
/// There is no convergence test. The final scores are rescaled to sum to 1,
/// which restores the leaked mass; if nothing is left to rescale, every node
/// gets `1/n`.
///
/// Repeated edges count once, and edges touching a URL that is not in `nodes`
/// are ignored. An empty node list yields an empty map.
pub fn pagerank(
    nodes: &[String],
    edges: &[(String, String)],
    params: RankParams,
) -> HashMap<String, f64> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::with_capacity(nodes.len(), edges.len());
    for node in nodes {
        graph.add_node(node.as_str());
    }
    for (source, target) in edges {
        if graph.contains_node(source.as_str()) && graph.contains_node(target.as_str()) {
            graph.add_edge(source.as_str(), target.as_str(), ());
        }
    }

    let n = graph.node_count();
    if n == 0 {
        return HashMap::new();
    }

    let order: Vec<&str> = graph.nodes().collect();
    let index: HashMap<&str, usize> = order.iter().enumerate().map(|(i, u)| (*u, i)).collect();
    let mut out_degree = vec![0usize; n];
    let mut in_links: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (source, target, _) in graph.all_edges() {
        out_degree[index[&source]] += 1;
        in_links[index[&target]].push(index[&source]);
    }

    let n_f = n as f64;
    let base = (1.0 - params.damping) / n_f;
    let mut scores = vec![1.0 / n_f; n];

    for _ in 0..params.iterations {
        scores = in_links
            .iter()
            .map(|sources| {
                let inbound: f64 = sources
                    .iter()
                    .map(|&v| scores[v] / out_degree[v] as f64)
                    .sum();
                base + params.damping * inbound
            })
            .collect();
    }

    let total: f64 = scores.iter().sum();
    if total > 0.0 {
        for score in scores.iter_mut() {
            *score /= total;
        }
    } else {
        scores.fill(1.0 / n_f);
    }

    order
        .into_iter()
        .zip(scores)
        .map(|(url, score)| (url.to_string(), score))
        .collect()
}
