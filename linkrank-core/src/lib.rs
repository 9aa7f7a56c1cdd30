pub mod config;
pub mod graph;
pub mod pipeline;
pub mod rank;
pub mod report;

pub use config::{ConfigError, CrawlConfig, GraphRequest};
pub use graph::{GraphEdge, GraphNode, RankedGraph, assemble, node_id};
pub use pipeline::{build_ranked_graph, build_ranked_graph_with_source};
pub use rank::{RankParams, pagerank};
pub use report::{ReportFormat, render};
