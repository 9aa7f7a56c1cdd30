pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{parse_seed, request_from_matches, validate_request, ValidationError};

// Re-export the engine entry point from linkrank-core
pub use linkrank_core::{CrawlConfig, GraphRequest, RankedGraph, build_ranked_graph};
