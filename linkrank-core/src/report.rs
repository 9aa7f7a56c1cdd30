// Report generation from a ranked graph

use crate::graph::{GraphNode, RankedGraph};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// Render `graph` in the given format. `top` limits the ranking table of the
/// text and markdown reports; JSON and CSV always carry every node.
pub fn render(
    graph: &RankedGraph,
    format: ReportFormat,
    top: Option<usize>,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(graph, top)),
        ReportFormat::Json => generate_json_report(graph),
        ReportFormat::Csv => Ok(generate_csv_report(graph)),
        ReportFormat::Markdown => Ok(generate_markdown_report(graph, top)),
    }
}

pub fn generate_text_report(graph: &RankedGraph, top: Option<usize>) -> String {
    let rule = "━".repeat(78);
    let mut report = String::new();

    report.push_str(&format!("{}\n", rule));
    report.push_str(&format!("{}\n", "                           LINK GRAPH REPORT".bold()));
    report.push_str(&format!("{}\n\n", rule));

    report.push_str(&format!("Seed:         {}\n", graph.seed));
    report.push_str(&format!("Pages:        {}\n", graph.nodes.len()));
    report.push_str(&format!("Links:        {}\n", graph.edges.len()));
    report.push_str(&format!("Domains:      {}\n", graph.domain_count()));
    report.push_str(&format!("Max depth:    {}\n\n", max_depth(graph)));

    report.push_str(&format!("{}\n", rule));
    report.push_str("RANKING\n");
    report.push_str(&format!("{}\n\n", rule));

    let ranked = ranked_nodes(graph, top);
    for (idx, node) in ranked.iter().enumerate() {
        let depth = match node.depth {
            0 => "seed".green().to_string(),
            1 => format!("d{}", node.depth).cyan().to_string(),
            _ => format!("d{}", node.depth).bright_black().to_string(),
        };
        report.push_str(&format!(
            "{:>4}. {:.6}  {:>4}  {}  {}\n",
            idx + 1,
            node.rank,
            depth,
            node.id.bright_black(),
            node.url
        ));
    }
    if ranked.len() < graph.nodes.len() {
        report.push_str(&format!(
            "\n  ... {} more pages not shown\n",
            graph.nodes.len() - ranked.len()
        ));
    }

    report.push('\n');
    report.push_str(&format!("{}\n", rule));
    report
}

pub fn generate_json_report(graph: &RankedGraph) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(graph)
}

pub fn generate_csv_report(graph: &RankedGraph) -> String {
    let mut report = String::from("id,url,domain,depth,rank\n");
    for node in &graph.nodes {
        report.push_str(&format!(
            "{},{},{},{},{}\n",
            node.id,
            csv_escape(&node.url),
            csv_escape(&node.domain),
            node.depth,
            node.rank
        ));
    }
    report
}

pub fn generate_markdown_report(graph: &RankedGraph, top: Option<usize>) -> String {
    let mut report = String::new();
    report.push_str("# Link Graph Report\n\n");
    report.push_str(&format!("- **Seed:** {}\n", graph.seed));
    report.push_str(&format!("- **Pages:** {}\n", graph.nodes.len()));
    report.push_str(&format!("- **Links:** {}\n", graph.edges.len()));
    report.push_str(&format!("- **Domains:** {}\n\n", graph.domain_count()));

    report.push_str("## Ranking\n\n");
    report.push_str("| # | Rank | Depth | Id | URL |\n");
    report.push_str("|---|------|-------|----|-----|\n");
    for (idx, node) in ranked_nodes(graph, top).iter().enumerate() {
        report.push_str(&format!(
            "| {} | {:.6} | {} | `{}` | {} |\n",
            idx + 1,
            node.rank,
            node.depth,
            node.id,
            node.url.replace('|', "\\|")
        ));
    }
    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn ranked_nodes(graph: &RankedGraph, top: Option<usize>) -> Vec<&GraphNode> {
    graph.top(top.unwrap_or(graph.nodes.len()))
}

fn max_depth(graph: &RankedGraph) -> usize {
    graph.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
