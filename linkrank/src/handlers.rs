use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkrank_core::config::{CrawlConfig, GraphRequest};
use linkrank_core::pipeline::build_ranked_graph;
use linkrank_core::report::{ReportFormat, render, save_report};
use linkrank_scanner::{HopCallback, HopProgress};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

pub const MIN_HOPS: usize = 1;
pub const MAX_HOPS: usize = 3;
pub const MIN_PAGES: usize = 10;
pub const MAX_PAGES: usize = 2000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("max_hops must be between 1 and 3, got {0}")]
    HopsOutOfRange(usize),

    #[error("max_pages must be between 10 and 2000, got {0}")]
    PagesOutOfRange(usize),

    #[error("seed must be an http(s) URL, got '{0}'")]
    InvalidSeed(String),
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "linkrank".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}

/// Parse a seed, adding `http://` when no scheme was given.
pub fn parse_seed(input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(url) = Url::parse(input)
        && matches!(url.scheme(), "http" | "https")
    {
        return Some(input.to_string());
    }
    if input.contains("://") {
        return None;
    }

    let with_scheme = format!("http://{}", input);
    match Url::parse(&with_scheme) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Some(with_scheme),
        _ => None,
    }
}

/// Range checks the engine itself does not perform.
pub fn validate_request(request: &GraphRequest) -> Result<(), ValidationError> {
    if !(MIN_HOPS..=MAX_HOPS).contains(&request.max_hops) {
        return Err(ValidationError::HopsOutOfRange(request.max_hops));
    }
    if !(MIN_PAGES..=MAX_PAGES).contains(&request.max_pages) {
        return Err(ValidationError::PagesOutOfRange(request.max_pages));
    }
    match Url::parse(&request.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidSeed(request.url.clone())),
    }
}

pub fn request_from_matches(args: &ArgMatches) -> Result<GraphRequest, ValidationError> {
    let raw = args
        .get_one::<String>("url")
        .cloned()
        .unwrap_or_default();
    let url = parse_seed(&raw).ok_or_else(|| ValidationError::InvalidSeed(raw.clone()))?;

    let request = GraphRequest {
        url,
        max_hops: args.get_one::<usize>("max-hops").copied().unwrap_or(2),
        max_pages: args.get_one::<usize>("max-pages").copied().unwrap_or(300),
        same_domain_only: args.get_flag("same-domain"),
    };
    validate_request(&request)?;
    Ok(request)
}

/// Settings from `--config` (or defaults) with command-line overrides applied.
pub fn config_from_matches(args: &ArgMatches) -> anyhow::Result<CrawlConfig> {
    let mut config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(concurrency) = args.get_one::<usize>("concurrency") {
        config.max_concurrency = *concurrency;
    }
    if args.get_flag("drop-failed") {
        config.drop_failed_pages = true;
    }
    config.validate().context("Invalid crawl settings")?;
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<CrawlConfig> {
    match path {
        Some(path) => CrawlConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(CrawlConfig::default()),
    }
}

pub fn report_format_from_matches(args: &ArgMatches) -> anyhow::Result<ReportFormat> {
    let name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    match ReportFormat::from_str(name) {
        Some(format) => Ok(format),
        None => bail!("Unknown report format '{}'", name),
    }
}

fn progress_spinner(seed: &str) -> anyhow::Result<(ProgressBar, HopCallback)> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid progress template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Crawling {}...", seed));

    let spinner_clone = spinner.clone();
    let callback: HopCallback = Arc::new(move |progress: HopProgress| {
        spinner_clone.set_message(format!(
            "Hop {} done: {} fetched, {} failed, {} pages discovered, {} queued",
            progress.hop + 1,
            progress.fetched,
            progress.failed,
            progress.discovered,
            progress.next_frontier
        ));
    });
    Ok((spinner, callback))
}

pub async fn handle_graph(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let request = request_from_matches(args)?;
    let config = config_from_matches(args)?;
    let format = report_format_from_matches(args)?;
    let top = args.get_one::<usize>("top").copied();
    let output = args.get_one::<PathBuf>("output");
    debug!("Graph request: {:?}", request);
    debug!("Crawl settings: {:?}", config);

    let (spinner, callback) = if quiet {
        (None, None)
    } else {
        let (spinner, callback) = progress_spinner(&request.url)?;
        (Some(spinner), Some(callback))
    };

    let graph = build_ranked_graph(&request, &config, callback)
        .await
        .context("Failed to start crawl")?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = render(&graph, format, top).context("Failed to render report")?;
    match output {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} Report saved to {} ({} pages, {} links)",
                    "✓".green().bold(),
                    path.display(),
                    graph.nodes.len(),
                    graph.edges.len()
                );
            }
        }
        None => print!("{}", report),
    }
    Ok(())
}

pub fn handle_config() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&CrawlConfig::default())
        .context("Failed to serialize default settings")?;
    println!("{}", json);
    Ok(())
}
