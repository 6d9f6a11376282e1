//! News Cluster Crawler main entry point
//!
//! This is the command-line interface for the structural news crawler.

use clap::Parser;
use news_cluster_crawler::config::{load_config_with_hash, validate, Config};
use news_cluster_crawler::crawler::{Crawler, FailurePolicy, TransportKind};
use news_cluster_crawler::output::{export_articles, print_statistics, CrawlStatistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Seed used when neither the config file nor the command line names one
const DEFAULT_SEED: &str = "https://yle.fi/uutiset/tuoreimmat";

/// News Cluster Crawler: article discovery without site-specific selectors
///
/// Fetches a news front page, locates its main list of article links from the
/// page structure alone, fetches every article concurrently and prints the
/// extracted headline, body and publish date as JSON.
#[derive(Parser, Debug)]
#[command(name = "news-cluster-crawler")]
#[command(version)]
#[command(about = "Structural news front-page crawler", long_about = None)]
struct Cli {
    /// Front page to crawl (overrides the config file)
    #[arg(value_name = "SEED_URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of requests in flight
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Page transport
    #[arg(long, value_enum)]
    transport: Option<TransportKind>,

    /// What to do when an article fails to fetch
    #[arg(long, value_enum)]
    failure_policy: Option<FailurePolicy>,

    /// Write articles to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print crawl statistics only, without article output
    #[arg(long)]
    stats_only: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config)?;

    let seed = config
        .crawler
        .seed_url
        .clone()
        .unwrap_or_else(|| DEFAULT_SEED.to_string());

    handle_crawl(&config, &seed, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("news_cluster_crawler=info,warn"),
            1 => EnvFilter::new("news_cluster_crawler=debug,info"),
            2 => EnvFilter::new("news_cluster_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line values win over the config file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(seed) = &cli.seed {
        config.crawler.seed_url = Some(seed.clone());
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_requests = concurrency;
    }
    if let Some(transport) = cli.transport {
        config.crawler.transport = transport;
    }
    if let Some(policy) = cli.failure_policy {
        config.crawler.failure_policy = policy;
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }
    if cli.pretty {
        config.output.pretty = true;
    }
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    seed: &str,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} with {} transport, {} concurrent requests, failure policy {:?}",
        seed,
        match config.crawler.transport {
            TransportKind::Http => "http",
            TransportKind::Browser => "browser",
        },
        config.crawler.max_concurrent_requests,
        config.crawler.failure_policy
    );

    let crawler = Crawler::from_config(config)?;
    let report = match crawler.crawl_report(seed).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.stats_only {
        let path = config.output.path.as_ref().map(PathBuf::from);
        export_articles(&report.articles, path.as_deref(), config.output.pretty)?;
    }

    if !cli.quiet {
        print_statistics(&CrawlStatistics::from_report(&report));
    }

    Ok(())
}
