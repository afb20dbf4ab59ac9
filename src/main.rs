//! docscrape main entry point
//!
//! This is the command-line interface for the docscrape documentation crawler.

use anyhow::{Context, Result};
use clap::Parser;
use docscrape::config::{load_config_with_hash, Config, TransportKind};
use docscrape::instrument::{
    print_statistics, FanoutInstrumentation, StatsInstrumentation, TracingInstrumentation,
};
use docscrape::{Crawler, FileTransport, HttpTransport, ResultRecord, Transport};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// docscrape: a documentation-site crawler
///
/// docscrape fetches every internal page of a documentation site once, runs each
/// page through its filter pipeline and writes one JSON record per page to stdout.
#[derive(Parser, Debug)]
#[command(name = "docscrape")]
#[command(version)]
#[command(about = "A documentation-site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Build a single page instead of crawling (path relative to the base URL)
    #[arg(long, value_name = "PATH")]
    page: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print crawl statistics to stderr when done
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    match config.transport.kind {
        TransportKind::Http => {
            let transport = HttpTransport::new(
                &config.transport,
                &config.user_agent,
                config.scraper.base_url(),
            )
            .context("Failed to build HTTP transport")?;
            run(&cli, &config, transport).await
        }
        TransportKind::File => {
            let dir = config
                .transport
                .dir
                .clone()
                .context("File transport requires transport.dir")?;
            let transport = FileTransport::new(dir, config.scraper.base_url())?;
            run(&cli, &config, transport).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries records only.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docscrape=info,warn"),
            1 => EnvFilter::new("docscrape=debug,info"),
            2 => EnvFilter::new("docscrape=trace,debug"),
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

/// Runs a crawl, or builds a single page, over the chosen transport
async fn run<T: Transport>(cli: &Cli, config: &Config, transport: T) -> Result<()> {
    let stats = Arc::new(StatsInstrumentation::new());
    let instrumentation = FanoutInstrumentation::new()
        .with(Arc::new(TracingInstrumentation))
        .with(stats.clone());

    let crawler =
        Crawler::new(&config.scraper, transport)?.with_instrumentation(Arc::new(instrumentation));

    let mut out = std::io::stdout();

    match &cli.page {
        Some(path) => match crawler.build_page(path).await? {
            Some(record) => write_record(&mut out, &record)?,
            None => tracing::warn!("Page '{}' has nothing to process", path),
        },
        None => {
            let mut write_error = None;
            crawler
                .build_pages(|record| {
                    if write_error.is_none() {
                        if let Err(e) = write_record(&mut out, &record) {
                            write_error = Some(e);
                        }
                    }
                })
                .await?;

            if let Some(e) = write_error {
                return Err(e);
            }
        }
    }

    out.flush()?;

    if cli.stats {
        print_statistics(&stats.snapshot());
    }

    Ok(())
}

/// Writes one record as a line of JSON
fn write_record(out: &mut impl Write, record: &ResultRecord) -> Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
    Ok(())
}
