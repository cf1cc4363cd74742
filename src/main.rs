//! Ripple-Frontier main entry point
//!
//! Replays a recorded list of discovered URLs through concurrent workers that
//! share one seen-URL store, then reports what the frontier kept.

use anyhow::Context;
use clap::Parser;
use ripple_frontier::config::{load_config_with_hash, Config};
use ripple_frontier::frontier::{load_candidates, replay, Frontier};
use ripple_frontier::output::{collect_statistics, print_statistics};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ripple-Frontier: seen-URL tracking for a concurrent crawl frontier
///
/// Reads discovered URLs (one per line, optionally followed by a tag such as
/// `content`, `sitemap` or `robots_txt`), offers them to a shared frontier
/// from several workers and prints how many were new, duplicate or invalid.
#[derive(Parser, Debug)]
#[command(name = "ripple-frontier")]
#[command(version = "1.0.0")]
#[command(about = "Seen-URL tracking for a concurrent crawl frontier", long_about = None)]
struct Cli {
    /// File of discovered URLs: `<url> [tag]` per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of concurrent workers (overrides the config file)
    #[arg(short, long)]
    workers: Option<u32>,

    /// Print every newly enqueued canonical URL to stdout
    #[arg(long)]
    print_new: bool,

    /// Show the effective configuration without replaying
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(workers) = cli.workers {
        anyhow::ensure!(
            (1..=256).contains(&workers),
            "--workers must be between 1 and 256, got {}",
            workers
        );
        config.frontier.workers = workers;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_replay(&cli, &config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_frontier=info,warn"),
            1 => EnvFilter::new("ripple_frontier=debug,info"),
            2 => EnvFilter::new("ripple_frontier=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout stays clean for --print-new
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Ripple-Frontier Dry Run ===\n");

    println!("Frontier:");
    println!("  Workers: {}", config.frontier.workers);
    println!("  Initial capacity: {}", config.frontier.initial_capacity);
    println!("  Progress interval: {}", config.frontier.progress_interval);

    println!("\nCanonicalization:");
    println!("  Strip www.: {}", config.canonical.strip_www);
    println!("  Strip query: {}", config.canonical.strip_query);
    if config.canonical.tracking_params.is_empty() {
        println!("  Extra tracking params: (none)");
    } else {
        println!(
            "  Extra tracking params: {}",
            config.canonical.tracking_params.join(", ")
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main replay operation
async fn handle_replay(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let candidates = load_candidates(&cli.input)
        .with_context(|| format!("failed to read candidates from {}", cli.input.display()))?;
    tracing::info!(
        "Loaded {} candidates from {}",
        candidates.len(),
        cli.input.display()
    );

    let frontier = Arc::new(Frontier::new(config));
    let report = replay(
        Arc::clone(&frontier),
        candidates,
        config.frontier.workers as usize,
    )
    .await
    .context("replay failed")?;

    if cli.print_new {
        for queued in frontier.queued() {
            println!("{}\t{}", queued.url, queued.kind);
        }
    }

    if !cli.quiet {
        let stats = collect_statistics(&frontier, &report.summary);
        print_statistics(&stats);
    }

    Ok(())
}
