//! Agora-Harvest main entry point
//!
//! This is the command-line interface for the Agora-Harvest petition
//! debate harvester.

use agora_harvest::config::load_config_with_hash;
use agora_harvest::crawl::run_harvest;
use agora_harvest::export::export_arguments;
use agora_harvest::state::section_status;
use agora_harvest::storage::FsStore;
use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Agora-Harvest: a polite petition debate harvester
///
/// Harvests petitions, their pro/con arguments with counter-argument
/// replies, and comments from a paginated petition site into one JSON
/// document per petition. Runs are incremental: finished items are skipped
/// and previously failed ones retried.
#[derive(Parser, Debug)]
#[command(name = "agora-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite petition debate harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with_all = ["stats", "export_arguments"])]
    dry_run: bool,

    /// Show per-section progress from the data directory and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_arguments"])]
    stats: bool,

    /// Write the flattened argument TSV export and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_arguments: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_arguments {
        handle_export(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("agora_harvest=info,warn"),
            1 => EnvFilter::new("agora_harvest=debug,info"),
            2 => EnvFilter::new("agora_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &agora_harvest::Config) {
    println!("=== Agora-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Root URL: {}", config.site.root_url);
    println!("  User agent: {}", config.site.user_agent);

    println!("\nCrawler:");
    println!("  Retry delay: {}s", config.crawler.retry_delay_seconds);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_seconds
    );

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    println!("  Export directory: {}", config.output.export_dir);
    println!("  Export threshold: {} arguments", config.export.min_arguments);

    println!("\nSections ({}):", config.sections.len());
    for section in &config.sections {
        println!("  - {}", section);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: per-section progress from the data directory
fn handle_stats(config: &agora_harvest::Config) -> anyhow::Result<()> {
    let store = FsStore::open(&config.output.data_dir)?;

    println!("Data directory: {}\n", config.output.data_dir);
    for section in &config.sections {
        let status = section_status(&store, section)?;
        match status.universe {
            Some(total) => println!(
                "{}: {} in universe, {} done, {} outstanding, {} failed last run",
                status.section,
                total,
                status.done,
                status.outstanding().unwrap_or(0),
                status.failed
            ),
            None => println!("{}: not yet discovered", status.section),
        }
    }

    Ok(())
}

/// Handles the --export-arguments mode: writes the flattened TSV export
fn handle_export(config: &agora_harvest::Config) -> anyhow::Result<()> {
    let store = FsStore::open(&config.output.data_dir)?;
    let written = export_arguments(&store, config)?;
    println!(
        "✓ Wrote {} TSV files to {}",
        written, config.output.export_dir
    );
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: agora_harvest::Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting harvest of {} sections against {}",
        config.sections.len(),
        config.site.root_url
    );

    let started = Local::now();
    match run_harvest(config).await {
        Ok(()) => {
            let elapsed = Local::now() - started;
            tracing::info!(
                "Harvest completed successfully in {}s",
                elapsed.num_seconds()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
