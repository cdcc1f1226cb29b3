//! Dirmirror main entry point
//!
//! This is the command-line interface for the dirmirror listing mirror.

use anyhow::Result;
use clap::Parser;
use dirmirror::config::load_config;
use dirmirror::crawler::mirror;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Dirmirror: a directory listing mirror
///
/// Dirmirror walks a remote autoindex-style listing tree and recreates it
/// on local disk, resuming partial downloads and skipping files that are
/// already present.
#[derive(Parser, Debug)]
#[command(name = "dirmirror")]
#[command(version = "1.0.0")]
#[command(about = "Mirror a directory listing tree to local disk", long_about = None)]
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

    /// Validate config and show what would be mirrored without downloading
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_mirror(config, cli.quiet).await?;
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
            0 => EnvFilter::new("dirmirror=info,warn"),
            1 => EnvFilter::new("dirmirror=debug,info"),
            2 => EnvFilter::new("dirmirror=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be mirrored
fn handle_dry_run(config: &dirmirror::config::Config) {
    println!("=== Dirmirror Dry Run ===\n");

    println!("Job:");
    println!("  Source URL: {}", config.job.url);
    println!("  Target directory: {}", config.job.directory);

    println!("\nAuthentication:");
    match &config.auth {
        Some(auth) => println!("  Username: {}", auth.username),
        None => println!("  (anonymous)"),
    }

    println!("\nFilters:");
    if config.filters.is_catch_all() {
        println!("  Include extensions: (all files)");
    } else {
        println!(
            "  Include extensions: {}",
            config.filters.include_extensions.join(", ")
        );
    }
    println!(
        "  Exclude extensions: {}",
        config.filters.exclude_extensions.join(", ")
    );
    println!(
        "  Folder markers: {}",
        config.filters.folder_markers.join(", ")
    );
    println!(
        "  Skip substrings: {}",
        config.filters.skip_substrings.join(", ")
    );
    println!("  Download HTML files: {}", config.filters.download_html);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would mirror {} into {}",
        config.job.url, config.job.directory
    );
}

/// Handles the main mirror operation
async fn handle_mirror(config: dirmirror::config::Config, quiet: bool) -> Result<()> {
    tracing::info!(
        "Mirroring {} into {}",
        config.job.url,
        config.job.directory
    );

    match mirror(config, quiet).await {
        Ok(stats) => {
            tracing::info!(
                "Mirror completed: {} downloaded, {} already present, {} failed",
                stats.files_downloaded,
                stats.files_already_present,
                stats.files_failed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            Err(e.into())
        }
    }
}
