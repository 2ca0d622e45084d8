//! Seed-Harvest main entry point
//!
//! This is the command-line interface for the Seed-Harvest corpus builder.

use anyhow::Context;
use clap::Parser;
use seed_harvest::config::{load_targets_with_hash, CrawlTarget};
use seed_harvest::crawler::{order_targets, rebuild_corpus, CrawlOptions};
use seed_harvest::output::{print_harvest_summary, CorpusManifest, CorpusSink, JsonCorpusWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Seed-Harvest: a polite corpus harvester
///
/// Seed-Harvest crawls each configured seed site breadth-first within its
/// allowed domains, extracts page text through configurable selectors, and
/// writes a priority-ordered corpus for the retrieval index.
#[derive(Parser, Debug)]
#[command(name = "seed-harvest")]
#[command(version)]
#[command(about = "A polite corpus harvester", long_about = None)]
struct Cli {
    /// Path to the seed configuration file (JSON, or TOML with a .toml extension)
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Directory that receives docs.json, metas.json and manifest.json
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Crawl targets concurrently, one task per target
    #[arg(long)]
    parallel: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading seed configuration from: {}", cli.config.display());
    let (targets, config_hash) = match load_targets_with_hash(&cli.config) {
        Ok((targets, hash)) => {
            tracing::info!(
                "Configuration loaded: {} target(s) (hash: {})",
                targets.len(),
                hash
            );
            (targets, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).with_context(|| format!("loading {}", cli.config.display()));
        }
    };

    if cli.dry_run {
        handle_dry_run(targets);
        return Ok(());
    }

    let options = CrawlOptions::default().parallel(cli.parallel);
    handle_harvest(targets, options, &config_hash, &cli.output_dir).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        // Only show errors
        "error"
    } else {
        match verbose {
            0 => "seed_harvest=info,warn",
            1 => "seed_harvest=debug,info",
            2 => "seed_harvest=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the targets in crawl order
fn handle_dry_run(targets: Vec<CrawlTarget>) {
    println!("=== Seed-Harvest Dry Run ===\n");

    let targets = order_targets(targets);

    println!("Targets ({}), in crawl order:", targets.len());
    for target in &targets {
        let priority = target
            .priority
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  - {} [priority {}]", target.label, priority);
        println!("    Start URL: {}", target.start_url);
        println!(
            "    Category: {}",
            target.category.as_deref().unwrap_or("uncategorized")
        );
        println!(
            "    Max depth: {}, rate limit: {}s",
            target.max_depth, target.rate_limit_seconds
        );
        if target.allowed_domains.is_empty() {
            println!("    Allowed domains: any");
        } else {
            println!("    Allowed domains: {}", target.allowed_domains.join(", "));
        }
        println!(
            "    Patterns: {} follow, {} exclude",
            target.follow_patterns.len(),
            target.exclude_patterns.len()
        );
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} target(s)", targets.len());
}

/// Handles the main harvest: crawl, assemble and write the corpus
async fn handle_harvest(
    targets: Vec<CrawlTarget>,
    options: CrawlOptions,
    config_hash: &str,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let harvest = match rebuild_corpus(targets, options).await {
        Ok(harvest) => harvest,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    let manifest = CorpusManifest::new(config_hash, &harvest.corpus, &harvest.stats);
    let mut writer = JsonCorpusWriter::new(output_dir);
    writer
        .write(&harvest.corpus, &manifest)
        .with_context(|| format!("writing corpus to {}", output_dir.display()))?;

    print_harvest_summary(&harvest.stats);
    Ok(())
}
