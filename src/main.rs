//! Kumo-Harvest command-line entry point

use anyhow::Context;
use clap::Parser;
use kumo_harvest::config::load_config_with_hash;
use kumo_harvest::crawler::crawl;
use kumo_harvest::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kumo-Harvest: a depth-bounded website harvester
///
/// Walks a site from a seed URL, saves extractable text for every page,
/// and downloads selected asset types with content-addressed deduplication.
#[derive(Parser, Debug)]
#[command(name = "kumo-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded website harvester", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    tracing::info!(
        "Seed: {}, max depth: {}, delay: {}ms",
        config.crawler.seed_url,
        config.crawler.max_depth,
        config.crawler.request_delay_ms
    );

    let stats = crawl(config).await.context("crawl failed")?;

    println!();
    print_statistics(&stats);

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kumo_harvest=info,warn"),
            1 => EnvFilter::new("kumo_harvest=debug,info"),
            2 => EnvFilter::new("kumo_harvest=trace,debug"),
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

/// Prints the validated configuration and what would be crawled
fn handle_dry_run(config: &kumo_harvest::Config) {
    println!("=== Kumo-Harvest Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Same domain only: {}", config.crawler.same_domain_only);
    if let Some(section_id) = &config.crawler.section_id {
        println!("  Section scope (root page): #{}", section_id);
    }
    if !config.crawler.target_ids.is_empty() {
        println!("  Link target ids: {}", config.crawler.target_ids.join(", "));
    }

    println!("\nSelectors:");
    println!("  Link: {}", config.selectors.link);
    println!("  Item list: {}", config.selectors.item_list);
    println!("  Item: {}", config.selectors.item);
    println!("  Content: {}", config.selectors.content);

    println!("\nDownloads:");
    let downloads = &config.downloads;
    for (name, enabled) in [
        ("images", downloads.images),
        ("pdf", downloads.pdf),
        ("word", downloads.word),
        ("excel", downloads.excel),
        ("powerpoint", downloads.powerpoint),
        ("video", downloads.video),
        ("audio", downloads.audio),
    ] {
        if enabled {
            println!("  - {}", name);
        }
    }
    if !downloads.any_enabled() {
        println!("  (none enabled)");
    }

    println!("\nOutput root: {}", config.output.root_path);

    println!(
        "\nUser agent: {}/{} (+{}; {})",
        config.user_agent.crawler_name,
        config.user_agent.crawler_version,
        config.user_agent.contact_url,
        config.user_agent.contact_email
    );

    println!("\n✓ Configuration is valid");
}
