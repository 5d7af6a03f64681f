//! Storefront-Harvest main entry point
//!
//! This is the command-line interface for the Storefront-Harvest product and
//! review scraper.

use clap::Parser;
use std::path::PathBuf;
use storefront_harvest::config::{load_config_with_hash, Config};
use storefront_harvest::output::{print_statistics, JsonSink, Sink};
use storefront_harvest::pipeline;
use storefront_harvest::SiteProfile;
use tracing_subscriber::EnvFilter;

/// Storefront-Harvest: product and review scraper for e-commerce storefronts
///
/// Storefront-Harvest crawls a store breadth-first to find its product pages,
/// then opens each one in a browser and pages through its reviews, writing one
/// JSON record per product.
#[derive(Parser, Debug)]
#[command(name = "storefront-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Product and review scraper for e-commerce storefronts", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "discover_only")]
    dry_run: bool,

    /// Only discover product URLs and write them as a JSON list
    #[arg(long, conflicts_with = "dry_run")]
    discover_only: bool,

    /// Output file, overriding `output.path` from the config
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.discover_only {
        handle_discover(&config).await?;
    } else {
        handle_harvest(&config).await?;
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
            0 => EnvFilter::new("storefront_harvest=info,warn"),
            1 => EnvFilter::new("storefront_harvest=debug,info"),
            2 => EnvFilter::new("storefront_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    let profile = SiteProfile::for_kind(config.crawler.site);

    println!("=== Storefront-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Site: {}", config.crawler.site);
    println!("  Page budget: {}", config.crawler.max_pages);
    match config.crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    println!(
        "  Product path marker: {}",
        config
            .crawler
            .product_path_marker
            .as_deref()
            .unwrap_or(profile.product_path_marker)
    );
    println!("  Request timeout: {}ms", config.crawler.request_timeout);
    println!("  Request delay: {}ms", config.crawler.request_delay);

    println!("\nUser Agent:");
    println!("  Identity: {}", config.user_agent.identity);
    println!("  Accept-Language: {}", config.user_agent.accept_language);

    println!("\nBrowser:");
    println!("  WebDriver: {}", config.render.webdriver_url);
    println!("  Headless: {}", config.render.headless);
    println!("  Review wait timeout: {}ms", config.render.wait_timeout);
    println!(
        "  Settle: up to {}ms, backoff {}ms..{}ms",
        config.render.settle_timeout,
        config.render.settle_initial_backoff,
        config.render.settle_max_backoff
    );
    match config.render.max_review_pages {
        Some(pages) => println!("  Review pages per product: {}", pages),
        None => println!("  Review pages per product: unlimited"),
    }

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling {} with a budget of {} pages",
        config.crawler.start_url, config.crawler.max_pages
    );
}

/// Handles the --discover-only mode: writes the product URL list
async fn handle_discover(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let sink = JsonSink::new(&config.output.path);

    match pipeline::discover_only(config, &sink).await {
        Ok(stats) => {
            print_statistics(&stats);
            println!("Product URLs have been saved to {}", sink.describe());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Discovery failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Harvesting {} site {} (page budget {})",
        config.crawler.site,
        config.crawler.start_url,
        config.crawler.max_pages
    );

    let sink = JsonSink::new(&config.output.path);

    match pipeline::run(config, &sink).await {
        Ok(stats) => {
            print_statistics(&stats);
            println!("All data has been saved to {}", sink.describe());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
