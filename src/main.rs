//! Sitemap-Weaver main entry point
//!
//! This is the command-line interface for the Sitemap-Weaver crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use sitemap_weaver::config::{load_config_with_hash, validate, Config};
use sitemap_weaver::crawler::crawl;
use sitemap_weaver::output::{print_statistics, write_output, CrawlStatistics, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Default depth bound when neither the config file nor `--depth` sets one
const DEFAULT_MAX_DEPTH: usize = 5;

/// Sitemap-Weaver: map a single website into a sitemap tree
///
/// Starting from a seed URL, Sitemap-Weaver fetches each depth level in
/// parallel, follows links that stay on the seed's registrable domain
/// (subdomains included), and prints the resulting tree.
#[derive(Parser, Debug)]
#[command(name = "sitemap-weaver")]
#[command(version)]
#[command(about = "Map a single website into a sitemap tree", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to crawl from (overrides the config file)
    #[arg(short, long, value_name = "URL")]
    seed: Option<String>,

    /// Maximum number of hops from the seed
    #[arg(short, long)]
    depth: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Cap on concurrent requests
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Emit JSON instead of the indented text tree
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pretty: bool,

    /// Write the sitemap to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print crawl statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Validate the configuration and show what would be crawled, without crawling
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

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let sitemap = crawl(&config).await.context("Crawl could not start")?;

    write_output(&sitemap, &config.output).context("Failed to write sitemap")?;

    if cli.stats {
        print_statistics(&CrawlStatistics::from_sitemap(&sitemap));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the sitemap.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_weaver=info,warn"),
            1 => EnvFilter::new("sitemap_weaver=debug,info"),
            2 => EnvFilter::new("sitemap_weaver=trace,debug"),
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

/// Loads the config file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, &cli.seed) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        (None, Some(seed)) => Config::for_seed(seed.clone(), DEFAULT_MAX_DEPTH),
        (None, None) => bail!("Either a CONFIG file or --seed is required"),
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed = seed.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.crawler.fetch_timeout_ms = timeout_ms;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.crawler.max_concurrent_fetches = Some(max_concurrent);
    }
    if cli.json {
        config.output.format = OutputFormat::Json;
        config.output.pretty = cli.pretty;
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.to_string_lossy().into_owned());
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn print_dry_run(config: &Config) {
    println!("=== Sitemap-Weaver Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", config.crawler.seed);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    match config.crawler.max_concurrent_fetches {
        Some(max) => println!("  Max concurrent fetches: {}", max),
        None => println!("  Max concurrent fetches: unbounded"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!(
        "  Destination: {}",
        config.output.path.as_deref().unwrap_or("stdout")
    );

    println!("\n✓ Configuration is valid");
}
