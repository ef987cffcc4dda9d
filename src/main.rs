//! vacancy-crawler main entry point
//!
//! Command-line interface for crawling vacancy listings into SQLite.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vacancy_crawler::config::{load_config_with_hash, Config};
use vacancy_crawler::crawler::{crawl, user_agent_string};
use vacancy_crawler::output::{export_jsonl, load_statistics, print_statistics};
use vacancy_crawler::storage::open_storage;

/// vacancy-crawler: turns job listing pages into structured vacancy records
///
/// Walks the configured listing pages, follows every vacancy link, and stores
/// one record per vacancy in a SQLite database (and optionally JSON Lines).
#[derive(Parser, Debug)]
#[command(name = "vacancy-crawler")]
#[command(version)]
#[command(about = "Crawls job listings into structured vacancy records", long_about = None)]
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
    #[arg(long, conflicts_with_all = ["stats", "export_jsonl"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_jsonl"])]
    stats: bool,

    /// Write every stored vacancy to PATH as JSON Lines and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_jsonl: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::debug!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(path) = &cli.export_jsonl {
        handle_export_jsonl(&config, path)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vacancy_crawler=info,warn"),
            1 => EnvFilter::new("vacancy_crawler=debug,info"),
            2 => EnvFilter::new("vacancy_crawler=trace,debug"),
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

/// Handles the --dry-run mode: prints the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== vacancy-crawler Dry Run ===\n");

    println!("Start URLs ({}):", config.crawler.start_urls.len());
    for url in &config.crawler.start_urls {
        println!("  - {}", url);
    }

    if config.crawler.allowed_domains.is_empty() {
        println!("\nAllowed domains: any");
    } else {
        println!("\nAllowed domains: {}", config.crawler.allowed_domains.join(", "));
    }

    match config.crawler.max_pages {
        0 => println!("Max pages: unlimited"),
        n => println!("Max pages: {}", n),
    }

    println!("\nUser Agent: {}", user_agent_string(&config.user_agent));

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    if let Some(path) = &config.output.jsonl_path {
        println!("  JSON Lines: {}", path);
    }

    let vocabulary = config.vocabulary.build();
    println!("\nVocabulary:");
    println!(
        "  Technologies ({}): {}",
        vocabulary.technologies().count(),
        vocabulary.technologies().collect::<Vec<_>>().join(", ")
    );
    println!("  Month words: {}", vocabulary.month_count());

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))
        .context("Failed to open database")?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-jsonl mode
fn handle_export_jsonl(config: &Config, path: &Path) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))
        .context("Failed to open database")?;
    let count = export_jsonl(&storage, path)?;

    println!("✓ Exported {} vacancies to: {}", count, path.display());
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Start URLs: {}, allowed domains: {}",
        config.crawler.start_urls.len(),
        config.crawler.allowed_domains.len()
    );

    let summary = crawl(config, config_hash).await.context("Crawl failed")?;

    println!(
        "✓ Run {}: {} pages fetched, {} vacancies extracted, {} extraction failures, {} offsite links skipped",
        summary.run_id,
        summary.pages_fetched,
        summary.vacancies_extracted,
        summary.extraction_failures,
        summary.offsite_skipped
    );
    Ok(())
}
