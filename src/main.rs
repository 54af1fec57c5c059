//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest crawl engine.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use sumi_harvest::config::{load_config_with_hash, validate, Config};
use sumi_harvest::crawler::{crawl, CrawlRequest, CrawlSettings, RequestDefaults};
use sumi_harvest::output::{generate_markdown_report, print_summary, summarize, write_json};
use sumi_harvest::task::{output_path_for, read_task_file, TaskRunner};
use sumi_harvest::LinkResolution;
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: a bounded web crawl engine
///
/// Sumi-Harvest crawls outward from a seed URL breadth-first, bounded by a
/// link depth and a page budget, and extracts text from every page using
/// CSS selectors.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version)]
#[command(about = "A bounded web crawl engine", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl from a seed URL and write the result as JSON
    Crawl(CrawlArgs),

    /// Execute parsed task descriptor files
    Task {
        /// Task descriptor files (`{"intent": ..., "parameters": ...}`)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Path to TOML configuration file
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file and print the effective settings
    CheckConfig {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct CrawlArgs {
    /// Seed URL the crawl starts from
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of link hops from the seed
    #[arg(short, long)]
    depth: Option<u32>,

    /// Maximum number of pages to scrape
    #[arg(short = 'n', long)]
    max_pages: Option<u32>,

    /// Field selector as `field=css` (repeatable; replaces the default map)
    #[arg(short, long = "selector", value_name = "FIELD=CSS", value_parser = parse_selector)]
    selectors: Vec<(String, String)>,

    /// Concurrent fetches within one depth level
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Resolve relative links with standard URL joining
    #[arg(long)]
    standard_links: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the JSON result (stdout by default)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Where to write a markdown report
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl(args) => handle_crawl(args).await?,
        Command::Task { files, config } => handle_tasks(&files, config.as_deref()).await?,
        Command::CheckConfig { config } => handle_check_config(&config)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so JSON written to stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_harvest=info,warn"),
            1 => EnvFilter::new("sumi_harvest=debug,info"),
            2 => EnvFilter::new("sumi_harvest=trace,debug"),
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

/// Parses a `field=css` selector argument
fn parse_selector(raw: &str) -> Result<(String, String), String> {
    let (field, selector) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=CSS, got '{}'", raw))?;

    let (field, selector) = (field.trim(), selector.trim());
    if field.is_empty() || selector.is_empty() {
        return Err(format!("expected FIELD=CSS, got '{}'", raw));
    }

    Ok((field.to_string(), selector.to_string()))
}

/// Loads the configuration file if one was given, otherwise the defaults
fn load_or_default(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the `crawl` subcommand
async fn handle_crawl(args: CrawlArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_or_default(args.config.as_deref())?;

    // Command-line flags take precedence over the file
    if let Some(timeout) = args.timeout {
        config.crawler.request_timeout_secs = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if args.standard_links {
        config.crawler.link_resolution = LinkResolution::Standard;
    }

    validate(&config)?;

    let settings = CrawlSettings::from(&config);

    let defaults = RequestDefaults::from(&config);
    let mut request = CrawlRequest::with_defaults(args.url, &defaults);
    if let Some(depth) = args.depth {
        request = request.max_depth(depth);
    }
    if let Some(max_pages) = args.max_pages {
        request = request.max_pages(max_pages);
    }
    if !args.selectors.is_empty() {
        request = request.selectors(args.selectors.into_iter().collect::<BTreeMap<_, _>>());
    }

    let result = match crawl(&request, &settings).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let output_path = args
        .output
        .or_else(|| config.output.result_path.as_ref().map(PathBuf::from));
    write_json(&result, output_path.as_deref())?;

    if let Some(path) = &output_path {
        tracing::info!("Result written to: {}", path.display());
    }

    let summary_path = args
        .summary
        .or_else(|| config.output.summary_path.as_ref().map(PathBuf::from));
    if let Some(path) = &summary_path {
        generate_markdown_report(&request, &result, path)?;
        tracing::info!("Report written to: {}", path.display());
    }

    // Only print the console summary when stdout is not carrying the JSON
    if output_path.is_some() {
        print_summary(&summarize(&result));
    }

    Ok(())
}

/// Handles the `task` subcommand
///
/// Each file is executed in turn and its outcome written next to it. A task
/// that fails still produces an outcome file; only unreadable descriptors or
/// unwritable outputs are reported as errors.
async fn handle_tasks(
    files: &[PathBuf],
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_or_default(config)?;
    let runner = TaskRunner::from_config(&config);
    let mut unreadable = 0usize;

    for path in files {
        let task = match read_task_file(path) {
            Ok(task) => task,
            Err(e) => {
                tracing::error!("Skipping {}: {}", path.display(), e);
                unreadable += 1;
                continue;
            }
        };

        let (id, outcome) = runner.execute(task).await;
        let output_path = output_path_for(path);
        write_json(&outcome, Some(&output_path))?;

        println!(
            "Task {} ({}): {} -> {}",
            id,
            outcome.task_type,
            if outcome.success { "completed" } else { "failed" },
            output_path.display()
        );
    }

    tracing::info!(
        "Executed {} tasks ({} unreadable)",
        runner.registry().len(),
        unreadable
    );

    if unreadable > 0 {
        return Err(format!("{} task files could not be read", unreadable).into());
    }

    Ok(())
}

/// Handles the `check-config` subcommand
fn handle_check_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_or_default(Some(path))?;

    println!("=== Sumi-Harvest Configuration ===\n");

    println!("Crawler:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!(
        "  Link resolution: {}",
        config.crawler.link_resolution.as_str()
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nSelectors ({}):", config.selectors.len());
    for (field, selector) in &config.selectors {
        println!("  {} = {}", field, selector);
    }

    println!("\nOutput:");
    println!(
        "  Result: {}",
        config.output.result_path.as_deref().unwrap_or("<stdout>")
    );
    println!(
        "  Report: {}",
        config.output.summary_path.as_deref().unwrap_or("<none>")
    );

    println!("\n✓ Configuration is valid");

    Ok(())
}
