use anyhow::{Context, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use hostcrawl_core::crawl::{CrawlOptions, execute_crawl};
use hostcrawl_core::report::{ReportFormat, render_report};
use hostcrawl_scanner::PermitScope;
use std::path::PathBuf;
use tracing::Level;
use url::Url;

// Helper functions for crawl handler

/// Map the number of `-v` flags to a log level. Warnings are always shown.
pub fn log_level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the global tracing subscriber. Logs go to stderr so they never
/// interleave with a report on stdout.
pub fn init_tracing(verbosity: u8) {
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level_for(verbosity))
        .with_target(false)
        .try_init();
}

/// Expand a leading `~` in the output directory.
pub fn expand_output_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Build crawl options from the `crawl` subcommand's arguments
pub fn crawl_options_from_args(args: &ArgMatches, quiet: bool) -> anyhow::Result<CrawlOptions> {
    let url = args
        .get_one::<Url>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;

    let mut options = CrawlOptions::new(url.as_str());

    if let Some(depth) = args.get_one::<usize>("max-depth") {
        options.max_depth = *depth;
    }
    if let Some(concurrency) = args.get_one::<usize>("concurrency") {
        options.max_concurrency = *concurrency;
    }
    if let Some(output) = args.get_one::<String>("output") {
        options.output_dir = expand_output_dir(output);
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        options.timeout_secs = *timeout;
    }
    if args.get_flag("hold-permit") {
        options.permit_scope = PermitScope::Task;
    }
    options.show_progress_bars = !quiet;

    Ok(options)
}

pub fn report_format_from_args(args: &ArgMatches) -> anyhow::Result<ReportFormat> {
    match args.get_one::<String>("format") {
        Some(raw) => raw.parse::<ReportFormat>().map_err(|e| anyhow!(e)),
        None => Ok(ReportFormat::Text),
    }
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let options = crawl_options_from_args(sub_matches, quiet)?;
    let format = report_format_from_args(sub_matches)?;

    if !quiet {
        eprintln!(
            "\n{} Crawling {}",
            "→".blue(),
            options.seed.bright_white()
        );
        eprintln!(
            "  Max depth: {}  Concurrency: {}  Timeout: {}s",
            options.max_depth, options.max_concurrency, options.timeout_secs
        );
        if options.permit_scope == PermitScope::Task {
            eprintln!("  Holding permits until each page is fully processed");
        }
        eprintln!();
    }

    let seed = options.seed.clone();
    let fallback_dir = options.output_dir.clone();
    let summary = execute_crawl(options, None)
        .await
        .with_context(|| format!("Crawl of {} failed", seed))?;

    let output_dir = summary.output_dir.clone().unwrap_or(fallback_dir);
    let report = render_report(&summary, format).context("Failed to render report")?;

    match format {
        ReportFormat::Text => {
            println!(
                "\n{} Crawl complete in {:.2?}",
                "✓".green().bold(),
                summary.elapsed
            );
            println!(
                "{} Output directory: {}\n",
                "✓".green().bold(),
                output_dir.display().to_string().bright_white()
            );
            print!("{}", report);
        }
        ReportFormat::Json => {
            // Keep stdout machine readable
            eprintln!("Crawl complete in {:.2?}", summary.elapsed);
            eprintln!("Output directory: {}", output_dir.display());
            println!("{}", report);
        }
    }

    Ok(())
}
