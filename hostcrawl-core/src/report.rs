// Report generation from a finished crawl

use crate::crawl::extract_url_path;
use colored::Colorize;
use hostcrawl_scanner::{CrawlResult, CrawlSummary};
use std::collections::BTreeMap;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format '{}'", other)),
        }
    }
}

pub fn render_report(summary: &CrawlSummary, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_crawl_report(summary)),
        ReportFormat::Json => render_json_report(summary),
    }
}

pub fn render_json_report(summary: &CrawlSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

/// Generate a human readable report, pages grouped by host and sorted by path
pub fn generate_crawl_report(summary: &CrawlSummary) -> String {
    let divider = "━".repeat(52);

    let mut report = String::new();
    report.push_str(&format!("{}\n\n", divider));
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Seed: {}\n", summary.seed));
    if let Some(ref dir) = summary.output_dir {
        report.push_str(&format!("  Output directory: {}\n", dir.display()));
    }
    report.push_str(&format!("  Elapsed: {:.2?}\n", summary.elapsed));
    report.push_str(&format!("  Pages fetched: {}\n", summary.pages_fetched()));
    report.push_str(&format!("  Pages saved: {}\n", summary.pages_saved()));
    report.push_str(&format!("  Fetch errors: {}\n", summary.fetch_errors()));
    report.push_str(&format!("  Persist errors: {}\n", summary.persist_errors()));
    report.push_str(&format!("  Skipped (depth limit): {}\n", summary.skipped_depth));
    report.push_str(&format!(
        "  Skipped (already visited): {}\n",
        summary.skipped_visited
    ));
    report.push_str(&format!("\n{}\n\n", divider));

    let mut by_host: BTreeMap<String, Vec<&CrawlResult>> = BTreeMap::new();
    for result in &summary.results {
        let host = Url::parse(&result.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| "unknown".to_string());
        by_host.entry(host).or_default().push(result);
    }

    for (host, mut host_results) in by_host {
        host_results.sort_by(|a, b| a.url.cmp(&b.url));

        report.push_str(&format!("## {}\n", host));
        report.push_str(&format!("  {} pages\n\n", host_results.len()));

        for result in host_results {
            report.push_str(&format_result_line(result));
            report.push('\n');
        }
        report.push('\n');
    }

    report
}

fn format_result_line(result: &CrawlResult) -> String {
    let path = extract_url_path(&result.url);

    let status = match result.status_code {
        Some(code @ 100..=199) => code.to_string().white().to_string(),
        Some(code @ 200..=299) => code.to_string().green().to_string(),
        Some(code @ 300..=399) => code.to_string().cyan().to_string(),
        Some(code @ 400..=499) => code.to_string().yellow().to_string(),
        Some(code @ 500..=599) => code.to_string().red().to_string(),
        Some(code) => code.to_string(),
        None => "ERR".red().bold().to_string(),
    };

    let mut line = format!("  {} {}", status, path);

    // Only show MIME type if it's not html
    if let Some(ref content_type) = result.content_type
        && !content_type.starts_with("text/html")
    {
        line.push_str(&format!(" {}", content_type.bright_black()));
    }

    if let Some(ref error) = result.error {
        line.push_str(&format!(" {}", error.red()));
    }

    line
}
