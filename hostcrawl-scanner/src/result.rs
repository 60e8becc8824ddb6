use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one fetched (or attempted) page.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub url: String,
    pub depth: usize,
    pub status_code: Option<u16>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub response_time: Duration,
    pub links_admitted: usize,
    pub saved_to: Option<PathBuf>,
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn new(url: String, depth: usize) -> Self {
        Self {
            url,
            depth,
            status_code: None,
            content_type: None,
            content_length: None,
            response_time: Duration::from_secs(0),
            links_admitted: 0,
            saved_to: None,
            error: None,
        }
    }

    pub fn with_error(url: String, depth: usize, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url, depth)
        }
    }

    /// The network fetch itself failed; nothing was stored or expanded.
    pub fn is_fetch_error(&self) -> bool {
        self.status_code.is_none() && self.error.is_some()
    }

    /// The page was fetched but writing it out failed.
    pub fn is_persist_error(&self) -> bool {
        self.status_code.is_some() && self.saved_to.is_none() && self.error.is_some()
    }
}

/// Everything a finished run reports.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub seed: String,
    pub output_dir: Option<PathBuf>,
    pub elapsed: Duration,
    pub results: Vec<CrawlResult>,
    pub skipped_depth: usize,
    pub skipped_visited: usize,
}

impl CrawlSummary {
    pub fn pages_fetched(&self) -> usize {
        self.results.iter().filter(|r| r.status_code.is_some()).count()
    }

    pub fn pages_saved(&self) -> usize {
        self.results.iter().filter(|r| r.saved_to.is_some()).count()
    }

    pub fn fetch_errors(&self) -> usize {
        self.results.iter().filter(|r| r.is_fetch_error()).count()
    }

    pub fn persist_errors(&self) -> usize {
        self.results.iter().filter(|r| r.is_persist_error()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(url: &str, saved: bool) -> CrawlResult {
        let mut r = CrawlResult::new(url.to_string(), 1);
        r.status_code = Some(200);
        if saved {
            r.saved_to = Some(PathBuf::from("out/x.html"));
        } else {
            r.error = Some("disk full".to_string());
        }
        r
    }

    #[test]
    fn test_summary_counts() {
        let summary = CrawlSummary {
            seed: "https://site.com/".to_string(),
            output_dir: None,
            elapsed: Duration::from_millis(5),
            results: vec![
                fetched("https://site.com/", true),
                fetched("https://site.com/a", false),
                CrawlResult::with_error("https://site.com/b".to_string(), 1, "refused".to_string()),
            ],
            skipped_depth: 4,
            skipped_visited: 2,
        };

        assert_eq!(summary.pages_fetched(), 2);
        assert_eq!(summary.pages_saved(), 1);
        assert_eq!(summary.fetch_errors(), 1);
        assert_eq!(summary.persist_errors(), 1);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = CrawlSummary {
            seed: "https://site.com/".to_string(),
            output_dir: Some(PathBuf::from("crawl_output/site.com")),
            elapsed: Duration::from_secs(1),
            results: vec![fetched("https://site.com/", true)],
            skipped_depth: 0,
            skipped_visited: 0,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["seed"], "https://site.com/");
        assert_eq!(json["results"][0]["status_code"], 200);
    }
}
