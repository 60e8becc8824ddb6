use hostcrawl_scanner::error::{Result, ScanError};
use hostcrawl_scanner::{
    CrawlSummary, CrawlTarget, Crawler, DiskStore, HttpFetcher, PermitScope, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub seed: String,
    pub output_dir: PathBuf,
    pub max_depth: usize,
    pub max_concurrency: usize,
    pub timeout_secs: u64,
    pub permit_scope: PermitScope,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub const DEFAULT_OUTPUT_DIR: &'static str = "crawl_output";

    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            output_dir: PathBuf::from(Self::DEFAULT_OUTPUT_DIR),
            max_depth: Crawler::<HttpFetcher, DiskStore>::DEFAULT_MAX_DEPTH,
            max_concurrency: Crawler::<HttpFetcher, DiskStore>::DEFAULT_MAX_CONCURRENCY,
            timeout_secs: HttpFetcher::DEFAULT_TIMEOUT_SECS,
            permit_scope: PermitScope::default(),
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options.
///
/// The seed is validated before anything touches the network or the output
/// directory. The output directory is created up front, so an unusable one
/// fails the whole run. Pages land in `<output_dir>/<seed host>/`.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlSummary> {
    let CrawlOptions {
        seed,
        output_dir,
        max_depth,
        max_concurrency,
        timeout_secs,
        permit_scope,
        show_progress_bars,
    } = options;

    let seed_target = CrawlTarget::parse_seed(&seed)?;

    tokio::fs::create_dir_all(&output_dir).await.map_err(|e| {
        ScanError::IoError(std::io::Error::new(
            e.kind(),
            format!("output directory {} is not usable: {}", output_dir.display(), e),
        ))
    })?;

    let store = DiskStore::for_seed(&output_dir, &seed_target);
    let fetcher = HttpFetcher::with_timeout(timeout_secs)?;

    info!("Writing pages for {} to {}", seed_target, store.directory().display());

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let internal_progress_callback: ProgressCallback = {
        let pb_clone = progress_bar.clone();
        let count_clone = processed_count.clone();
        Arc::new(move |target: &CrawlTarget, depth: usize| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!(
                    "Crawling... {} pages claimed (depth {}: {})",
                    count,
                    depth,
                    extract_url_path(target.as_str())
                ));
            }
            if let Some(ref callback) = progress_callback {
                callback(format!("[depth {}] {}", depth, target));
            }
        })
    };

    let crawler = Crawler::new(fetcher, store)
        .with_max_depth(max_depth)
        .with_max_concurrency(max_concurrency)
        .with_permit_scope(permit_scope)
        .with_progress_callback(internal_progress_callback);

    let outcome = crawler.crawl_target(&seed_target).await;

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        match &outcome {
            Ok(_) => pb.finish_with_message(format!("Crawl complete! {} pages processed", total)),
            Err(_) => pb.finish_and_clear(),
        }
    }

    outcome
}
