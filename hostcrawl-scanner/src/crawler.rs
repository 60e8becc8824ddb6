use crate::error::{Result, ScanError};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::gate::{AdmissionGate, GatePermit};
use crate::links::extract_links;
use crate::result::{CrawlResult, CrawlSummary};
use crate::store::{DiskStore, PageStore};
use crate::target::{CrawlTarget, is_admissible};
use crate::tracker::{WorkGuard, WorkTracker};
use crate::visited::VisitedSet;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Called once per claimed target, just before its fetch waits for a permit.
pub type ProgressCallback = Arc<dyn Fn(&CrawlTarget, usize) + Send + Sync>;

/// How long a task keeps its admission permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermitScope {
    /// Release as soon as the response body has been read. The gate then
    /// bounds network fetches only.
    #[default]
    Fetch,
    /// Hold through persist, extraction and spawning.
    Task,
}

pub struct Crawler<F = HttpFetcher, S = DiskStore> {
    fetcher: Arc<F>,
    store: Arc<S>,
    max_depth: usize,
    max_concurrency: usize,
    permit_scope: PermitScope,
    progress_callback: Option<ProgressCallback>,
}

impl<F: Fetcher, S: PageStore> Crawler<F, S> {
    pub const DEFAULT_MAX_DEPTH: usize = 2;
    pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

    pub fn new(fetcher: F, store: S) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            store: Arc::new(store),
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_concurrency: Self::DEFAULT_MAX_CONCURRENCY,
            permit_scope: PermitScope::default(),
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_permit_scope(mut self, scope: PermitScope) -> Self {
        self.permit_scope = scope;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl everything reachable from `seed` on the seed's host, up to the
    /// configured depth. Only an unusable seed or configuration fails the run;
    /// per-page failures are recorded in the summary.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlSummary> {
        let seed = CrawlTarget::parse_seed(seed)?;
        self.crawl_target(&seed).await
    }

    /// Same as [`Crawler::crawl`] for a seed that has already been parsed.
    pub async fn crawl_target(&self, seed: &CrawlTarget) -> Result<CrawlSummary> {
        if self.max_concurrency == 0 || self.max_concurrency > AdmissionGate::MAX_CAPACITY {
            return Err(ScanError::InvalidConfig(format!(
                "max concurrency must be between 1 and {}, got {}",
                AdmissionGate::MAX_CAPACITY,
                self.max_concurrency
            )));
        }

        let root_host = seed.host().unwrap_or_default().to_string();

        info!(
            "Starting crawl of {} (max depth {}, max concurrency {}, permit scope {:?})",
            seed, self.max_depth, self.max_concurrency, self.permit_scope
        );

        let run = Arc::new(Run {
            fetcher: self.fetcher.clone(),
            store: self.store.clone(),
            visited: VisitedSet::new(),
            gate: AdmissionGate::new(self.max_concurrency),
            tracker: WorkTracker::new(),
            root_host,
            max_depth: self.max_depth,
            permit_scope: self.permit_scope,
            progress_callback: self.progress_callback.clone(),
            results: Mutex::new(Vec::new()),
            skipped_depth: AtomicUsize::new(0),
            skipped_visited: AtomicUsize::new(0),
        });

        let start = Instant::now();
        spawn_task(&run, seed.clone(), 0);
        run.tracker.wait().await;
        let elapsed = start.elapsed();

        let results = std::mem::take(
            &mut *run.results.lock().unwrap_or_else(PoisonError::into_inner),
        );

        info!(
            "Crawl of {} complete in {:.2?}. Processed {} pages",
            seed,
            elapsed,
            results.len()
        );

        Ok(CrawlSummary {
            seed: seed.to_string(),
            output_dir: self.store.location(),
            elapsed,
            results,
            skipped_depth: run.skipped_depth.load(Ordering::Relaxed),
            skipped_visited: run.skipped_visited.load(Ordering::Relaxed),
        })
    }
}

/// State shared by every task of a single run.
struct Run<F, S> {
    fetcher: Arc<F>,
    store: Arc<S>,
    visited: VisitedSet,
    gate: AdmissionGate,
    tracker: WorkTracker,
    root_host: String,
    max_depth: usize,
    permit_scope: PermitScope,
    progress_callback: Option<ProgressCallback>,
    // Report sink only; tasks append and never read it.
    results: Mutex<Vec<CrawlResult>>,
    skipped_depth: AtomicUsize,
    skipped_visited: AtomicUsize,
}

/// Register the child with the tracker, then hand it to the runtime. The
/// registration happens on the caller's stack, before the caller can finish.
fn spawn_task<F: Fetcher, S: PageStore>(run: &Arc<Run<F, S>>, target: CrawlTarget, depth: usize) {
    let work = run.tracker.register();
    tokio::spawn(crawl_task(run.clone(), target, depth, work));
}

fn crawl_task<F: Fetcher, S: PageStore>(
    run: Arc<Run<F, S>>,
    target: CrawlTarget,
    depth: usize,
    work: WorkGuard,
) -> BoxFuture<'static, ()> {
    async move {
        let _work = work;
        if let Some(result) = run.process(&target, depth).await {
            run.results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(result);
        }
    }
    .boxed()
}

impl<F: Fetcher, S: PageStore> Run<F, S> {
    /// One task: claim, fetch, persist, extract, spawn. Returns `None` when the
    /// target was skipped before any fetch.
    async fn process(self: &Arc<Self>, target: &CrawlTarget, depth: usize) -> Option<CrawlResult> {
        if depth > self.max_depth {
            debug!("Skipping {} at depth {} (max {})", target, depth, self.max_depth);
            self.skipped_depth.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        if !self.visited.claim(target) {
            debug!("Skipping {}: already claimed", target);
            self.skipped_visited.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        if let Some(ref callback) = self.progress_callback {
            callback(target, depth);
        }

        let permit = self.gate.acquire().await;
        let fetched = self.fetcher.fetch(target.url()).await;
        let _held: Option<GatePermit> = match self.permit_scope {
            PermitScope::Fetch => {
                drop(permit);
                None
            }
            PermitScope::Task => Some(permit),
        };

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                warn!("Error fetching {}: {}", target, e);
                return Some(CrawlResult::with_error(target.to_string(), depth, e.to_string()));
            }
        };

        let mut result = CrawlResult::new(target.to_string(), depth);
        result.status_code = Some(page.status_code);
        result.content_type = page.content_type.clone();
        result.content_length = Some(page.body.len() as u64);
        result.response_time = page.response_time;

        match self.store.save(target, &page.body).await {
            Ok(path) => result.saved_to = Some(path),
            Err(e) => {
                warn!("Error saving page {}: {}", target, e);
                result.error = Some(e.to_string());
            }
        }

        let links = extract_links(&page.body, &page.url);
        let found = links.len();
        for link in links {
            if is_admissible(&link, &self.root_host) {
                result.links_admitted += 1;
                spawn_task(self, link, depth + 1);
            }
        }
        debug!(
            "{} [depth {}, status {}]: {} links, {} admitted",
            target, depth, page.status_code, found, result.links_admitted
        );

        Some(result)
    }
}
