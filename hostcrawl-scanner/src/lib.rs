pub mod crawler;
pub mod error;
pub mod fetch;
pub mod gate;
pub mod links;
pub mod result;
pub mod store;
pub mod target;
pub mod tracker;
pub mod visited;

pub use crawler::{Crawler, PermitScope, ProgressCallback};
pub use error::ScanError;
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use result::{CrawlResult, CrawlSummary};
pub use store::{DiskStore, PageStore};
pub use target::CrawlTarget;
