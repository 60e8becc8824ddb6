pub mod crawl;
pub mod report;

pub use crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl, extract_url_path};
pub use report::{ReportFormat, generate_crawl_report, render_json_report, render_report};
