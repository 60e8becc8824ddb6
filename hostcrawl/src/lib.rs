// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub mod commands;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    crawl_options_from_args, expand_output_dir, handle_crawl, init_tracing, log_level_for,
    report_format_from_args,
};

// Re-export crawl functionality from hostcrawl-core
pub use hostcrawl_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl, extract_url_path};
pub use hostcrawl_core::report::{ReportFormat, generate_crawl_report};
