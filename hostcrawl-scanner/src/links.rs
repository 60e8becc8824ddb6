use crate::target::{CrawlTarget, resolve};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector is valid"));

/// Extract the unique targets referenced by anchors in `body`, resolved
/// against `page_url`.
///
/// The HTML parser is error-recovering, so a malformed or non-HTML body yields
/// whatever anchors it can find, usually none. Order is not preserved.
pub fn extract_links(body: &[u8], page_url: &Url) -> HashSet<CrawlTarget> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let mut links = HashSet::new();
    for element in document.select(&ANCHOR_SELECTOR) {
        if let Some(href) = element.value().attr("href") {
            match resolve(page_url, href) {
                Some(target) => {
                    links.insert(target);
                }
                None => debug!("Ignoring unparsable href '{}' on {}", href, page_url),
            }
        }
    }

    links
}
