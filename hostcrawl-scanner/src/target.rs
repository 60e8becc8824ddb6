use crate::error::{Result, ScanError};
use std::fmt;
use url::Url;

/// A normalized absolute URL, the unit of deduplication and scheduling.
///
/// Normalization drops the fragment and trims trailing slashes from any path
/// longer than `/`, so `https://site.com/docs/`, `https://site.com/docs` and
/// `https://site.com/docs#intro` are all the same target. Identity is the
/// serialized string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTarget {
    url: Url,
}

impl CrawlTarget {
    /// Parse the seed of a run. The seed must be absolute, carry a host and
    /// use an http-family scheme; anything else aborts the run before a single
    /// task is spawned.
    pub fn parse_seed(seed: &str) -> Result<Self> {
        let url = Url::parse(seed)
            .map_err(|e| ScanError::InvalidUrl(format!("'{}': {}", seed, e)))?;

        if url.host_str().is_none() {
            return Err(ScanError::InvalidUrl(format!("'{}' has no host", seed)));
        }
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!(
                "'{}' uses unsupported scheme '{}'",
                seed,
                url.scheme()
            )));
        }

        Ok(Self::from_url(url))
    }

    pub fn from_url(mut url: Url) -> Self {
        url.set_fragment(None);

        let path = url.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/').to_string();
            url.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
        }

        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a possibly relative href against the URL of the page it was found
/// on. Returns `None` when the href cannot be parsed.
pub fn resolve(base: &Url, href: &str) -> Option<CrawlTarget> {
    base.join(href).ok().map(CrawlTarget::from_url)
}

/// Decide whether a discovered target may be crawled.
///
/// The host must equal `root_host` exactly (subdomains are foreign), the
/// scheme must start with `http`, and the path must not contain `@`. The last
/// rule is a heuristic against user-info and mail-style anchors that parse as
/// paths. This is a best-effort scope filter, not a security boundary.
pub fn is_admissible(target: &CrawlTarget, root_host: &str) -> bool {
    target.host() == Some(root_host)
        && !target.path().contains('@')
        && target.url().scheme().starts_with("http")
}
