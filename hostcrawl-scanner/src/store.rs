use crate::error::Result;
use crate::target::CrawlTarget;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persistence collaborator: writes a page body somewhere derived from its URL.
pub trait PageStore: Send + Sync + 'static {
    fn save(
        &self,
        target: &CrawlTarget,
        body: &[u8],
    ) -> impl Future<Output = Result<PathBuf>> + Send;

    /// Where pages end up, if that is a single directory.
    fn location(&self) -> Option<PathBuf> {
        None
    }
}

/// Stores pages as flat files under `<output root>/<seed host>/`.
#[derive(Debug, Clone)]
pub struct DiskStore {
    directory: PathBuf,
}

impl DiskStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Namespace the store by the seed's host.
    pub fn for_seed(output_root: impl AsRef<Path>, seed: &CrawlTarget) -> Self {
        let host = seed.host().unwrap_or("unknown");
        Self::new(output_root.as_ref().join(host))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, target: &CrawlTarget) -> PathBuf {
        self.directory.join(file_name_for(target))
    }
}

impl PageStore for DiskStore {
    async fn save(&self, target: &CrawlTarget, body: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory).await?;

        let path = self.path_for(target);
        tokio::fs::write(&path, body).await?;
        debug!("Saved {} ({} bytes) to {}", target, body.len(), path.display());

        Ok(path)
    }

    fn location(&self) -> Option<PathBuf> {
        Some(self.directory.clone())
    }
}

/// `/foo/bar` becomes `_foo_bar.html`; the root path becomes `index.html`.
/// The query string takes no part in the name.
pub fn file_name_for(target: &CrawlTarget) -> String {
    let flattened = target.path().replace('/', "_");
    let stem = if flattened.is_empty() || flattened == "_" {
        "index"
    } else {
        flattened.as_str()
    };
    format!("{}.html", stem)
}
