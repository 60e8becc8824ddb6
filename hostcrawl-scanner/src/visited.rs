use crate::target::CrawlTarget;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Run-wide record of targets already claimed for crawling.
///
/// `claim` is the only accessor. There is no `contains`, since a
/// check followed by a separate insert would let two tasks both decide to
/// fetch the same target.
#[derive(Debug, Default)]
pub struct VisitedSet {
    claimed: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically test-and-insert. Returns `true` for exactly one caller per
    /// target; that caller now owns the obligation to crawl it.
    pub fn claim(&self, target: &CrawlTarget) -> bool {
        // The critical section cannot panic halfway through an insert, so a
        // poisoned lock still guards a consistent set.
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        claimed.insert(target.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn target(s: &str) -> CrawlTarget {
        CrawlTarget::parse_seed(s).unwrap()
    }

    #[test]
    fn test_first_claim_wins() {
        let visited = VisitedSet::new();
        let t = target("https://site.com/a");
        assert!(visited.claim(&t));
        assert!(!visited.claim(&t));
        assert!(!visited.claim(&t));
    }

    #[test]
    fn test_normalized_variants_share_a_claim() {
        let visited = VisitedSet::new();
        assert!(visited.claim(&target("https://site.com/a/")));
        assert!(!visited.claim(&target("https://site.com/a")));
        assert!(!visited.claim(&target("https://site.com/a#frag")));
    }

    #[test]
    fn test_distinct_targets_are_independent() {
        let visited = VisitedSet::new();
        assert!(visited.claim(&target("https://site.com/a")));
        assert!(visited.claim(&target("https://site.com/b")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_exactly_one_concurrent_claim_succeeds() {
        let visited = Arc::new(VisitedSet::new());
        let winners = Arc::new(AtomicUsize::new(0));
        let t = target("https://site.com/contended");

        let mut handles = Vec::new();
        for _ in 0..64 {
            let visited = visited.clone();
            let winners = winners.clone();
            let t = t.clone();
            handles.push(tokio::spawn(async move {
                if visited.claim(&t) {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
