use std::collections::HashSet;
use tokio::sync::Mutex;

/// Set of canonical URL keys already dispatched during one crawl.
///
/// The only mutation is [`VisitedSet::try_claim`]: the membership check and the
/// insert happen under a single lock acquisition, so for any key exactly one
/// caller ever wins.
#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time `key` is claimed, false afterwards.
    pub async fn try_claim(&self, key: &str) -> bool {
        let mut keys = self.keys.lock().await;
        if keys.contains(key) {
            return false;
        }
        keys.insert(key.to_string())
    }

    pub async fn len(&self) -> usize {
        self.keys.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_claim_once() {
        let visited = VisitedSet::new();
        assert!(visited.try_claim("https://example.com/docs").await);
        assert!(!visited.try_claim("https://example.com/docs").await);
        assert!(visited.try_claim("https://example.com/docs/a").await);
        assert_eq!(visited.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_claims_have_single_winner() {
        let visited = Arc::new(VisitedSet::new());
        let mut handles = Vec::new();

        for _ in 0..256 {
            let visited = visited.clone();
            handles.push(tokio::spawn(async move {
                visited.try_claim("https://example.com/contended").await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(visited.len().await, 1);
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let visited = VisitedSet::new();
        assert!(visited.is_empty().await);
    }
}
