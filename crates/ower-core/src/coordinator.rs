//! Cache-or-fetch resolution of career pages.
//!
//! [`CacheCoordinator::resolve_document`] serves a stored page when one exists
//! and fetches otherwise. Age is not checked on read; expiry belongs to the
//! [`CleanupSweeper`](crate::CleanupSweeper).
//!
//! Fetches are single-flight per cache key: callers arriving while a fetch for
//! their key is running wait on that fetch instead of starting another one.
//! The fetch itself runs on a spawned task, so it finishes and populates the
//! cache even if every waiter goes away.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, info, warn};

use crate::fetcher::DocumentSource;
use crate::storage::{CacheKey, CacheStore};
use crate::{Error, Result};

type SharedFetch = Shared<BoxFuture<'static, std::result::Result<Arc<str>, Arc<Error>>>>;
type InFlight = Arc<Mutex<HashMap<CacheKey, SharedFetch>>>;

/// Where a resolved document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// Served from the local cache
    Cache,
    /// Fetched upstream by this call or by a fetch it joined
    Upstream,
}

/// A career page ready for extraction.
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// Cache key of the page
    pub key: CacheKey,
    /// Raw page content
    pub content: Arc<str>,
    /// Whether the page came from the cache or upstream
    pub origin: DocumentOrigin,
}

/// Combines a [`CacheStore`] and a [`DocumentSource`].
pub struct CacheCoordinator<S: DocumentSource> {
    store: Arc<CacheStore>,
    source: Arc<S>,
    in_flight: InFlight,
}

impl<S: DocumentSource> Clone for CacheCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            source: Arc::clone(&self.source),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<S: DocumentSource> CacheCoordinator<S> {
    /// Create a coordinator over an injected store and source.
    pub fn new(store: Arc<CacheStore>, source: Arc<S>) -> Self {
        Self {
            store,
            source,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Resolve the career page for `tag`.
    ///
    /// Without `force_refresh` a cached page is returned as-is. Otherwise, or on
    /// a miss, the page is fetched (or an in-flight fetch joined), written to
    /// the cache and returned. Fetch failures are never replaced by stale
    /// content.
    pub async fn resolve_document(
        &self,
        tag: &str,
        force_refresh: bool,
    ) -> Result<ResolvedDocument> {
        let key = CacheKey::from_tag(tag);

        if !force_refresh {
            match self.store.read(&key) {
                Ok(Some(entry)) => {
                    debug!("Cache hit for {}", tag);
                    return Ok(ResolvedDocument {
                        key,
                        content: Arc::from(entry.content),
                        origin: DocumentOrigin::Cache,
                    });
                },
                Ok(None) => debug!("Cache miss for {}", tag),
                Err(e) => warn!("Unreadable cache entry for {}, refetching: {}", tag, e),
            }
        } else {
            debug!("Forced refresh for {}", tag);
        }

        let content = self
            .shared_fetch(tag, &key)
            .await
            .map_err(|source| Error::Fetch {
                tag: tag.to_string(),
                source,
            })?;

        Ok(ResolvedDocument {
            key,
            content,
            origin: DocumentOrigin::Upstream,
        })
    }

    /// Number of fetches currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn shared_fetch(&self, tag: &str, key: &CacheKey) -> SharedFetch {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = in_flight.get(key) {
            debug!("Joining in-flight fetch for {}", tag);
            return existing.clone();
        }

        let task = tokio::spawn(fetch_and_store(
            Arc::clone(&self.source),
            Arc::clone(&self.store),
            Arc::clone(&self.in_flight),
            tag.to_string(),
            key.clone(),
        ));
        let fetch = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(Arc::new(Error::Other(format!("fetch task failed: {e}")))),
            }
        }
        .boxed()
        .shared();

        in_flight.insert(key.clone(), fetch.clone());
        fetch
    }
}

async fn fetch_and_store<S: DocumentSource>(
    source: Arc<S>,
    store: Arc<CacheStore>,
    in_flight: InFlight,
    tag: String,
    key: CacheKey,
) -> std::result::Result<Arc<str>, Arc<Error>> {
    let result = match source.fetch_document(&tag).await {
        Ok(content) => match store.write(&key, &content) {
            Ok(entry) => {
                info!("Cache updated for {} (sha256 {})", tag, entry.digest());
                Ok(Arc::from(content))
            },
            Err(e) => Err(Arc::new(e)),
        },
        Err(e) => {
            warn!("Fetch failed for {}: {}", tag, e);
            Err(Arc::new(e))
        },
    };

    // The registering caller holds the lock until the entry is inserted, so
    // this removal always observes it.
    in_flight
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&key);
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    struct ScriptedSource {
        calls: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    impl ScriptedSource {
        fn new(delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Duration::ZERO)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentSource for ScriptedSource {
        async fn fetch_document(&self, tag: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(Error::Other("upstream unavailable".into()));
            }
            Ok(format!("<html>{tag} v{n}</html>"))
        }
    }

    fn coordinator(
        source: ScriptedSource,
    ) -> (CacheCoordinator<ScriptedSource>, Arc<ScriptedSource>, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(CacheStore::new(temp.path().join("cache")));
        let source = Arc::new(source);
        (CacheCoordinator::new(store, Arc::clone(&source)), source, temp)
    }

    #[tokio::test]
    async fn test_miss_fetches_then_hits() {
        let (coordinator, source, _tmp) = coordinator(ScriptedSource::new(Duration::ZERO));

        let first = coordinator.resolve_document("Player-1", false).await.unwrap();
        assert_eq!(first.origin, DocumentOrigin::Upstream);

        let second = coordinator.resolve_document("Player-1", false).await.unwrap();
        let third = coordinator.resolve_document("Player-1", false).await.unwrap();
        assert_eq!(second.origin, DocumentOrigin::Cache);
        assert_eq!(second.content.as_bytes(), first.content.as_bytes());
        assert_eq!(third.content.as_bytes(), second.content.as_bytes());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_overwrites_fresh_entry() {
        let (coordinator, source, _tmp) = coordinator(ScriptedSource::new(Duration::ZERO));

        coordinator.resolve_document("Player-1", false).await.unwrap();
        let refreshed = coordinator.resolve_document("Player-1", true).await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(&*refreshed.content, "<html>Player-1 v2</html>");
        let stored = coordinator
            .store()
            .read(&CacheKey::from_tag("Player-1"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.content, "<html>Player-1 v2</html>");
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_masked_by_stale_entry() {
        let (coordinator, source, _tmp) = coordinator(ScriptedSource::failing());
        coordinator
            .store()
            .write(&CacheKey::from_tag("Player-1"), "stale")
            .unwrap();

        let err = coordinator.resolve_document("Player-1", true).await.unwrap_err();
        match err {
            Error::Fetch { tag, source } => {
                assert_eq!(tag, "Player-1");
                assert!(matches!(&*source, Error::Other(_)));
            },
            other => panic!("expected fetch error, got {other:?}"),
        }
        assert_eq!(source.calls(), 1);
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_unwritable_cache_surfaces_as_fetch_error() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        std::fs::write(&root, "not a directory").unwrap();
        let source = Arc::new(ScriptedSource::new(Duration::ZERO));
        let store = Arc::new(CacheStore::new(&root));
        let coordinator = CacheCoordinator::new(store, Arc::clone(&source));

        let err = coordinator.resolve_document("Player-1", false).await.unwrap_err();
        assert_eq!(err.category(), "fetch");
        assert_eq!(err.root_cause().category(), "storage");
        assert_eq!(source.calls(), 1);
        assert_eq!(coordinator.in_flight(), 0);
        assert!(root.is_file());

        // The next request fetches again rather than joining a finished fetch.
        assert!(coordinator.resolve_document("Player-1", false).await.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let (coordinator, source, _tmp) =
            coordinator(ScriptedSource::new(Duration::from_millis(200)));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.resolve_document("Player-1", false).await })
            })
            .collect();

        let mut contents = Vec::new();
        for handle in handles {
            contents.push(handle.await.unwrap().unwrap().content);
        }

        assert_eq!(source.calls(), 1);
        assert!(contents.iter().all(|c| c == &contents[0]));
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_abandoned_fetch_still_populates_cache() {
        let (coordinator, source, _tmp) =
            coordinator(ScriptedSource::new(Duration::from_millis(100)));

        let abandoned = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.resolve_document("Player-1", false).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        abandoned.abort();

        tokio::time::sleep(Duration::from_millis(250)).await;
        let resolved = coordinator.resolve_document("Player-1", false).await.unwrap();
        assert_eq!(resolved.origin, DocumentOrigin::Cache);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_independently() {
        let (coordinator, source, _tmp) =
            coordinator(ScriptedSource::new(Duration::from_millis(50)));

        let (a, b) = tokio::join!(
            coordinator.resolve_document("Player-1", false),
            coordinator.resolve_document("Player-2", false)
        );
        assert_ne!(a.unwrap().content, b.unwrap().content);
        assert_eq!(source.calls(), 2);
    }
}
