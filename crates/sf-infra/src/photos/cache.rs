use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use sf_core::content::Photo;
use sf_core::ports::{EntityError, EntityReadPort, PhotoLookupPort};
use tokio::sync::Mutex;
use tracing::debug;

/// Photo lookup cache keyed by the requested id set.
/// 以请求的照片 id 集合为键的查询缓存。
///
/// Behavior:
/// - FIFO eviction when `max_entries` is exceeded.
/// - Failed lookups are not cached.
/// - An empty id set resolves to nothing without calling the backend.
pub struct CachedPhotoLookup {
    reader: Arc<dyn EntityReadPort>,
    inner: Mutex<Inner>,
}

struct Inner {
    entries: HashMap<String, Vec<Photo>>,
    queue: VecDeque<String>,
    max_entries: usize,
}

impl CachedPhotoLookup {
    /// Create a cache with an entry limit.
    /// 创建带条目上限的缓存。
    pub fn new(reader: Arc<dyn EntityReadPort>, max_entries: usize) -> Self {
        Self {
            reader,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                queue: VecDeque::new(),
                max_entries,
            }),
        }
    }

    /// Drop every cached lookup, e.g. after photos were edited.
    /// 清空缓存。
    pub async fn invalidate(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.queue.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }
}

fn cache_key(ids: &[String]) -> String {
    ids.join(",")
}

#[async_trait]
impl PhotoLookupPort for CachedPhotoLookup {
    async fn lookup(&self, ids: &[String]) -> Result<Vec<Photo>, EntityError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let key = cache_key(ids);
        if let Some(photos) = self.inner.lock().await.entries.get(&key) {
            debug!(ids = ids.len(), "photo lookup served from cache");
            return Ok(photos.clone());
        }

        // Fetch without holding the lock; concurrent misses may both fetch.
        let photos = self.reader.get_photos_by_ids(ids).await?;

        let mut inner = self.inner.lock().await;
        if inner.max_entries > 0 && !inner.entries.contains_key(&key) {
            inner.entries.insert(key.clone(), photos.clone());
            inner.queue.push_back(key);
            inner.evict_if_needed();
        }
        Ok(photos)
    }
}

impl Inner {
    fn evict_if_needed(&mut self) {
        while self.entries.len() > self.max_entries {
            match self.queue.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::content::{BaselineEntity, ContentKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingReader {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EntityReadPort for CountingReader {
        async fn get_entity(
            &self,
            kind: ContentKind,
            _id: Option<&str>,
        ) -> Result<BaselineEntity, EntityError> {
            Err(EntityError::NotFound(kind.to_string()))
        }

        async fn get_photos_by_ids(&self, ids: &[String]) -> Result<Vec<Photo>, EntityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EntityError::Backend("offline".to_string()));
            }
            Ok(ids
                .iter()
                .map(|id| Photo {
                    id: id.clone(),
                    ..Default::default()
                })
                .collect())
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn repeated_lookup_hits_cache() {
        let reader = Arc::new(CountingReader::default());
        let cache = CachedPhotoLookup::new(reader.clone(), 4);

        let first = cache.lookup(&ids(&["a", "b"])).await.unwrap();
        let second = cache.lookup(&ids(&["a", "b"])).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_set_skips_backend() {
        let reader = Arc::new(CountingReader::default());
        let cache = CachedPhotoLookup::new(reader.clone(), 4);

        assert!(cache.lookup(&[]).await.unwrap().is_empty());
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oldest_entry_is_evicted_when_full() {
        let reader = Arc::new(CountingReader::default());
        let cache = CachedPhotoLookup::new(reader.clone(), 2);

        cache.lookup(&ids(&["a"])).await.unwrap();
        cache.lookup(&ids(&["b"])).await.unwrap();
        cache.lookup(&ids(&["c"])).await.unwrap();
        assert_eq!(cache.len().await, 2);

        cache.lookup(&ids(&["a"])).await.unwrap();
        assert_eq!(reader.calls.load(Ordering::SeqCst), 4);
        cache.lookup(&ids(&["c"])).await.unwrap();
        assert_eq!(reader.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let reader = Arc::new(CountingReader {
            fail: true,
            ..Default::default()
        });
        let cache = CachedPhotoLookup::new(reader.clone(), 4);

        assert!(cache.lookup(&ids(&["a"])).await.is_err());
        assert!(cache.lookup(&ids(&["a"])).await.is_err());
        assert_eq!(reader.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let reader = Arc::new(CountingReader::default());
        let cache = CachedPhotoLookup::new(reader.clone(), 4);

        cache.lookup(&ids(&["a"])).await.unwrap();
        cache.invalidate().await;
        cache.lookup(&ids(&["a"])).await.unwrap();

        assert_eq!(reader.calls.load(Ordering::SeqCst), 2);
    }
}
