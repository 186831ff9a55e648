//! Paged Data Access
//!
//! Read-through cached pages and searches over a backend collection, with
//! writes serialized through a [`WriteQueue`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::access::{Page, Record, WriteQueue};
use crate::backend::Backend;
use crate::cache::{CacheStats, CacheStore, Clock, SystemClock};
use crate::config::{CacheConfig, PageConfig};
use crate::error::{DataError, Result};

/// What the cache holds for a collection.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum CachedView<T> {
    Items(Vec<T>),
    Page(Page<T>),
}

/// Cached views plus an epoch bumped by every invalidation.
///
/// A read that missed captures the epoch before going to the backend and only
/// fills the cache if it is unchanged, so a view loaded before a write can
/// never be stored after that write invalidated the collection.
struct ViewCache<T> {
    views: CacheStore<CachedView<T>>,
    epoch: u64,
}

impl<T: Record> ViewCache<T> {
    fn lookup(&mut self, key: &str) -> (Option<CachedView<T>>, u64) {
        (self.views.get(key), self.epoch)
    }

    /// Stores `view` unless the cache was invalidated since `epoch`.
    fn fill(&mut self, key: String, view: CachedView<T>, epoch: u64) -> bool {
        if self.epoch != epoch {
            debug!("Dropped {} view loaded before an invalidation", key);
            return false;
        }
        self.views.set(key, view);
        true
    }

    fn invalidate(&mut self, pattern: &str) -> usize {
        self.epoch += 1;
        self.views.invalidate(pattern)
    }

    fn clear(&mut self) {
        self.epoch += 1;
        self.views.clear();
    }
}

type SharedViews<T> = Arc<Mutex<ViewCache<T>>>;

/// Cached, paginated view over the collection of `T`.
///
/// Cache keys all start with `"{collection}:"` and every successful write
/// invalidates that prefix. Reads are not ordered against writes: a read may
/// see the collection as it was before a write that is still queued.
pub struct PagedDataAccess<T: Record> {
    backend: Arc<dyn Backend>,
    cache: SharedViews<T>,
    writes: WriteQueue,
    paging: PageConfig,
}

impl<T: Record> PagedDataAccess<T> {
    // == Constructors ==
    /// Must be called inside a Tokio runtime (the write queue spawns its worker).
    pub fn new(backend: Arc<dyn Backend>, cache: CacheConfig, paging: PageConfig) -> Self {
        Self::with_clock(backend, cache, paging, Arc::new(SystemClock))
    }

    pub fn with_clock(
        backend: Arc<dyn Backend>,
        cache: CacheConfig,
        paging: PageConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            cache: Arc::new(Mutex::new(ViewCache {
                views: CacheStore::with_clock(cache, clock),
                epoch: 0,
            })),
            writes: WriteQueue::new(T::COLLECTION),
            paging,
        }
    }

    pub fn paging(&self) -> PageConfig {
        self.paging
    }

    // == Reads ==
    /// Returns the whole collection, from cache when fresh.
    pub async fn get_all(&self) -> Result<Vec<T>> {
        let key = all_key::<T>();
        let (cached, epoch) = self.cache.lock().await.lookup(&key);
        if let Some(CachedView::Items(items)) = cached {
            return Ok(items);
        }

        let items = load::<T>(self.backend.as_ref()).await?;
        self.cache
            .lock()
            .await
            .fill(key, CachedView::Items(items.clone()), epoch);
        Ok(items)
    }

    /// Returns page `page` of size `limit`.
    ///
    /// A `limit` of zero means the configured default; larger than the
    /// configured maximum is clamped.
    pub async fn get_page(&self, page: usize, limit: usize) -> Result<Page<T>> {
        let limit = self.clamp_limit(limit);
        let key = format!("{}:page:{}:{}", T::COLLECTION, page, limit);
        let (cached, epoch) = self.cache.lock().await.lookup(&key);
        if let Some(CachedView::Page(cached)) = cached {
            return Ok(cached);
        }

        let all = self.get_all().await?;
        let result = Page::slice(&all, page, limit);
        self.cache
            .lock()
            .await
            .fill(key, CachedView::Page(result.clone()), epoch);
        Ok(result)
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.get_all().await?.len())
    }

    /// Looks a record up by id, failing with `NotFound`.
    pub async fn get_by_id(&self, id: &str) -> Result<T> {
        self.get_all()
            .await?
            .into_iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))
    }

    /// Case-insensitive substring search over each record's search fields.
    ///
    /// A blank query matches nothing and does not touch the backend.
    pub async fn search(&self, query: &str, page: usize, limit: usize) -> Result<Vec<T>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let limit = self.clamp_limit(limit);
        let key = format!("{}:search:{}:{}:{}", T::COLLECTION, query, page, limit);
        let (cached, epoch) = self.cache.lock().await.lookup(&key);
        if let Some(CachedView::Items(cached)) = cached {
            return Ok(cached);
        }

        let matches: Vec<T> = self
            .get_all()
            .await?
            .into_iter()
            .filter(|item| item.matches(&needle))
            .collect();
        let found = Page::slice(&matches, page, limit).items;

        self.cache
            .lock()
            .await
            .fill(key, CachedView::Items(found.clone()), epoch);
        Ok(found)
    }

    /// Warms the cache for the pages following `page`.
    ///
    /// Returns how many pages were loaded. Pages beyond the end are skipped.
    pub async fn prefetch(&self, page: usize, limit: usize) -> Result<usize> {
        let limit = self.clamp_limit(limit);
        let total = self.count().await?;
        let mut warmed = 0;

        let first = page.saturating_add(1);
        let last = page.saturating_add(self.paging.prefetch_pages);
        for next in first..=last {
            if next.saturating_mul(limit) >= total {
                break;
            }
            self.get_page(next, limit).await?;
            warmed += 1;
        }

        debug!("Prefetched {} {} pages after page {}", warmed, T::COLLECTION, page);
        Ok(warmed)
    }

    // == Writes ==
    /// Inserts `item`, or replaces the record with the same id.
    pub async fn save(&self, item: T) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        let cache = Arc::clone(&self.cache);

        self.writes
            .enqueue(move || async move {
                let mut items = load::<T>(backend.as_ref()).await?;
                let replaced = upsert(&mut items, item);
                store(backend.as_ref(), &items).await?;
                invalidate::<T>(&cache).await;
                debug!(
                    "{} {} record ({} total)",
                    if replaced { "Replaced" } else { "Added" },
                    T::COLLECTION,
                    items.len()
                );
                Ok(())
            })
            .await
    }

    /// Applies `change` to the record with id `id` and persists it.
    ///
    /// Returns the updated record, or `NotFound`.
    pub async fn update<F>(&self, id: &str, change: F) -> Result<T>
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        self.try_update(id, move |item| {
            change(item);
            Ok(())
        })
        .await
    }

    /// Like [`update`](Self::update), but `change` may refuse the edit.
    ///
    /// A refusal is returned as is and nothing is written.
    pub async fn try_update<F>(&self, id: &str, change: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let cache = Arc::clone(&self.cache);
        let id = id.to_string();

        self.writes
            .enqueue(move || async move {
                let mut items = load::<T>(backend.as_ref()).await?;
                let item = items
                    .iter_mut()
                    .find(|item| item.id() == id)
                    .ok_or_else(|| not_found::<T>(&id))?;
                change(item)?;
                let updated = item.clone();

                store(backend.as_ref(), &items).await?;
                invalidate::<T>(&cache).await;
                Ok(updated)
            })
            .await
    }

    /// Deletes the record with id `id`, returning it, or `NotFound`.
    pub async fn remove(&self, id: &str) -> Result<T> {
        let backend = Arc::clone(&self.backend);
        let cache = Arc::clone(&self.cache);
        let id = id.to_string();

        self.writes
            .enqueue(move || async move {
                let mut items = load::<T>(backend.as_ref()).await?;
                let index = items
                    .iter()
                    .position(|item| item.id() == id)
                    .ok_or_else(|| not_found::<T>(&id))?;
                let removed = items.remove(index);

                store(backend.as_ref(), &items).await?;
                invalidate::<T>(&cache).await;
                Ok(removed)
            })
            .await
    }

    // == Cache Control ==
    /// Drops every cached view of this collection.
    pub async fn refresh(&self) {
        self.cache.lock().await.clear();
        info!("Cleared cached {} views", T::COLLECTION);
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.views.stats()
    }

    /// Writes submitted but not yet finished.
    pub fn pending_writes(&self) -> usize {
        self.writes.pending()
    }

    fn clamp_limit(&self, limit: usize) -> usize {
        let limit = if limit == 0 {
            self.paging.default_page_size
        } else {
            limit
        };
        limit.clamp(1, self.paging.max_page_size.max(1))
    }
}

// == Helpers ==
fn all_key<T: Record>() -> String {
    format!("{}:all", T::COLLECTION)
}

fn not_found<T: Record>(id: &str) -> DataError {
    DataError::NotFound(format!("{} record {}", T::COLLECTION, id))
}

async fn load<T: Record>(backend: &dyn Backend) -> Result<Vec<T>> {
    backend
        .fetch_all(T::COLLECTION)
        .await?
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|e| {
                DataError::BackendError(format!("malformed {} record: {}", T::COLLECTION, e))
            })
        })
        .collect()
}

async fn store<T: Record>(backend: &dyn Backend, items: &[T]) -> Result<()> {
    let values = items
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<Value>, _>>()
        .map_err(|e| DataError::BackendError(format!("encoding {}: {}", T::COLLECTION, e)))?;
    backend.replace_all(T::COLLECTION, values).await
}

async fn invalidate<T: Record>(cache: &SharedViews<T>) {
    let removed = cache
        .lock()
        .await
        .invalidate(&format!("{}:", T::COLLECTION));
    debug!("Invalidated {} cached {} views", removed, T::COLLECTION);
}

/// Replaces the record with the same id, or appends. Returns true on replace.
fn upsert<T: Record>(items: &mut Vec<T>, item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => {
            *existing = item;
            true
        }
        None => {
            items.push(item);
            false
        }
    }
}
