//! The keyed cache store.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use futures_util::future::Shared;
use futures_util::FutureExt;
use newsverse_core::{CacheKey, CacheValue, GatewayError};

use crate::fetch::{FetchResult, Fetcher};
use crate::freshness::Freshness;

/// Subscriber callback, invoked synchronously on every committed write.
type SubscriberFn = Arc<dyn Fn(&CacheValue) + Send + Sync>;

/// A de-duplicated in-flight fetch: cloned to every concurrent reader.
type SharedFetch = Shared<Pin<Box<dyn Future<Output = FetchResult> + Send>>>;

#[derive(Default)]
struct EntryState {
    value: Option<CacheValue>,
    freshness: Freshness,
    /// Bumped by every write and invalidate. A fetch only commits if the
    /// epoch it started under is still current, which gives forced
    /// overrides unconditional precedence over fetches already in flight.
    epoch: u64,
    updated_at: Option<DateTime<Utc>>,
    in_flight: Option<SharedFetch>,
    subscribers: Vec<(u64, SubscriberFn)>,
    next_subscriber_id: u64,
}

struct CacheInner {
    entries: Mutex<HashMap<CacheKey, EntryState>>,
    fetchers: Mutex<HashMap<CacheKey, Arc<dyn Fetcher>>>,
}

impl CacheInner {
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, EntryState>> {
        // A poisoned lock means a subscriber panicked mid-notify; the map
        // itself is still coherent, so keep serving it.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fetchers(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<dyn Fetcher>>> {
        self.fetchers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the entry's value under the lock, returning the callbacks
    /// to notify. Callers invoke them after releasing the lock, in
    /// subscription order, within the same call.
    fn apply_write(entry: &mut EntryState, value: CacheValue) -> Vec<SubscriberFn> {
        entry.value = Some(value);
        entry.freshness = Freshness::Fresh;
        entry.epoch += 1;
        entry.updated_at = Some(Utc::now());
        entry.in_flight = None;
        entry.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
    }

    /// Commit a value and notify subscribers.
    fn commit(&self, key: CacheKey, value: CacheValue) {
        let callbacks = {
            let mut entries = self.entries();
            let entry = entries.entry(key).or_default();
            Self::apply_write(entry, value.clone())
        };
        tracing::debug!(key = %key, subscribers = callbacks.len(), "cache write");
        for callback in callbacks {
            callback(&value);
        }
    }

    /// Apply the outcome of a fetch that started under `epoch`.
    ///
    /// The epoch check and the commit happen under one lock acquisition:
    /// a write landing between them could otherwise be clobbered by the
    /// fetch result. When a write or invalidate has happened since the
    /// fetch started, the result is discarded without touching the entry;
    /// the waiters still receive it.
    fn complete_fetch(&self, key: CacheKey, epoch: u64, result: &FetchResult) {
        let notify = {
            let mut entries = self.entries();
            let entry = entries.entry(key).or_default();
            if entry.epoch != epoch {
                tracing::debug!(key = %key, epoch, "fetch superseded by a later write, result discarded");
                None
            } else {
                match result {
                    Ok(value) => {
                        let callbacks = Self::apply_write(entry, value.clone());
                        Some((value.clone(), callbacks))
                    }
                    Err(error) => {
                        tracing::debug!(key = %key, %error, "fetch failed, entry left stale");
                        entry.freshness = Freshness::Stale;
                        entry.in_flight = None;
                        None
                    }
                }
            }
        };
        if let Some((value, callbacks)) = notify {
            tracing::debug!(key = %key, subscribers = callbacks.len(), "fetch committed");
            for callback in callbacks {
                callback(&value);
            }
        }
    }

    fn remove_subscriber(&self, key: CacheKey, id: u64) {
        let mut entries = self.entries();
        if let Some(entry) = entries.get_mut(&key) {
            entry.subscribers.retain(|(sub_id, _)| *sub_id != id);
        }
    }
}

/// Process-wide store mapping cache keys to last-known values, freshness,
/// and subscribers.
///
/// Cheap to clone; clones share the same store. All mutation goes through
/// [`KeyedCache::write`] and [`KeyedCache::invalidate`]; cached values are
/// never handed out by reference, so no consumer can mutate shared state
/// in place.
#[derive(Clone)]
pub struct KeyedCache {
    inner: Arc<CacheInner>,
}

impl KeyedCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: Mutex::new(HashMap::new()),
                fetchers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Associate the fetch function invoked when a read finds `key` stale
    /// or absent. Registering again replaces the previous fetcher.
    pub fn register_fetcher(&self, key: CacheKey, fetcher: Arc<dyn Fetcher>) {
        self.inner.fetchers().insert(key, fetcher);
    }

    /// Read the value for `key`.
    ///
    /// Fresh entries return immediately. Stale or absent entries mark the
    /// key `Loading` and run the registered fetcher exactly once for all
    /// concurrent readers; every waiter resolves with the same result.
    pub async fn read(&self, key: CacheKey) -> FetchResult {
        let shared = {
            let fetcher = self.inner.fetchers().get(&key).cloned();
            let mut entries = self.inner.entries();
            let entry = entries.entry(key).or_default();

            if entry.freshness.is_fresh() {
                if let Some(value) = &entry.value {
                    return Ok(value.clone());
                }
            }

            if let Some(in_flight) = &entry.in_flight {
                in_flight.clone()
            } else {
                let Some(fetcher) = fetcher else {
                    return Err(GatewayError::Unknown {
                        reason: format!("no fetcher registered for cache key '{key}'"),
                    });
                };
                let epoch = entry.epoch;
                let weak = Arc::downgrade(&self.inner);
                let fut: Pin<Box<dyn Future<Output = FetchResult> + Send>> =
                    Box::pin(async move {
                        let result = fetcher.fetch().await;
                        if let Some(inner) = weak.upgrade() {
                            inner.complete_fetch(key, epoch, &result);
                        }
                        result
                    });
                let shared = fut.shared();
                entry.freshness = Freshness::Loading;
                entry.in_flight = Some(shared.clone());
                shared
            }
        };

        shared.await
    }

    /// Last-known value without triggering a fetch, regardless of
    /// freshness. This is how UI surfaces re-derive their view
    /// synchronously after a notification.
    pub fn peek(&self, key: CacheKey) -> Option<CacheValue> {
        self.inner.entries().get(&key).and_then(|e| e.value.clone())
    }

    /// Current freshness of `key`. Absent entries report `Stale`.
    pub fn freshness(&self, key: CacheKey) -> Freshness {
        self.inner
            .entries()
            .get(&key)
            .map(|e| e.freshness)
            .unwrap_or_default()
    }

    /// When `key` last committed a value.
    pub fn updated_at(&self, key: CacheKey) -> Option<DateTime<Utc>> {
        self.inner.entries().get(&key).and_then(|e| e.updated_at)
    }

    /// Replace the value for `key`, mark it `Fresh`, and synchronously
    /// notify subscribers in subscription order.
    ///
    /// Takes precedence over any fetch in flight: the fetch's eventual
    /// result will not overwrite this value.
    pub fn write(&self, key: CacheKey, value: CacheValue) {
        self.inner.commit(key, value);
    }

    /// Mark `key` stale. Does not refetch; the next `read` does, and its
    /// commit is what notifies subscribers. Like `write`, this supersedes
    /// any fetch already in flight.
    pub fn invalidate(&self, key: CacheKey) {
        let mut entries = self.inner.entries();
        let entry = entries.entry(key).or_default();
        entry.freshness = Freshness::Stale;
        entry.epoch += 1;
        entry.in_flight = None;
        tracing::debug!(key = %key, "cache invalidate");
    }

    /// Register a callback invoked on every write to `key`. The returned
    /// handle deregisters the callback when dropped (or via
    /// [`Subscription::unsubscribe`]); a defunct observer is never
    /// notified.
    pub fn subscribe(
        &self,
        key: CacheKey,
        callback: impl Fn(&CacheValue) + Send + Sync + 'static,
    ) -> Subscription {
        let mut entries = self.inner.entries();
        let entry = entries.entry(key).or_default();
        let id = entry.next_subscriber_id;
        entry.next_subscriber_id += 1;
        entry.subscribers.push((id, Arc::new(callback)));
        Subscription {
            key,
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for KeyedCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Deregistration handle for one cache subscription.
///
/// Dropping the handle removes the callback; hold it for as long as the
/// subscriber should stay live.
#[must_use = "dropping the subscription immediately deregisters the callback"]
pub struct Subscription {
    key: CacheKey,
    id: u64,
    inner: Weak<CacheInner>,
}

impl Subscription {
    /// Explicitly deregister. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.remove_subscriber(self.key, self.id);
        }
    }
}
