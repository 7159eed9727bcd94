//! The fetch seam between the cache and the remote gateway.

use async_trait::async_trait;
use newsverse_core::{CacheValue, GatewayError};

/// Outcome of one fetch. Cloneable so a single in-flight fetch can resolve
/// every de-duplicated waiter.
pub type FetchResult = Result<CacheValue, GatewayError>;

/// Fetch function associated with a cache key.
///
/// Registered once per key; the cache invokes it when a read finds the
/// entry stale or absent. Implementations perform exactly one logical
/// fetch and classify failures; they never mutate the cache themselves.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self) -> FetchResult;
}
