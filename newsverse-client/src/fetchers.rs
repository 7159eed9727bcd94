//! Cache fetchers.
//!
//! One [`Fetcher`] per cache key, each delegating to the gateway and
//! wrapping the payload in the key's [`CacheValue`] variant. Registered at
//! client construction; after that the cache pulls data on demand and
//! nothing else talks to the gateway for reads.

use std::sync::Arc;

use async_trait::async_trait;
use newsverse_cache::{FetchResult, Fetcher, KeyedCache};
use newsverse_core::{CacheKey, CacheValue, GatewayError, SessionState};

use crate::gateway::RemoteGateway;

/// Fetcher for `CacheKey::Session`.
///
/// `Unauthorized` is mapped to `Anonymous` rather than propagated: an
/// anonymous visitor is a steady state of the application, not a failure.
/// Other errors surface as-is, leaving the entry stale so a later read
/// retries.
pub struct SessionFetcher {
    gateway: Arc<dyn RemoteGateway>,
}

impl SessionFetcher {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        SessionFetcher { gateway }
    }
}

#[async_trait]
impl Fetcher for SessionFetcher {
    async fn fetch(&self) -> FetchResult {
        match self.gateway.fetch_session().await {
            Ok(snapshot) => Ok(CacheValue::Session(SessionState::from(snapshot))),
            Err(GatewayError::Unauthorized) => Ok(CacheValue::Session(SessionState::Anonymous)),
            Err(e) => Err(e),
        }
    }
}

/// Fetcher for the article-collection keys; which gateway call it makes is
/// decided by the key it was registered under.
struct ArticlesFetcher {
    gateway: Arc<dyn RemoteGateway>,
    key: CacheKey,
}

#[async_trait]
impl Fetcher for ArticlesFetcher {
    async fn fetch(&self) -> FetchResult {
        let articles = match self.key {
            CacheKey::Recommendations => self.gateway.fetch_recommendations().await?,
            CacheKey::AllArticles => self.gateway.fetch_articles().await?,
            CacheKey::RandomSample => self.gateway.fetch_random_sample().await?,
            other => {
                return Err(GatewayError::Unknown {
                    reason: format!("no article fetch for key {other}"),
                })
            }
        };
        Ok(CacheValue::Articles(articles))
    }
}

struct PreferencesFetcher {
    gateway: Arc<dyn RemoteGateway>,
}

#[async_trait]
impl Fetcher for PreferencesFetcher {
    async fn fetch(&self) -> FetchResult {
        let prefs = self.gateway.fetch_preferences().await?;
        Ok(CacheValue::Preferences(prefs))
    }
}

/// Wire gateway-backed fetchers into the cache for every key except
/// `Session`, which the [`SessionResolver`](crate::SessionResolver)
/// registers itself.
pub fn register_fetchers(cache: &KeyedCache, gateway: &Arc<dyn RemoteGateway>) {
    for key in [
        CacheKey::Recommendations,
        CacheKey::AllArticles,
        CacheKey::RandomSample,
    ] {
        cache.register_fetcher(
            key,
            Arc::new(ArticlesFetcher {
                gateway: Arc::clone(gateway),
                key,
            }),
        );
    }
    cache.register_fetcher(
        CacheKey::Preferences,
        Arc::new(PreferencesFetcher {
            gateway: Arc::clone(gateway),
        }),
    );
}
