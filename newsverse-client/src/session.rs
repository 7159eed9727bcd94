//! Session resolution.
//!
//! [`SessionResolver`] specializes the keyed cache for `CacheKey::Session`.
//! It owns the session fetcher registration and exposes the tri-state
//! [`SessionState`] machine; UI surfaces read it (directly or through a
//! [`RouteGate`](crate::RouteGate)) but never write it. Writes come from
//! exactly two places: the session fetcher's commit and the mutation
//! coordinator's reconciliation.

use std::sync::Arc;

use newsverse_cache::{KeyedCache, Subscription};
use newsverse_core::{CacheKey, CacheValue, SessionState};

use crate::fetchers::SessionFetcher;
use crate::gateway::RemoteGateway;

/// Read-side access to the process-wide session state.
#[derive(Clone)]
pub struct SessionResolver {
    cache: KeyedCache,
}

impl SessionResolver {
    /// Create the resolver and register the session fetcher. There should
    /// be one resolver per client; clones share the same cache entry.
    pub fn new(cache: KeyedCache, gateway: Arc<dyn RemoteGateway>) -> Self {
        cache.register_fetcher(CacheKey::Session, Arc::new(SessionFetcher::new(gateway)));
        SessionResolver { cache }
    }

    /// Current state without touching the network. `Unresolved` until the
    /// first fetch or forced override commits.
    pub fn state(&self) -> SessionState {
        match self.cache.peek(CacheKey::Session) {
            Some(CacheValue::Session(state)) => state,
            _ => SessionState::Unresolved,
        }
    }

    /// Resolve the session, fetching if the cached state is stale or
    /// absent. Concurrent callers share one fetch.
    ///
    /// A fetch failure never blocks the transition out of `Unresolved`:
    /// `Anonymous` is committed to the cache (so subscribers and route
    /// gates observe the transition) but left stale, so a later `resolve`
    /// retries against the backend.
    pub async fn resolve(&self) -> SessionState {
        match self.cache.read(CacheKey::Session).await {
            Ok(CacheValue::Session(state)) => state,
            Ok(_) => SessionState::Unresolved,
            Err(e) => {
                tracing::warn!(error = %e, "session fetch failed; treating as anonymous");
                match self.state() {
                    SessionState::Unresolved => {
                        self.cache.write(
                            CacheKey::Session,
                            CacheValue::Session(SessionState::Anonymous),
                        );
                        // Stale on purpose: the anonymous view is a
                        // fallback, not a confirmed answer.
                        self.cache.invalidate(CacheKey::Session);
                        SessionState::Anonymous
                    }
                    // A state committed while the fetch was failing
                    // (forced override, onboarding) outranks the fallback.
                    committed => committed,
                }
            }
        }
    }

    /// Discard the cached state and resolve again. Used when the identity
    /// provider redirects back to the app root and the cookie may have just
    /// changed.
    pub async fn retry(&self) -> SessionState {
        self.cache.invalidate(CacheKey::Session);
        self.resolve().await
    }

    /// Observe every committed session transition. The callback fires
    /// synchronously inside the committing call, in subscription order.
    pub fn subscribe(
        &self,
        callback: impl Fn(&SessionState) + Send + Sync + 'static,
    ) -> Subscription {
        self.cache.subscribe(CacheKey::Session, move |value| {
            if let CacheValue::Session(state) = value {
                callback(state);
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use newsverse_core::{
        Article, GatewayError, GatewayResult, Identity, Rating, SessionSnapshot, UserPreferences,
    };

    use super::*;
    use crate::gateway::{LikeAck, MessageAck, OnboardingAck};
    use crate::route::{RouteDecision, RouteGate};

    /// Gateway whose session endpoint replays a scripted sequence of
    /// outcomes, one per call.
    struct SequencedGateway {
        session_outcomes: Mutex<Vec<GatewayResult<SessionSnapshot>>>,
        session_calls: AtomicUsize,
    }

    impl SequencedGateway {
        fn new(outcomes: Vec<GatewayResult<SessionSnapshot>>) -> Arc<Self> {
            Arc::new(SequencedGateway {
                session_outcomes: Mutex::new(outcomes),
                session_calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.session_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteGateway for SequencedGateway {
        async fn fetch_session(&self) -> GatewayResult<SessionSnapshot> {
            self.session_calls.fetch_add(1, Ordering::SeqCst);
            let mut outcomes = self.session_outcomes.lock().unwrap();
            if outcomes.is_empty() {
                Err(GatewayError::Unknown {
                    reason: "no scripted outcome".to_string(),
                })
            } else {
                outcomes.remove(0)
            }
        }
        async fn fetch_articles(&self) -> GatewayResult<Vec<Article>> {
            Ok(vec![])
        }
        async fn fetch_recommendations(&self) -> GatewayResult<Vec<Article>> {
            Ok(vec![])
        }
        async fn fetch_random_sample(&self) -> GatewayResult<Vec<Article>> {
            Ok(vec![])
        }
        async fn fetch_preferences(&self) -> GatewayResult<UserPreferences> {
            Err(GatewayError::Unauthorized)
        }
        async fn toggle_like(&self, _id: &str, _title: &str) -> GatewayResult<LikeAck> {
            unimplemented!("not used by session tests")
        }
        async fn submit_rating(&self, _id: &str, _rating: Rating) -> GatewayResult<MessageAck> {
            unimplemented!("not used by session tests")
        }
        async fn update_preferences(&self, _prefs: &UserPreferences) -> GatewayResult<()> {
            unimplemented!("not used by session tests")
        }
        async fn complete_onboarding(
            &self,
            _prefs: &UserPreferences,
        ) -> GatewayResult<OnboardingAck> {
            unimplemented!("not used by session tests")
        }
        async fn schedule_notifications(&self) -> GatewayResult<MessageAck> {
            unimplemented!("not used by session tests")
        }
        async fn run_pipeline(&self) -> GatewayResult<()> {
            unimplemented!("not used by session tests")
        }
        async fn log_out(&self) -> GatewayResult<()> {
            unimplemented!("not used by session tests")
        }
        async fn delete_account(&self) -> GatewayResult<()> {
            unimplemented!("not used by session tests")
        }
    }

    fn authenticated_snapshot() -> SessionSnapshot {
        SessionSnapshot {
            authenticated: true,
            user: Some(Identity {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                picture: "https://example.com/ada.png".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_state_is_unresolved_before_first_fetch() {
        let gateway = SequencedGateway::new(vec![]);
        let resolver = SessionResolver::new(KeyedCache::new(), gateway);
        assert_eq!(resolver.state(), SessionState::Unresolved);
    }

    #[tokio::test]
    async fn test_resolve_commits_authenticated_state() {
        let gateway = SequencedGateway::new(vec![Ok(authenticated_snapshot())]);
        let resolver = SessionResolver::new(KeyedCache::new(), Arc::clone(&gateway) as _);

        let state = resolver.resolve().await;
        assert!(state.is_authenticated());
        assert!(resolver.state().is_authenticated());
        assert_eq!(gateway.calls(), 1);

        // Fresh now; a second resolve serves from cache.
        resolver.resolve().await;
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_resolves_to_anonymous_not_error() {
        let gateway = SequencedGateway::new(vec![Err(GatewayError::Unauthorized)]);
        let resolver = SessionResolver::new(KeyedCache::new(), gateway);

        let state = resolver.resolve().await;
        assert_eq!(state, SessionState::Anonymous);
        // Committed, not just returned: peek sees it too.
        assert_eq!(resolver.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_transient_failure_reports_anonymous_but_retries_later() {
        let gateway = SequencedGateway::new(vec![
            Err(GatewayError::Transient {
                reason: "connect refused".to_string(),
            }),
            Ok(authenticated_snapshot()),
        ]);
        let resolver = SessionResolver::new(KeyedCache::new(), Arc::clone(&gateway) as _);

        // First resolve fails; the anonymous fallback is committed so
        // nobody stays blocked in Unresolved.
        assert_eq!(resolver.resolve().await, SessionState::Anonymous);
        assert_eq!(resolver.state(), SessionState::Anonymous);
        // Committed stale, so the next resolve goes back to the gateway.
        assert!(resolver.resolve().await.is_authenticated());
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_moves_route_gates_off_placeholder() {
        let gateway = SequencedGateway::new(vec![Err(GatewayError::Transient {
            reason: "connect refused".to_string(),
        })]);
        let resolver = SessionResolver::new(KeyedCache::new(), gateway);
        let gate = RouteGate::new(&resolver, "/preferences");
        assert_eq!(gate.decision(), RouteDecision::Placeholder);

        resolver.resolve().await;

        // The failure committed Anonymous, so the gate redirects instead
        // of holding the placeholder forever.
        assert_eq!(
            gate.decision(),
            RouteDecision::RedirectToLogin {
                from: "/preferences".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_retry_discards_cached_state_and_refetches() {
        let gateway = SequencedGateway::new(vec![
            Err(GatewayError::Unauthorized),
            Ok(authenticated_snapshot()),
        ]);
        let resolver = SessionResolver::new(KeyedCache::new(), Arc::clone(&gateway) as _);

        assert_eq!(resolver.resolve().await, SessionState::Anonymous);
        // Post-login redirect back to the app: the cookie changed.
        let state = resolver.retry().await;
        assert!(state.is_authenticated());
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_subscriber_observes_session_transitions() {
        let gateway = SequencedGateway::new(vec![Ok(authenticated_snapshot())]);
        let cache = KeyedCache::new();
        let resolver = SessionResolver::new(cache.clone(), gateway);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_cb = Arc::clone(&seen);
        let _sub = resolver.subscribe(move |state| {
            seen_in_cb.lock().unwrap().push(state.clone());
        });

        resolver.resolve().await;
        cache.write(
            CacheKey::Session,
            CacheValue::Session(SessionState::Anonymous),
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_authenticated());
        assert_eq!(seen[1], SessionState::Anonymous);
    }
}
