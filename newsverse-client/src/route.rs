//! Route gating.
//!
//! Protected destinations ask the route gate what to show: the real
//! content, a placeholder while the session is still unresolved, or a
//! redirect to the login page. The decision function is pure; [`RouteGate`]
//! keeps a decision live by re-evaluating on every session transition.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use newsverse_cache::Subscription;
use newsverse_core::SessionState;

use crate::session::SessionResolver;

/// How long navigation is given to settle before scrolling or focusing an
/// anchor on the destination page. Cosmetic, not correctness-bearing.
pub const NAVIGATION_SETTLE: Duration = Duration::from_millis(100);

// ============================================================================
// Decision
// ============================================================================

/// What a protected route should do for the current session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session is authenticated: render the protected content.
    Render,
    /// Session still unresolved: show a loading placeholder. Never redirect
    /// here, or every hard refresh would bounce through the login page.
    Placeholder,
    /// Session is anonymous: send the visitor to login, remembering where
    /// they were headed.
    RedirectToLogin {
        /// The originally requested path, to return to after login.
        from: String,
    },
}

/// Decide what to do with a request for `requested_path` under `state`.
pub fn decide(state: &SessionState, requested_path: &str) -> RouteDecision {
    match state {
        SessionState::Unresolved => RouteDecision::Placeholder,
        SessionState::Authenticated(_) => RouteDecision::Render,
        SessionState::Anonymous => RouteDecision::RedirectToLogin {
            from: requested_path.to_string(),
        },
    }
}

/// Build the identity-provider entry URL carrying the post-login return
/// destination.
pub fn login_redirect_url(login_url: &str, from: &str) -> String {
    format!("{login_url}?return_to={}", urlencoding::encode(from))
}

/// Yield until navigation has settled. Destination pages await this before
/// scrolling to an in-page anchor.
pub async fn settle_navigation() {
    tokio::time::sleep(NAVIGATION_SETTLE).await;
}

// ============================================================================
// RouteGate
// ============================================================================

/// A live decision for one protected destination.
///
/// Evaluates immediately against the resolver's current state, then
/// re-evaluates inside every session commit, so by the time a mutation
/// (onboarding completion, logout) returns, gates already reflect the new
/// session.
pub struct RouteGate {
    decision: Arc<Mutex<RouteDecision>>,
    _subscription: Subscription,
}

impl RouteGate {
    pub fn new(resolver: &SessionResolver, requested_path: impl Into<String>) -> Self {
        let requested_path = requested_path.into();
        let decision = Arc::new(Mutex::new(decide(&resolver.state(), &requested_path)));

        let shared = Arc::clone(&decision);
        let subscription = resolver.subscribe(move |state| {
            let next = decide(state, &requested_path);
            *shared.lock().unwrap_or_else(PoisonError::into_inner) = next;
        });

        RouteGate {
            decision,
            _subscription: subscription,
        }
    }

    /// The current decision. Synchronous; no fetch is triggered.
    pub fn decision(&self) -> RouteDecision {
        self.decision
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
