//! Session state and identity types.

use serde::{Deserialize, Serialize};

/// The visitor's identity as the remote service reports it.
///
/// Field names follow the wire format of `GET /api/user`; serde needs no
/// renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub picture: String,
}

/// The client's belief about whether the current visitor is authenticated.
///
/// Exactly one instance exists process-wide, owned by the keyed cache under
/// `CacheKey::Session`. The state machine:
///
/// - `Unresolved` (initial): the session has not been fetched yet, or the
///   fetch is still in flight.
/// - `Authenticated`: the last session fetch or mutation outcome carried a
///   populated identity.
/// - `Anonymous`: the service said "not authenticated", the session fetch
///   failed with `Unauthorized` (the same thing, seen through an error
///   path), or a forced override (logout, account deletion) wrote it.
///
/// There is no transition back to `Unresolved` short of a process restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Session not yet fetched or still loading.
    Unresolved,
    /// Visitor is logged in with the given identity.
    Authenticated(Identity),
    /// Visitor is not logged in.
    Anonymous,
}

impl SessionState {
    /// Returns true once the first session fetch (or a forced override)
    /// has resolved the state either way.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// Returns true for an authenticated session.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The identity, if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Unresolved
    }
}

/// Wire envelope returned by `GET /api/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Whether the session cookie resolved to a logged-in user.
    pub authenticated: bool,
    /// Present exactly when `authenticated` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}

impl From<SessionSnapshot> for SessionState {
    fn from(snapshot: SessionSnapshot) -> Self {
        match (snapshot.authenticated, snapshot.user) {
            (true, Some(identity)) => Self::Authenticated(identity),
            // An "authenticated" envelope without a user is malformed;
            // treat it as anonymous rather than inventing an identity.
            _ => Self::Anonymous,
        }
    }
}
