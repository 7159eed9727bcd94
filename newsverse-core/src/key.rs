//! Semantic cache keys.

use serde::{Deserialize, Serialize};

/// Stable identifier for one piece of server-derived state the client
/// tracks locally.
///
/// Keys are semantic, not parameterized URLs: the same key always maps to
/// the same fetch operation, and every UI surface interested in the data
/// subscribes to the key rather than fetching on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    /// The current session (`GET /api/user`). Exactly one process-wide.
    Session,
    /// Recommendations ranked for the current session.
    Recommendations,
    /// The full article feed.
    AllArticles,
    /// A random sample of articles for logged-out browsing.
    RandomSample,
    /// The visitor's notification preferences.
    Preferences,
}

impl CacheKey {
    /// All keys whose contents are derived from the current session.
    ///
    /// When the session is destroyed (logout, account deletion) these must
    /// be invalidated so no snapshot of the old session is ever served.
    pub const SESSION_SCOPED: [CacheKey; 4] = [
        CacheKey::Recommendations,
        CacheKey::AllArticles,
        CacheKey::RandomSample,
        CacheKey::Preferences,
    ];

    /// Keys holding article collections.
    pub const ARTICLE_COLLECTIONS: [CacheKey; 3] = [
        CacheKey::Recommendations,
        CacheKey::AllArticles,
        CacheKey::RandomSample,
    ];
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CacheKey::Session => "session",
            CacheKey::Recommendations => "recommendations",
            CacheKey::AllArticles => "all-articles",
            CacheKey::RandomSample => "random-sample",
            CacheKey::Preferences => "preferences",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_scoped_excludes_session_itself() {
        assert!(!CacheKey::SESSION_SCOPED.contains(&CacheKey::Session));
    }

    #[test]
    fn test_article_collections_subset_of_session_scoped() {
        for key in CacheKey::ARTICLE_COLLECTIONS {
            assert!(CacheKey::SESSION_SCOPED.contains(&key));
        }
    }

    #[test]
    fn test_display_names_are_stable() {
        assert_eq!(CacheKey::Session.to_string(), "session");
        assert_eq!(CacheKey::RandomSample.to_string(), "random-sample");
    }
}
