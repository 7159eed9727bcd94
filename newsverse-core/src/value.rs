//! Cached value variants.

use serde::{Deserialize, Serialize};

use crate::{Article, SessionState, UserPreferences};

/// The closed set of values the keyed cache holds.
///
/// A small enum instead of type-erased storage keeps the reconciliation
/// reasoning in one place: every cache key maps to exactly one variant, and
/// a mismatch is a programming error surfaced at the access site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheValue {
    Session(SessionState),
    Articles(Vec<Article>),
    Preferences(UserPreferences),
}

impl CacheValue {
    pub fn as_session(&self) -> Option<&SessionState> {
        match self {
            Self::Session(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_articles(&self) -> Option<&[Article]> {
        match self {
            Self::Articles(articles) => Some(articles),
            _ => None,
        }
    }

    pub fn as_preferences(&self) -> Option<&UserPreferences> {
        match self {
            Self::Preferences(prefs) => Some(prefs),
            _ => None,
        }
    }
}

impl From<SessionState> for CacheValue {
    fn from(state: SessionState) -> Self {
        Self::Session(state)
    }
}

impl From<Vec<Article>> for CacheValue {
    fn from(articles: Vec<Article>) -> Self {
        Self::Articles(articles)
    }
}

impl From<UserPreferences> for CacheValue {
    fn from(prefs: UserPreferences) -> Self {
        Self::Preferences(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variants() {
        let value = CacheValue::from(SessionState::Anonymous);
        assert!(value.as_session().is_some());
        assert!(value.as_articles().is_none());
        assert!(value.as_preferences().is_none());

        let value = CacheValue::from(Vec::<Article>::new());
        assert!(value.as_articles().is_some());

        let value = CacheValue::from(UserPreferences::new("+123456789", "08:00"));
        assert!(value.as_preferences().is_some());
    }
}
