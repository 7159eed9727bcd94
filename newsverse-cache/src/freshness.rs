//! Freshness states for cache entries.

/// Freshness of one cache entry.
///
/// The state is explicit so consumers never have to guess whether a value
/// they observe is current, a last-known snapshot awaiting refetch, or
/// mid-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    /// The value reflects the latest committed write.
    Fresh,
    /// The value (if any) is a last-known snapshot; the next read triggers
    /// a refetch.
    #[default]
    Stale,
    /// A fetch is in flight for this key.
    Loading,
}

impl Freshness {
    /// Returns true if a read can be served without touching the network.
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }

    /// Returns true if the next read must refetch.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }

    /// Returns true while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stale() {
        assert!(Freshness::default().is_stale());
    }

    #[test]
    fn test_predicates_are_exclusive() {
        for state in [Freshness::Fresh, Freshness::Stale, Freshness::Loading] {
            let hits = [state.is_fresh(), state.is_stale(), state.is_loading()]
                .iter()
                .filter(|b| **b)
                .count();
            assert_eq!(hits, 1);
        }
    }
}
