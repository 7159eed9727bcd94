//! NewsVerse Cache - Keyed Cache with Subscriptions
//!
//! The one shared mutable resource of the client: a process-wide store
//! mapping semantic cache keys to the last-known server-derived value, its
//! freshness, and the set of interested subscribers.
//!
//! # Contracts
//!
//! - `read` de-duplicates: one fetch per key, no matter how many readers
//!   arrive while it is in flight, and every waiter resolves with the same
//!   result.
//! - `write` synchronously notifies subscribers in subscription order.
//! - `invalidate` marks a key stale; the next `read` refetches, and the
//!   refetch's commit is what notifies subscribers.
//! - Writes apply in completion order with override precedence: every
//!   `write`/`invalidate` bumps the key's epoch, and a fetch only commits
//!   if the epoch it started under is still current. A slow fetch can
//!   never resurrect a value that a later write replaced.
//!
//! All UI surfaces subscribe here rather than fetching independently; no
//! component holds a private, divergent copy of cached state.

mod fetch;
mod freshness;
mod store;

pub use fetch::{FetchResult, Fetcher};
pub use freshness::Freshness;
pub use store::{KeyedCache, Subscription};
