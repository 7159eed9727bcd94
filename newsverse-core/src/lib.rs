//! NewsVerse Core - Domain Types
//!
//! Data types shared by every crate in the client: session state, article
//! and preference entities as the remote service serializes them, the cache
//! key/value vocabulary, and the error taxonomy. This crate carries no I/O.

mod article;
mod error;
mod key;
mod preferences;
mod session;
mod value;

pub use article::{Article, FactCheck, Summarization};
pub use error::{
    ConfigError, GatewayError, GatewayResult, NewsverseError, NewsverseResult, ValidationError,
};
pub use key::CacheKey;
pub use preferences::{Rating, UserPreferences};
pub use session::{Identity, SessionSnapshot, SessionState};
pub use value::CacheValue;

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
