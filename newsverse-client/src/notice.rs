//! User-visible notices.
//!
//! Mutations never fail silently: every outcome that a person should see
//! (a like landing, a rating rejected, a logout that only half-worked) is
//! published as a [`Notice`]. The coordinator publishes through the
//! [`NoticeSink`] seam; the embedding UI decides how notices are rendered.

use std::sync::Arc;

use newsverse_core::{GatewayError, Timestamp};
use tokio::sync::mpsc;
use uuid::Uuid;

// ============================================================================
// Notice
// ============================================================================

/// How prominently a notice should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One user-visible notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: Uuid,
    pub severity: Severity,
    pub title: String,
    /// Optional longer explanation, shown under the title.
    pub body: Option<String>,
    /// Failure classification (`"unauthorized"`, `"conflict"`, ...) when the
    /// notice was raised by a gateway error. Lets the UI pick an icon or a
    /// retry affordance without parsing the title.
    pub classification: Option<&'static str>,
    pub created_at: Timestamp,
}

impl Notice {
    pub fn info(title: impl Into<String>) -> Self {
        Notice::new(Severity::Info, title, None, None)
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Notice::new(Severity::Warning, title, Some(body.into()), None)
    }

    /// Notice for a failed gateway call, carrying the error's classification.
    pub fn failure(title: impl Into<String>, error: &GatewayError) -> Self {
        Notice::new(
            Severity::Error,
            title,
            Some(error.to_string()),
            Some(error.class()),
        )
    }

    fn new(
        severity: Severity,
        title: impl Into<String>,
        body: Option<String>,
        classification: Option<&'static str>,
    ) -> Self {
        Notice {
            id: Uuid::now_v7(),
            severity,
            title: title.into(),
            body,
            classification,
            created_at: chrono::Utc::now(),
        }
    }
}

// ============================================================================
// NoticeSink
// ============================================================================

/// Destination for notices. Implementations must not block.
pub trait NoticeSink: Send + Sync {
    fn publish(&self, notice: Notice);
}

/// Sink backed by an unbounded channel; the receiving half is handed to the
/// UI layer, which drains it into toasts or banners.
pub struct ChannelNoticeSink {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNoticeSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(ChannelNoticeSink { tx }), rx)
    }
}

impl NoticeSink for ChannelNoticeSink {
    fn publish(&self, notice: Notice) {
        // A closed receiver means the UI is gone; nothing left to show.
        if self.tx.send(notice).is_err() {
            tracing::debug!("notice dropped: receiver closed");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
