//! Article entity as served by the recommendation service.

use serde::{Deserialize, Serialize};

/// Fact-check verdict attached to an article by the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FactCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_verdict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_check_explanation: Option<String>,
}

/// Summaries attached to an article by the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Summarization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_summary: Option<String>,
}

/// An article in a server-derived collection.
///
/// Collections are read-only from the UI's perspective; the only fields the
/// client ever splices in place are the per-visitor interaction flags
/// (`user_has_liked`, `user_has_rated`), and only with values taken from an
/// authoritative mutation acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Service-assigned identifier (a Mongo-style object id on the wire).
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub source: String,
    pub url: String,
    pub content: String,
    /// Whether the current visitor has liked this article.
    #[serde(default)]
    pub user_has_liked: bool,
    /// Whether the current visitor has rated this article. Ratings are
    /// one-shot; a second submission is a conflict.
    #[serde(default)]
    pub user_has_rated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<FactCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summarization: Option<Summarization>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_wire_format_round_trip() {
        let json = r#"{
            "_id": "665f1c2ab1e5a3d4c8f90a12",
            "title": "Rust 2.0 announced",
            "source": "The Register",
            "url": "https://example.com/rust-2",
            "content": "Full text.",
            "user_has_liked": true,
            "user_has_rated": false,
            "sentiment": "positive"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.id, "665f1c2ab1e5a3d4c8f90a12");
        assert!(article.user_has_liked);
        assert!(!article.user_has_rated);
        assert_eq!(article.sentiment.as_deref(), Some("positive"));
        assert!(article.fact_check.is_none());

        let back = serde_json::to_value(&article).unwrap();
        assert_eq!(back["_id"], "665f1c2ab1e5a3d4c8f90a12");
    }

    #[test]
    fn test_interaction_flags_default_to_false() {
        let json = r#"{
            "_id": "abc",
            "title": "t",
            "source": "s",
            "url": "u",
            "content": "c"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert!(!article.user_has_liked);
        assert!(!article.user_has_rated);
    }
}
