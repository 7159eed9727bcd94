//! Remote gateway.
//!
//! Typed access to the NewsVerse backend. Each operation is one HTTP round
//! trip against the configured base URL; the session cookie rides along via
//! the client's cookie store. The gateway classifies failures and returns -
//! it never retries and never touches the cache. Reconciliation is the
//! mutation coordinator's job.

use async_trait::async_trait;
use newsverse_core::{
    Article, GatewayError, GatewayResult, Identity, Rating, SessionSnapshot, UserPreferences,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;

// ============================================================================
// Acknowledgement payloads
// ============================================================================

/// Ack for a like toggle. `liked` is the authoritative post-toggle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeAck {
    pub message: String,
    pub liked: bool,
}

/// Generic ack carrying a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageAck {
    pub message: String,
}

/// Ack for onboarding completion; carries the now-complete identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingAck {
    pub user: Identity,
}

// ============================================================================
// RemoteGateway
// ============================================================================

/// The seam between the client and the backend. Production code uses
/// [`HttpGateway`]; tests substitute mocks.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn fetch_session(&self) -> GatewayResult<SessionSnapshot>;
    async fn fetch_articles(&self) -> GatewayResult<Vec<Article>>;
    async fn fetch_recommendations(&self) -> GatewayResult<Vec<Article>>;
    async fn fetch_random_sample(&self) -> GatewayResult<Vec<Article>>;
    async fn fetch_preferences(&self) -> GatewayResult<UserPreferences>;

    async fn toggle_like(&self, article_id: &str, title: &str) -> GatewayResult<LikeAck>;
    async fn submit_rating(&self, article_id: &str, rating: Rating) -> GatewayResult<MessageAck>;
    async fn update_preferences(&self, prefs: &UserPreferences) -> GatewayResult<()>;
    async fn complete_onboarding(&self, prefs: &UserPreferences) -> GatewayResult<OnboardingAck>;
    async fn schedule_notifications(&self) -> GatewayResult<MessageAck>;
    async fn run_pipeline(&self) -> GatewayResult<()>;
    async fn log_out(&self) -> GatewayResult<()>;
    async fn delete_account(&self) -> GatewayResult<()>;
}

// ============================================================================
// HttpGateway
// ============================================================================

/// `reqwest`-backed gateway with a cookie store, so the opaque session
/// cookie set at login is forwarded on every call.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Unknown {
                reason: format!("failed to build http client: {e}"),
            })?;

        Ok(HttpGateway {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(classify_transport)?;
        decode(response).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> GatewayResult<T> {
        let response = self
            .http
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(classify_transport)?;
        decode(response).await
    }

    /// POST with no payload, discarding any response body.
    async fn post_empty(&self, path: &str) -> GatewayResult<()> {
        let response = self
            .http
            .post(self.url(path))
            .send()
            .await
            .map_err(classify_transport)?;
        check_status(response).await
    }

    fn preference_form(prefs: &UserPreferences) -> Vec<(&'static str, String)> {
        vec![
            ("phone_number", prefs.phone_number.clone()),
            ("preferred_time", prefs.preferred_time.clone()),
        ]
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_session(&self) -> GatewayResult<SessionSnapshot> {
        self.get_json("/api/user").await
    }

    async fn fetch_articles(&self) -> GatewayResult<Vec<Article>> {
        self.get_json("/api/articles").await
    }

    async fn fetch_recommendations(&self) -> GatewayResult<Vec<Article>> {
        self.get_json("/api/recommendations").await
    }

    async fn fetch_random_sample(&self) -> GatewayResult<Vec<Article>> {
        self.get_json("/api/random-articles").await
    }

    async fn fetch_preferences(&self) -> GatewayResult<UserPreferences> {
        self.get_json("/api/user-preference").await
    }

    async fn toggle_like(&self, article_id: &str, title: &str) -> GatewayResult<LikeAck> {
        tracing::debug!(article_id, "toggling like");
        self.post_form(
            "/toggle-like",
            &[
                ("article_id", article_id.to_string()),
                ("article_title", title.to_string()),
            ],
        )
        .await
    }

    async fn submit_rating(&self, article_id: &str, rating: Rating) -> GatewayResult<MessageAck> {
        tracing::debug!(article_id, %rating, "submitting rating");
        self.post_form(
            "/api/rate-article",
            &[
                ("article_id", article_id.to_string()),
                ("rating", rating.to_string()),
            ],
        )
        .await
    }

    async fn update_preferences(&self, prefs: &UserPreferences) -> GatewayResult<()> {
        let response = self
            .http
            .post(self.url("/api/update-preference"))
            .form(&Self::preference_form(prefs))
            .send()
            .await
            .map_err(classify_transport)?;
        check_status(response).await
    }

    async fn complete_onboarding(&self, prefs: &UserPreferences) -> GatewayResult<OnboardingAck> {
        self.post_form("/api/complete-onboarding", &Self::preference_form(prefs))
            .await
    }

    async fn schedule_notifications(&self) -> GatewayResult<MessageAck> {
        self.post_form("/api/schedule-notifications", &[]).await
    }

    async fn run_pipeline(&self) -> GatewayResult<()> {
        let response = self
            .http
            .get(self.url("/run-pipeline"))
            .send()
            .await
            .map_err(classify_transport)?;
        check_status(response).await
    }

    async fn log_out(&self) -> GatewayResult<()> {
        self.post_empty("/api/logout").await
    }

    async fn delete_account(&self) -> GatewayResult<()> {
        let response = self
            .http
            .delete(self.url("/api/delete-account"))
            .send()
            .await
            .map_err(classify_transport)?;
        check_status(response).await
    }
}

// ============================================================================
// Failure classification
// ============================================================================

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status, body));
    }
    response.json().await.map_err(|e| GatewayError::Unknown {
        reason: format!("malformed response body: {e}"),
    })
}

async fn check_status(response: reqwest::Response) -> GatewayResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status, body))
}

fn classify_status(status: StatusCode, body: String) -> GatewayError {
    let reason = if body.is_empty() {
        format!("server returned {status}")
    } else {
        body
    };
    match status {
        StatusCode::UNAUTHORIZED => GatewayError::Unauthorized,
        StatusCode::CONFLICT => GatewayError::Conflict { reason },
        s if s.is_server_error() => GatewayError::Transient { reason },
        _ => GatewayError::Unknown { reason },
    }
}

fn classify_transport(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() || error.is_connect() {
        GatewayError::Transient {
            reason: error.to_string(),
        }
    } else {
        GatewayError::Unknown {
            reason: error.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
