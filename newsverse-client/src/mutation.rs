//! Mutation coordination.
//!
//! Every state-changing user action funnels through the
//! [`MutationCoordinator`]: it calls the gateway, then reconciles the cache
//! according to the mutation's [`ReconcilePolicy`], and publishes a
//! [`Notice`](crate::Notice) for anything a person should see. The cache is
//! only touched on the paths the policy table names; a failed call leaves
//! cached data exactly as it was (forced session overrides excepted).

use std::sync::Arc;

use newsverse_cache::KeyedCache;
use newsverse_core::{
    Article, CacheKey, CacheValue, GatewayError, Identity, NewsverseError, NewsverseResult,
    Rating, SessionState, UserPreferences,
};

use crate::gateway::RemoteGateway;
use crate::notice::{Notice, NoticeSink};

// ============================================================================
// Policy table
// ============================================================================

/// Every mutation the client can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    ToggleLike,
    SubmitRating,
    UpdatePreferences,
    CompleteOnboarding,
    ScheduleNotifications,
    RunPipeline,
    LogOut,
    DeleteAccount,
}

/// How a mutation's outcome is reconciled into the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// The ack (or the submitted payload) is authoritative: write it into
    /// the affected entries directly, no refetch.
    DirectWrite,
    /// The server-side effect is not locally predictable: mark the affected
    /// entries stale and let the next read refetch.
    InvalidateOnly,
    /// Overwrite the session entry unconditionally, even when the remote
    /// call failed.
    ForcedSessionOverride,
}

impl MutationKind {
    /// The reconciliation policy table. `ScheduleNotifications` has no
    /// cache effect at all; it falls under `InvalidateOnly` with an empty
    /// key set.
    pub fn policy(&self) -> ReconcilePolicy {
        match self {
            MutationKind::ToggleLike
            | MutationKind::SubmitRating
            | MutationKind::UpdatePreferences
            | MutationKind::CompleteOnboarding => ReconcilePolicy::DirectWrite,
            MutationKind::ScheduleNotifications | MutationKind::RunPipeline => {
                ReconcilePolicy::InvalidateOnly
            }
            MutationKind::LogOut | MutationKind::DeleteAccount => {
                ReconcilePolicy::ForcedSessionOverride
            }
        }
    }
}

// ============================================================================
// MutationCoordinator
// ============================================================================

/// Executes mutations and reconciles their outcomes into the cache.
///
/// The coordinator does not de-duplicate concurrent calls to the same
/// mutation; disabling the triggering control while a call is pending is
/// the embedding UI's responsibility.
pub struct MutationCoordinator {
    gateway: Arc<dyn RemoteGateway>,
    cache: KeyedCache,
    notices: Arc<dyn NoticeSink>,
}

impl MutationCoordinator {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        cache: KeyedCache,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        MutationCoordinator {
            gateway,
            cache,
            notices,
        }
    }

    /// Toggle the like flag on an article. Returns the authoritative
    /// post-toggle state from the server's ack, after splicing it into
    /// every cached collection containing the article.
    pub async fn toggle_like(&self, article_id: &str, title: &str) -> NewsverseResult<bool> {
        let ack = self
            .gateway
            .toggle_like(article_id, title)
            .await
            .map_err(|e| self.fail("Could not update like", e))?;

        self.splice_article(article_id, |article| article.user_has_liked = ack.liked);
        self.notices.publish(Notice::info(if ack.liked {
            "Article liked"
        } else {
            "Like removed"
        }));
        Ok(ack.liked)
    }

    /// Submit a rating for an article.
    ///
    /// Short-circuits with `Conflict` before any network call when a cached
    /// copy of the article already carries `user_has_rated`; the server
    /// enforces the same rule, this just saves the round trip.
    pub async fn submit_rating(&self, article_id: &str, rating: Rating) -> NewsverseResult<()> {
        if self.cached_article_is_rated(article_id) {
            let err = GatewayError::Conflict {
                reason: "You have already rated this article".to_string(),
            };
            return Err(self.fail("Rating not submitted", err));
        }

        let ack = self
            .gateway
            .submit_rating(article_id, rating)
            .await
            .map_err(|e| self.fail("Rating not submitted", e))?;

        self.splice_article(article_id, |article| article.user_has_rated = true);
        self.notices.publish(Notice::info(ack.message));
        Ok(())
    }

    /// Persist notification preferences. The submitted values are written
    /// to the cache on success; the server stores exactly what it was sent.
    pub async fn update_preferences(&self, prefs: &UserPreferences) -> NewsverseResult<()> {
        prefs.validate()?;

        self.gateway
            .update_preferences(prefs)
            .await
            .map_err(|e| self.fail("Preferences not saved", e))?;

        self.cache
            .write(CacheKey::Preferences, CacheValue::Preferences(prefs.clone()));
        self.notices
            .publish(Notice::info("Your preferences have been saved"));
        Ok(())
    }

    /// Complete first-run onboarding. On success the session entry is
    /// written with the returned identity *before* this method returns, so
    /// a route gate consulted during the subsequent navigation already sees
    /// `Authenticated`.
    pub async fn complete_onboarding(
        &self,
        prefs: &UserPreferences,
    ) -> NewsverseResult<Identity> {
        prefs.validate()?;

        let ack = self
            .gateway
            .complete_onboarding(prefs)
            .await
            .map_err(|e| self.fail("Could not complete setup", e))?;

        self.cache.write(
            CacheKey::Session,
            CacheValue::Session(SessionState::Authenticated(ack.user.clone())),
        );
        self.cache
            .write(CacheKey::Preferences, CacheValue::Preferences(prefs.clone()));
        self.notices
            .publish(Notice::info("Welcome! Your profile is complete"));
        Ok(ack.user)
    }

    /// Ask the backend to schedule notification delivery. No cache effect;
    /// the ack message is surfaced as a notice.
    pub async fn schedule_notifications(&self) -> NewsverseResult<String> {
        let ack = self
            .gateway
            .schedule_notifications()
            .await
            .map_err(|e| self.fail("Could not schedule notifications", e))?;

        self.notices.publish(Notice::info(ack.message.clone()));
        Ok(ack.message)
    }

    /// Trigger the backend analysis pipeline. Its effect on rankings is not
    /// locally predictable, so every article collection is invalidated and
    /// refetched on next read.
    pub async fn run_pipeline(&self) -> NewsverseResult<()> {
        self.gateway
            .run_pipeline()
            .await
            .map_err(|e| self.fail("Could not start analysis", e))?;

        for key in CacheKey::ARTICLE_COLLECTIONS {
            self.cache.invalidate(key);
        }
        self.notices
            .publish(Notice::info("News analysis is running in the background"));
        Ok(())
    }

    /// Log out. The session entry is overwritten with `Anonymous` whether
    /// or not the remote call succeeds: the user asked to be logged out,
    /// and a dead backend must not pin them into an authenticated view.
    pub async fn log_out(&self) -> NewsverseResult<()> {
        let result = self.gateway.log_out().await;

        self.cache.write(
            CacheKey::Session,
            CacheValue::Session(SessionState::Anonymous),
        );

        match result {
            Ok(()) => self.notices.publish(Notice::info("You have been logged out")),
            Err(e) => {
                tracing::warn!(error = %e, "logout call failed; session cleared locally");
                self.notices.publish(Notice::warning(
                    "Logged out locally",
                    format!("The server could not be reached: {e}"),
                ));
            }
        }
        Ok(())
    }

    /// Delete the account. Like logout, the local session is forced to
    /// `Anonymous` regardless of outcome; additionally every session-scoped
    /// entry is invalidated so no snapshot of the deleted account's data
    /// can be served afterwards.
    pub async fn delete_account(&self) -> NewsverseResult<()> {
        let result = self.gateway.delete_account().await;

        self.cache.write(
            CacheKey::Session,
            CacheValue::Session(SessionState::Anonymous),
        );
        for key in CacheKey::SESSION_SCOPED {
            self.cache.invalidate(key);
        }

        match result {
            Ok(()) => self
                .notices
                .publish(Notice::info("Your account has been deleted")),
            Err(e) => {
                tracing::warn!(error = %e, "account deletion failed; session cleared locally");
                self.notices.publish(Notice::warning(
                    "Account deletion may not have completed",
                    format!("The server could not be reached: {e}"),
                ));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Reconciliation helpers
    // ------------------------------------------------------------------------

    /// Apply `patch` to the article in every cached collection containing
    /// it, writing back only the collections that actually held it.
    fn splice_article(&self, article_id: &str, patch: impl Fn(&mut Article)) {
        for key in CacheKey::ARTICLE_COLLECTIONS {
            let Some(CacheValue::Articles(mut articles)) = self.cache.peek(key) else {
                continue;
            };
            let mut touched = false;
            for article in articles.iter_mut() {
                if article.id == article_id {
                    patch(article);
                    touched = true;
                }
            }
            if touched {
                self.cache.write(key, CacheValue::Articles(articles));
            }
        }
    }

    fn cached_article_is_rated(&self, article_id: &str) -> bool {
        CacheKey::ARTICLE_COLLECTIONS.into_iter().any(|key| {
            match self.cache.peek(key) {
                Some(CacheValue::Articles(articles)) => articles
                    .iter()
                    .any(|a| a.id == article_id && a.user_has_rated),
                _ => false,
            }
        })
    }

    /// Publish a failure notice and wrap the error for the caller.
    fn fail(&self, title: &str, error: GatewayError) -> NewsverseError {
        tracing::debug!(error = %error, class = error.class(), "mutation failed");
        self.notices.publish(Notice::failure(title, &error));
        NewsverseError::from(error)
    }
}

// ============================================================================
// Tests
// ============================================================================
