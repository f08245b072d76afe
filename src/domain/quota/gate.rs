use super::counter::{Decision, QuotaState, UsageCounter};
use crate::error::AppResult;
use crate::infrastructure::repositories::KeyValueStore;
use std::sync::Arc;
use uuid::Uuid;

/// Gate in front of one rate-limited capability.
///
/// One gate is built per feature with an explicit key and limit, and the
/// counter of each client profile lives in the durable store under
/// `"<profile>:<feature_key>"`. The gate decides and records; it never calls
/// the capability itself. It provides no mutual exclusion: callers must not
/// run two attempts for the same profile concurrently.
pub struct UsageGate {
    feature_key: String,
    limit: u32,
    store: Arc<dyn KeyValueStore>,
}

impl UsageGate {
    /// Panics if `limit` is zero
    pub fn new(feature_key: impl Into<String>, limit: u32, store: Arc<dyn KeyValueStore>) -> Self {
        assert!(limit > 0, "usage limit must be positive");
        Self {
            feature_key: feature_key.into(),
            limit,
            store,
        }
    }

    pub fn feature_key(&self) -> &str {
        &self.feature_key
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn storage_key(&self, profile_id: Uuid) -> String {
        format!("{}:{}", profile_id, self.feature_key)
    }

    /// Load the counter for a profile. Never fails: unreadable or missing
    /// values, and store read errors, all count as a fresh pool.
    async fn load(&self, profile_id: Uuid) -> UsageCounter {
        let key = self.storage_key(profile_id);
        let raw = match self.store.get(&key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = %key,
                    "Failed to read usage counter, treating as fresh"
                );
                None
            }
        };

        let (counter, malformed) =
            UsageCounter::from_persisted(self.feature_key.clone(), self.limit, raw.as_deref());
        if malformed {
            tracing::warn!(
                key = %key,
                raw_value = ?raw,
                "Malformed persisted usage value, defaulting to zero"
            );
        }
        counter
    }

    pub async fn initialize(&self, profile_id: Uuid) -> QuotaState {
        self.load(profile_id).await.state()
    }

    /// `Denied` when the pool is exhausted. Has no side effect either way.
    pub async fn attempt(&self, profile_id: Uuid) -> Decision {
        let counter = self.load(profile_id).await;
        let decision = counter.attempt();

        tracing::debug!(
            profile_id = %profile_id,
            feature = %self.feature_key,
            used = counter.count(),
            limit = self.limit,
            decision = ?decision,
            "Usage gate attempt"
        );

        decision
    }

    /// Charge one confirmed success and persist it.
    ///
    /// Called only after the capability returned a usable payload. When the
    /// pool is already exhausted nothing is written and the exhausted state
    /// is returned unchanged.
    pub async fn record_success(&self, profile_id: Uuid) -> AppResult<QuotaState> {
        let mut counter = self.load(profile_id).await;
        let before = counter.state();
        let after = counter.record_success();

        if after == before {
            tracing::warn!(
                profile_id = %profile_id,
                feature = %self.feature_key,
                "record_success on exhausted pool ignored"
            );
            return Ok(after);
        }

        self.store
            .set(&self.storage_key(profile_id), &counter.persisted_value())
            .await?;

        tracing::info!(
            profile_id = %profile_id,
            feature = %self.feature_key,
            used = after.used,
            remaining = after.remaining,
            "Usage recorded"
        );

        Ok(after)
    }
}
