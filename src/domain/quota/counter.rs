use serde::{Deserialize, Serialize};

/// Snapshot of a quota pool as shown to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
    pub exhausted: bool,
}

impl QuotaState {
    pub fn phase(&self) -> UsagePhase {
        if self.exhausted {
            UsagePhase::Exhausted
        } else if self.used == 0 {
            UsagePhase::Fresh
        } else {
            UsagePhase::Available
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsagePhase {
    Fresh,
    Available,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allowed,
    Denied,
}

/// Count of successful consumptions for one quota pool.
///
/// Invariant: `count <= limit`. The count only grows, one step per
/// recorded success, and stops at the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageCounter {
    feature_key: String,
    count: u32,
    limit: u32,
}

impl UsageCounter {
    /// Panics if `limit` is zero
    pub fn new(feature_key: impl Into<String>, limit: u32) -> Self {
        assert!(limit > 0, "usage limit must be positive");
        Self {
            feature_key: feature_key.into(),
            count: 0,
            limit,
        }
    }

    /// Restore a counter from a raw persisted value.
    ///
    /// Missing, non-numeric or negative values read as zero. Values above the
    /// limit are clamped. Returns the counter and whether the raw value was
    /// present but unreadable.
    pub fn from_persisted(
        feature_key: impl Into<String>,
        limit: u32,
        raw: Option<&str>,
    ) -> (Self, bool) {
        let mut counter = Self::new(feature_key, limit);
        let Some(raw) = raw else {
            return (counter, false);
        };

        match parse_count(raw) {
            Some(count) => {
                counter.count = count.min(limit);
                (counter, false)
            }
            None => (counter, true),
        }
    }

    pub fn feature_key(&self) -> &str {
        &self.feature_key
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn state(&self) -> QuotaState {
        QuotaState {
            used: self.count,
            limit: self.limit,
            remaining: self.limit - self.count,
            exhausted: self.count >= self.limit,
        }
    }

    pub fn attempt(&self) -> Decision {
        if self.state().exhausted {
            Decision::Denied
        } else {
            Decision::Allowed
        }
    }

    /// Charge one successful consumption. No-op once exhausted.
    pub fn record_success(&mut self) -> QuotaState {
        if self.count < self.limit {
            self.count += 1;
        }
        self.state()
    }

    /// Value written to the store
    pub fn persisted_value(&self) -> String {
        self.count.to_string()
    }
}

/// Leading-integer parse: surrounding whitespace is ignored and trailing
/// garbage after the digits is dropped ("2px" reads as 2). Anything without
/// leading digits is unreadable.
fn parse_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let digits: &str = {
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };

    if digits.is_empty() {
        return None;
    }

    // Saturate absurdly large values; they get clamped to the limit anyway
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}
