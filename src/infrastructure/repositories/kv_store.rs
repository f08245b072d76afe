use crate::error::AppResult;
use async_trait::async_trait;

/// Durable key-value mapping from string keys to string values.
///
/// Keys are plain strings chosen by the caller; there is no namespacing,
/// no transactions and no expiry. Values survive process restarts for the
/// persistent implementations.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Check that the backing storage is reachable
    async fn ping(&self) -> AppResult<()>;

    /// Short name of the backend, used by readiness checks
    fn backend(&self) -> &'static str;
}
