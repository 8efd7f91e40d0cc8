//! Session store port
//!
//! Session-scoped key/value storage shared with the consuming screens.
//! Values are JSON; there is no schema beyond "valid JSON".

use async_trait::async_trait;
use serde_json::Value;

use crate::session::SessionKey;

#[async_trait]
pub trait SessionStorePort: Send + Sync {
    async fn get(&self, key: SessionKey) -> anyhow::Result<Option<Value>>;

    async fn set(&self, key: SessionKey, value: &Value) -> anyhow::Result<()>;

    async fn remove(&self, key: SessionKey) -> anyhow::Result<()>;

    /// Read-then-clear, so a consumed payload is never replayed.
    ///
    /// 读取后清除，避免重复消费。
    async fn take(&self, key: SessionKey) -> anyhow::Result<Option<Value>> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.remove(key).await?;
        }
        Ok(value)
    }
}
