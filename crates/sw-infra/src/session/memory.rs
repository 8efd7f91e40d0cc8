use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use sw_core::ports::SessionStorePort;
use sw_core::SessionKey;
use tokio::sync::RwLock;

/// Process-lifetime session store.
///
/// 进程内会话存储，进程退出即清空。
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<SessionKey, Value>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorePort for InMemorySessionStore {
    async fn get(&self, key: SessionKey) -> anyhow::Result<Option<Value>> {
        Ok(self.entries.read().await.get(&key).cloned())
    }

    async fn set(&self, key: SessionKey, value: &Value) -> anyhow::Result<()> {
        self.entries.write().await.insert(key, value.clone());
        Ok(())
    }

    async fn remove(&self, key: SessionKey) -> anyhow::Result<()> {
        self.entries.write().await.remove(&key);
        Ok(())
    }
}
