//! File-backed session store
//!
//! Keeps the session map in a single JSON object so separate CLI
//! invocations can hand a payload from the scanner to its consumer.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sw_core::ports::SessionStorePort;
use sw_core::SessionKey;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub const DEFAULT_SESSION_FILE: &str = "session.json";

pub struct FileSessionStore {
    session_file_path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(session_file_path: PathBuf) -> Self {
        Self {
            session_file_path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_SESSION_FILE))
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.session_file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn load(&self) -> anyhow::Result<Map<String, Value>> {
        if !self.session_file_path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.session_file_path).await?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse session file: {}", e))?
        {
            Value::Object(map) => Ok(map),
            other => Err(anyhow::anyhow!(
                "Session file must hold a JSON object, found {}",
                other
            )),
        }
    }

    async fn save(&self, map: Map<String, Value>) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| anyhow::anyhow!("Failed to serialize session: {}", e))?;

        let mut file = fs::File::create(&self.session_file_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create session file: {}", e))?;

        file.write_all(json.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write session file: {}", e))?;

        file.sync_all()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sync session file: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl SessionStorePort for FileSessionStore {
    async fn get(&self, key: SessionKey) -> anyhow::Result<Option<Value>> {
        Ok(self.load().await?.remove(key.as_str()))
    }

    async fn set(&self, key: SessionKey, value: &Value) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        map.insert(key.as_str().to_string(), value.clone());
        self.save(map).await
    }

    async fn remove(&self, key: SessionKey) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        if map.remove(key.as_str()).is_some() {
            self.save(map).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_returns_none_when_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("missing.json"));

        assert_eq!(store.get(SessionKey::CredentialOffer).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_a_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");

        FileSessionStore::new(path.clone())
            .set(
                SessionKey::CredentialOffer,
                &json!({"type": "credential_offer", "credentials": ["a"]}),
            )
            .await
            .unwrap();

        let reopened = FileSessionStore::new(path);
        let value = reopened.get(SessionKey::CredentialOffer).await.unwrap();
        assert_eq!(
            value,
            Some(json!({"type": "credential_offer", "credentials": ["a"]}))
        );
    }

    #[tokio::test]
    async fn test_file_uses_wire_key_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::with_defaults(temp_dir.path().to_path_buf());
        store
            .set(SessionKey::PresentationRequest, &json!({"nonce": "n"}))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join(DEFAULT_SESSION_FILE)).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["presentation_request"]["nonce"], "n");
    }

    #[tokio::test]
    async fn test_take_removes_only_that_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::with_defaults(temp_dir.path().to_path_buf());
        store
            .set(SessionKey::CredentialOffer, &json!(1))
            .await
            .unwrap();
        store
            .set(SessionKey::PresentationRequest, &json!(2))
            .await
            .unwrap();

        assert_eq!(
            store.take(SessionKey::CredentialOffer).await.unwrap(),
            Some(json!(1))
        );
        assert_eq!(store.get(SessionKey::CredentialOffer).await.unwrap(), None);
        assert_eq!(
            store.get(SessionKey::PresentationRequest).await.unwrap(),
            Some(json!(2))
        );
    }

    #[tokio::test]
    async fn test_non_object_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "[1,2,3]").unwrap();

        let store = FileSessionStore::new(path);
        assert!(store.get(SessionKey::CredentialOffer).await.is_err());
    }
}
