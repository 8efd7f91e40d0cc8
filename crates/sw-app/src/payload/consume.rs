use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info_span, Instrument};

use sw_core::payload::PayloadType;
use sw_core::ports::SessionStorePort;
use sw_core::session::SessionKey;

/// Use case for the consuming screens: read a stored payload and clear it.
pub struct TakeStoredPayload {
    session: Arc<dyn SessionStorePort>,
}

impl TakeStoredPayload {
    pub fn new(session: Arc<dyn SessionStorePort>) -> Self {
        Self { session }
    }

    pub fn from_ports(session: Arc<dyn SessionStorePort>) -> Self {
        Self::new(session)
    }

    /// `Ok(None)` when nothing is stored, or for `Unknown`.
    pub async fn execute(&self, payload_type: PayloadType) -> anyhow::Result<Option<Value>> {
        let Some(key) = SessionKey::for_payload(payload_type) else {
            return Ok(None);
        };
        let span = info_span!("usecase.take_stored_payload.execute", key = %key);
        async {
            let value = self.session.take(key).await?;
            debug!(found = value.is_some(), "stored payload taken");
            Ok(value)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySession(Mutex<HashMap<SessionKey, Value>>);

    #[async_trait]
    impl SessionStorePort for MemorySession {
        async fn get(&self, key: SessionKey) -> anyhow::Result<Option<Value>> {
            Ok(self.0.lock().unwrap().get(&key).cloned())
        }
        async fn set(&self, key: SessionKey, value: &Value) -> anyhow::Result<()> {
            self.0.lock().unwrap().insert(key, value.clone());
            Ok(())
        }
        async fn remove(&self, key: SessionKey) -> anyhow::Result<()> {
            self.0.lock().unwrap().remove(&key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn take_reads_then_clears() {
        let session = Arc::new(MemorySession::default());
        session
            .set(SessionKey::CredentialOffer, &json!({ "type": "credential_offer" }))
            .await
            .unwrap();
        let uc = TakeStoredPayload::new(session);

        let first = uc.execute(PayloadType::CredentialOffer).await.unwrap();
        let second = uc.execute(PayloadType::CredentialOffer).await.unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn unknown_type_has_nothing_to_take() {
        let uc = TakeStoredPayload::new(Arc::new(MemorySession::default()));
        assert!(uc.execute(PayloadType::Unknown).await.unwrap().is_none());
    }
}
