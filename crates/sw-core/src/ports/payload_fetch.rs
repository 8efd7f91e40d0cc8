use async_trait::async_trait;
use serde_json::Value;

use crate::payload::FetchError;

/// Remote payload fetch (`GET <url>`, JSON body).
#[async_trait]
pub trait PayloadFetchPort: Send + Sync {
    /// Non-success status, network failure, timeout or a non-JSON body are
    /// all reported as [`FetchError`].
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}
