//! HTTP payload fetcher
//!
//! Resolves the JSON body behind a scanned URL with a plain `GET`.
//!
//! 通过 `GET` 请求获取二维码 URL 指向的 JSON 负载。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use sw_core::payload::FetchError;
use sw_core::ports::PayloadFetchPort;
use tracing::{debug, warn};

pub struct HttpPayloadFetcher {
    client: Client,
}

impl HttpPayloadFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self { client })
    }

    /// Wrap a pre-configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PayloadFetchPort for HttpPayloadFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url = %url, "Fetching payload");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Payload request failed");
                if e.is_timeout() {
                    FetchError::Network(format!("request timed out: {}", e))
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Payload server returned error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchError::InvalidBody(e.to_string()))
    }
}
