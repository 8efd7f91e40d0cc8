use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use sw_core::payload::{
    infer_type_from_url, resolve_payload, ClassificationError, ClassifiedPayload, DecodedPayload,
};
use sw_core::ports::PayloadFetchPort;

/// Use case: turn a decoded string into a typed payload.
///
/// The remote body is authoritative when reachable; the URL-inferred type
/// is used only when the fetch fails.
pub struct ClassifyPayload {
    fetcher: Arc<dyn PayloadFetchPort>,
}

impl ClassifyPayload {
    pub fn new(fetcher: Arc<dyn PayloadFetchPort>) -> Self {
        Self { fetcher }
    }

    pub fn from_ports(fetcher: Arc<dyn PayloadFetchPort>) -> Self {
        Self::new(fetcher)
    }

    pub async fn execute(
        &self,
        payload: &DecodedPayload,
    ) -> Result<ClassifiedPayload, ClassificationError> {
        let span = info_span!(
            "usecase.classify_payload.execute",
            raw_url = %payload.raw_url,
            source = ?payload.source
        );
        async {
            let inferred = infer_type_from_url(&payload.raw_url);
            if let Some(t) = inferred {
                info!(inferred_type = %t, "URL format indicates payload type");
            }

            // Fetch regardless of the URL hint.
            let fetched = self.fetcher.fetch(&payload.raw_url).await;
            let classified = resolve_payload(inferred, fetched)?;
            info!(payload_type = %classified.payload_type, "payload classified");
            Ok(classified)
        }
        .instrument(span)
        .await
    }
}
