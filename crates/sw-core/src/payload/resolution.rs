//! Payload resolution policy.
//!
//! 远端内容可达时以其为准；不可达时才以 URL 推断类型为准。

use serde_json::Value;
use tracing::{info, warn};

use super::error::{ClassificationError, FetchError};
use super::model::{ClassifiedPayload, PayloadType};

/// Combine the URL-inferred type with the fetch outcome.
///
/// - fetched: the body's own `type` if present, else `inferred`, else `Unknown`
/// - fetch failed with an inferred type: `{type: inferred}`
/// - fetch failed without one: `NoTypeResolved`
pub fn resolve_payload(
    inferred: Option<PayloadType>,
    fetched: Result<Value, FetchError>,
) -> Result<ClassifiedPayload, ClassificationError> {
    match fetched {
        Ok(body) => {
            let payload_type = PayloadType::from_wire(body.get("type"))
                .or(inferred)
                .unwrap_or(PayloadType::Unknown);
            Ok(ClassifiedPayload::new(payload_type, body))
        }
        Err(err) => match inferred {
            Some(payload_type) => {
                info!(
                    error = %err,
                    payload_type = %payload_type,
                    "payload fetch failed; falling back to URL-inferred type"
                );
                Ok(ClassifiedPayload::stub(payload_type))
            }
            None => {
                warn!(error = %err, "payload fetch failed and URL carries no type");
                Err(ClassificationError::NoTypeResolved)
            }
        },
    }
}
