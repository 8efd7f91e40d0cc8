use serde::{Deserialize, Serialize};
use serde_json::Value;
use sw_app::payload::DispatchOutcome;
use sw_app::ScreenSnapshot;
use sw_core::navigation::Route;
use sw_core::payload::{DecodedPayload, PayloadSource, PayloadType};
use sw_core::session::SessionKey;

/// Decoded QR text for the CLI.
///
/// This DTO separates the CLI output from internal domain models,
/// allowing domain evolution without breaking scripts that parse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPayloadDto {
    pub raw_url: String,
    pub source: PayloadSource,
}

impl From<DecodedPayload> for DecodedPayloadDto {
    fn from(payload: DecodedPayload) -> Self {
        Self {
            raw_url: payload.raw_url,
            source: payload.source,
        }
    }
}

/// Where a classified payload went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchDto {
    pub payload_type: Option<PayloadType>,
    pub route: Route,
    pub path: String,
    pub stored_under: Option<SessionKey>,
}

impl From<DispatchOutcome> for DispatchDto {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            payload_type: outcome.payload_type,
            route: outcome.route,
            path: outcome.route.path().to_string(),
            stored_under: outcome.stored_under,
        }
    }
}

/// Result of one scanner screen run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReportDto {
    /// Screen state right after mount.
    pub mounted: ScreenSnapshot,
    pub outcome: Option<DispatchDto>,
    /// No symbol was detected before the deadline.
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPayloadDto {
    pub key: Option<SessionKey>,
    pub value: Option<Value>,
}
