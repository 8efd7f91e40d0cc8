use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of payload types used for routing.
///
/// 载荷类型（封闭集合），未知类型显式路由为 `Unknown`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadType {
    CredentialOffer,
    PresentationRequest,
    Unknown,
}

impl PayloadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadType::CredentialOffer => "credential_offer",
            PayloadType::PresentationRequest => "presentation_request",
            PayloadType::Unknown => "unknown",
        }
    }

    /// Read the `type` field of a remote body.
    ///
    /// `None` when the field is absent or falsy (`null`, `false`, `0`, `""`),
    /// so the caller falls back to the URL-inferred type. Any other value
    /// that is not one of the two known strings maps to `Unknown`.
    pub fn from_wire(value: Option<&Value>) -> Option<PayloadType> {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(match s.as_str() {
                "credential_offer" => PayloadType::CredentialOffer,
                "presentation_request" => PayloadType::PresentationRequest,
                _ => PayloadType::Unknown,
            }),
            Some(_) => Some(PayloadType::Unknown),
        }
    }
}

impl std::fmt::Display for PayloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a decoded string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSource {
    Camera,
    Upload,
    Manual,
}

/// Raw string extracted from a QR symbol or typed by the user.
///
/// Consumed once by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPayload {
    pub raw_url: String,
    pub source: PayloadSource,
}

impl DecodedPayload {
    pub fn new(raw_url: impl Into<String>, source: PayloadSource) -> Self {
        Self {
            raw_url: raw_url.into(),
            source,
        }
    }
}

/// Resolved payload driving navigation.
///
/// `body` is the full remote JSON when it was reachable, otherwise the
/// synthesized `{"type": <inferred>}` stub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPayload {
    pub payload_type: PayloadType,
    pub body: Value,
}

impl ClassifiedPayload {
    pub fn new(payload_type: PayloadType, body: Value) -> Self {
        Self { payload_type, body }
    }

    /// Minimal payload built from the URL-inferred type.
    pub fn stub(payload_type: PayloadType) -> Self {
        Self {
            payload_type,
            body: serde_json::json!({ "type": payload_type.as_str() }),
        }
    }
}
