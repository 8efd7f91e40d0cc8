//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::prefixed_id;

/// Identifier of one opened camera stream.
///
/// 摄像头流标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId(String);

/// Identifier of one acquisition cycle (mount, retry, toggle or force reset).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanCycleId(String);

prefixed_id!(StreamId => "stream", ScanCycleId => "scan");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_ids_are_unique() {
        assert_ne!(StreamId::new(), StreamId::new());
    }

    #[test]
    fn generated_ids_carry_their_kind() {
        assert!(StreamId::new().as_str().starts_with("stream-"));
        assert!(ScanCycleId::new().to_string().starts_with("scan-"));
    }

    #[test]
    fn stream_id_from_str_round_trips_display() {
        let id: StreamId = "cam-0".into();
        assert_eq!(id.as_str(), "cam-0");
        assert_eq!(id.to_string(), "cam-0");
    }
}
