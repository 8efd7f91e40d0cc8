use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised at the platform camera boundary.
///
/// 平台摄像头接口错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// The user or the platform refused access (`NotAllowedError`).
    #[error("camera access not allowed")]
    NotAllowed,

    /// No video input device is present (`NotFoundError`).
    #[error("no camera found")]
    NotFound,

    #[error("camera request timed out")]
    Timeout,

    #[error("camera platform error: {0}")]
    Platform(String),
}

/// Why an acquisition sequence ended in `Denied`.
///
/// Every variant is non-fatal; they differ only in the guidance shown.
///
/// 获取失败原因，均可恢复，仅影响提示文案。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera found on this device")]
    NoCameraFound,

    #[error("camera request timed out")]
    AcquisitionTimeout,

    #[error("all camera acquisition strategies failed")]
    AllStrategiesExhausted,
}

impl From<CameraError> for AcquisitionError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::NotAllowed => AcquisitionError::PermissionDenied,
            CameraError::NotFound => AcquisitionError::NoCameraFound,
            CameraError::Timeout => AcquisitionError::AcquisitionTimeout,
            CameraError::Platform(_) => AcquisitionError::AllStrategiesExhausted,
        }
    }
}

impl AcquisitionError {
    /// Collapse the per-strategy failures of one sequence into one reason.
    ///
    /// A uniform failure keeps its kind (all denials stay a denial); a mixed
    /// or empty list is reported as exhausted.
    pub fn summarize(failures: &[AcquisitionError]) -> AcquisitionError {
        match failures.split_first() {
            Some((first, rest)) if rest.iter().all(|f| f == first) => first.clone(),
            _ => AcquisitionError::AllStrategiesExhausted,
        }
    }
}
