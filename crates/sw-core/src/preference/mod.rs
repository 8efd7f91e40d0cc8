//! Acquisition mode preference.
//!
//! A single sticky flag survives across sessions: once camera access kept
//! failing, the next mount starts in manual mode.

use serde::{Deserialize, Serialize};

/// 获取模式偏好（跨会话持久化）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionPreference {
    #[serde(default)]
    pub camera_access_issues: bool,
}

impl AcquisitionPreference {
    pub fn flagged() -> Self {
        Self {
            camera_access_issues: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMode {
    #[default]
    Camera,
    Manual,
    Upload,
}

impl AcquisitionMode {
    /// Mode for a fresh mount.
    ///
    /// `manual_override`: `Some(false)` forces camera mode even when the
    /// sticky flag is set, `Some(true)` forces manual mode, `None` follows
    /// the flag.
    pub fn initial(preference: &AcquisitionPreference, manual_override: Option<bool>) -> Self {
        match manual_override {
            Some(false) => AcquisitionMode::Camera,
            Some(true) => AcquisitionMode::Manual,
            None if preference.camera_access_issues => AcquisitionMode::Manual,
            None => AcquisitionMode::Camera,
        }
    }

    pub fn uses_camera(&self) -> bool {
        matches!(self, AcquisitionMode::Camera)
    }
}
