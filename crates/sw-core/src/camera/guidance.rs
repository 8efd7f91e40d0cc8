//! User facing recovery guidance for a failed camera acquisition.
//!
//! Denial and "no camera" share control flow; they only differ here.

use serde::{Deserialize, Serialize};

use super::error::AcquisitionError;
use crate::runtime::RuntimeContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    Retry,
    ForceReset,
    SwitchToManualEntry,
    UploadImage,
    /// Android only.
    OpenAppSettings,
    /// Non-secure context only.
    UseSecureConnection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryGuidance {
    pub headline: String,
    pub detail: String,
    pub actions: Vec<RecoveryAction>,
    pub browser_hint: Option<String>,
    /// Set once the failure threshold is reached. A recommendation only.
    pub manual_mode_recommended: bool,
}

impl RecoveryGuidance {
    pub fn for_failure(
        reason: &AcquisitionError,
        ctx: &RuntimeContext,
        threshold_reached: bool,
    ) -> Self {
        let (headline, detail) = match reason {
            AcquisitionError::PermissionDenied => (
                "Camera Access Required",
                "Camera permission was denied. Allow camera access and try again.",
            ),
            AcquisitionError::NoCameraFound => (
                "No Camera Found",
                "No camera was detected on this device. Enter the URL manually or upload a QR image.",
            ),
            AcquisitionError::AcquisitionTimeout => (
                "Camera Not Responding",
                "The camera took too long to start. Try again or force camera access.",
            ),
            AcquisitionError::AllStrategiesExhausted => (
                "Camera Unavailable",
                "Every way of starting the camera failed. Try forcing camera access or use an alternative method.",
            ),
        };

        let mut actions = Vec::new();
        if !ctx.is_secure_context {
            actions.push(RecoveryAction::UseSecureConnection);
        }
        if threshold_reached || matches!(reason, AcquisitionError::NoCameraFound) {
            actions.push(RecoveryAction::SwitchToManualEntry);
            actions.push(RecoveryAction::UploadImage);
        }
        actions.push(RecoveryAction::Retry);
        actions.push(RecoveryAction::ForceReset);
        if ctx.is_android {
            actions.push(RecoveryAction::OpenAppSettings);
        }
        if !actions.contains(&RecoveryAction::SwitchToManualEntry) {
            actions.push(RecoveryAction::SwitchToManualEntry);
        }

        Self {
            headline: headline.to_string(),
            detail: detail.to_string(),
            actions,
            browser_hint: ctx.browser.kind.permission_hint().map(str::to_string),
            manual_mode_recommended: threshold_reached,
        }
    }

    pub fn offers(&self, action: RecoveryAction) -> bool {
        self.actions.contains(&action)
    }
}
