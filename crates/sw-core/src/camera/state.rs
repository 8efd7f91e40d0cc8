//! Camera acquisition state.

use serde::{Deserialize, Serialize};

/// Permission state as reported by the platform permission registry.
///
/// 平台权限注册表报告的权限状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
    #[default]
    Unknown,
}

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Prompt => "prompt",
            PermissionState::Unknown => "unknown",
        }
    }
}

/// Which physical camera a stream should select.
///
/// 摄像头朝向：后置（environment）或前置（user）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    #[default]
    Environment,
    User,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }
}

/// Current stage of camera setup for one mounted scanner screen.
///
/// Created on mount, mutated only by the negotiator, dropped on unmount.
///
/// 扫描页面的摄像头获取状态，挂载时创建，仅由协商器修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraAcquisitionState {
    pub permission_state: PermissionState,
    /// `None` until the first acquisition attempt settles.
    pub has_permission: Option<bool>,
    pub is_loading: bool,
    pub failed_attempt_count: u32,
    pub facing_mode: FacingMode,
}

impl Default for CameraAcquisitionState {
    fn default() -> Self {
        Self {
            permission_state: PermissionState::Unknown,
            has_permission: None,
            is_loading: true,
            failed_attempt_count: 0,
            facing_mode: FacingMode::Environment,
        }
    }
}

impl CameraAcquisitionState {
    pub fn with_facing_mode(facing_mode: FacingMode) -> Self {
        Self {
            facing_mode,
            ..Self::default()
        }
    }

    /// Count one failed acquisition sequence.
    ///
    /// Returns `true` when the count has reached `threshold`.
    pub fn record_failure(&mut self, threshold: u32) -> bool {
        self.failed_attempt_count = self.failed_attempt_count.saturating_add(1);
        self.has_permission = Some(false);
        self.permission_state = PermissionState::Denied;
        self.failed_attempt_count >= threshold
    }

    pub fn record_success(&mut self) {
        self.failed_attempt_count = 0;
        self.has_permission = Some(true);
        self.permission_state = PermissionState::Granted;
    }

    /// Clear permission facts back to `Unknown`, keeping the failure count.
    pub fn reset_permission(&mut self) {
        self.permission_state = PermissionState::Unknown;
        self.has_permission = None;
    }

    pub fn reset_failures(&mut self) {
        self.failed_attempt_count = 0;
    }

    pub fn threshold_reached(&self, threshold: u32) -> bool {
        self.failed_attempt_count >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_failure_increments_by_exactly_one() {
        let mut state = CameraAcquisitionState::default();
        for expected in 1..=5u32 {
            state.record_failure(3);
            assert_eq!(state.failed_attempt_count, expected);
        }
    }

    #[test]
    fn record_failure_reports_threshold() {
        let mut state = CameraAcquisitionState::default();
        assert!(!state.record_failure(3));
        assert!(!state.record_failure(3));
        assert!(state.record_failure(3));
        assert_eq!(state.permission_state, PermissionState::Denied);
        assert_eq!(state.has_permission, Some(false));
    }

    #[test]
    fn reset_permission_keeps_failure_count() {
        let mut state = CameraAcquisitionState::default();
        state.record_failure(3);
        state.reset_permission();
        assert_eq!(state.failed_attempt_count, 1);
        assert_eq!(state.permission_state, PermissionState::Unknown);
        assert_eq!(state.has_permission, None);
    }

    #[test]
    fn facing_mode_toggles() {
        assert_eq!(FacingMode::Environment.toggled(), FacingMode::User);
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
    }

    #[test]
    fn permission_state_serializes_lowercase() {
        let json = serde_json::to_string(&PermissionState::Prompt).unwrap();
        assert_eq!(json, "\"prompt\"");
    }
}
