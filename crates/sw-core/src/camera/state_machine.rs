//! Camera permission state machine.
//!
//! Pure transition function for the permission negotiator; the driver in
//! the application layer executes the returned actions.

use serde::{Deserialize, Serialize};

use super::error::AcquisitionError;
use super::state::PermissionState;

/// Negotiation phase.
///
/// 权限协商阶段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum NegotiationPhase {
    /// Nothing attempted yet, or state was reset.
    ///
    /// 尚未尝试或已重置。
    #[default]
    Unknown,
    /// Waiting on the platform permission registry.
    ///
    /// 正在查询平台权限注册表。
    Checking,
    /// A stream request (strategy plan) is in flight.
    ///
    /// 正在请求摄像头流。
    Prompting,
    /// A live stream is owned by the negotiator.
    ///
    /// 已获得摄像头流。
    Granted,
    /// The last sequence failed; guidance depends on `reason`.
    ///
    /// 获取失败。
    Denied { reason: AcquisitionError },
}

impl NegotiationPhase {
    pub fn is_granted(&self) -> bool {
        matches!(self, NegotiationPhase::Granted)
    }

    pub fn denial_reason(&self) -> Option<&AcquisitionError> {
        match self {
            NegotiationPhase::Denied { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Which strategy plan an acquisition should walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Standard,
    ForceReset,
}

/// Events that drive the negotiation.
///
/// 驱动协商流程的事件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationEvent {
    /// Screen mounted in camera mode. Installed apps skip the registry check.
    ///
    /// 页面以摄像头模式挂载。
    Begin { skip_check: bool },
    /// Registry answered a query, or reported a change.
    ///
    /// 平台报告权限状态（查询结果或变更通知）。
    PermissionReported(PermissionState),
    /// A strategy produced a stream.
    AcquisitionSucceeded,
    /// Every strategy of the plan failed.
    AcquisitionFailed { reason: AcquisitionError },
    /// User pressed "try again".
    ///
    /// 用户手动重试。
    RetryRequested,
    /// User switched between front and back camera.
    ///
    /// 用户切换前后摄像头。
    FacingModeToggled,
    /// User pressed "force camera access".
    ///
    /// 用户强制重新获取摄像头。
    ForceReset,
    /// Camera mode was left (manual entry, upload, teardown).
    ///
    /// Leaving camera mode also clears the failure count.
    Released,
}

/// Side-effects produced by transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationAction {
    QueryPermission,
    AcquireStream { plan: PlanKind },
    /// Stop every track of the owned stream.
    ReleaseStream,
    ResetPermission,
    ResetFailures,
    RecordFailure { reason: AcquisitionError },
    RecordSuccess,
    ClearStickyFlag,
}

/// Pure camera permission state machine.
///
/// 纯状态机：不包含副作用。
pub struct CameraPermissionMachine;

impl CameraPermissionMachine {
    pub fn transition(
        phase: NegotiationPhase,
        event: NegotiationEvent,
    ) -> (NegotiationPhase, Vec<NegotiationAction>) {
        use NegotiationAction as A;
        use NegotiationEvent as E;
        use NegotiationPhase as P;

        match (phase, event) {
            // ===== Start =====
            (P::Unknown, E::Begin { skip_check: false }) => {
                (P::Checking, vec![A::QueryPermission])
            }
            (P::Unknown, E::Begin { skip_check: true }) => (
                P::Prompting,
                vec![A::AcquireStream {
                    plan: PlanKind::Standard,
                }],
            ),

            // ===== Registry answer =====
            (P::Checking, E::PermissionReported(PermissionState::Denied)) => (
                P::Denied {
                    reason: AcquisitionError::PermissionDenied,
                },
                Vec::new(),
            ),
            (P::Checking, E::PermissionReported(_)) => (
                P::Prompting,
                vec![A::AcquireStream {
                    plan: PlanKind::Standard,
                }],
            ),

            // ===== Attempt outcome =====
            (P::Prompting, E::AcquisitionSucceeded) => {
                (P::Granted, vec![A::RecordSuccess, A::ClearStickyFlag])
            }
            (P::Prompting, E::AcquisitionFailed { reason }) => (
                P::Denied {
                    reason: reason.clone(),
                },
                vec![A::RecordFailure { reason }],
            ),

            // ===== Recovery =====
            (P::Denied { .. }, E::RetryRequested) => (
                P::Prompting,
                vec![A::AcquireStream {
                    plan: PlanKind::Standard,
                }],
            ),
            (P::Denied { .. }, E::PermissionReported(PermissionState::Granted)) => (
                P::Prompting,
                vec![A::AcquireStream {
                    plan: PlanKind::Standard,
                }],
            ),

            // ===== Revocation while streaming =====
            (P::Granted, E::PermissionReported(PermissionState::Denied)) => (
                P::Denied {
                    reason: AcquisitionError::PermissionDenied,
                },
                vec![A::ReleaseStream],
            ),

            // ===== Facing mode =====
            (phase @ (P::Unknown | P::Checking | P::Prompting), E::FacingModeToggled) => {
                (phase, Vec::new())
            }
            (_, E::FacingModeToggled) => (
                P::Prompting,
                vec![
                    A::ReleaseStream,
                    A::ResetFailures,
                    A::AcquireStream {
                        plan: PlanKind::Standard,
                    },
                ],
            ),

            // ===== Force reset / release =====
            (_, E::ForceReset) => (
                P::Prompting,
                vec![
                    A::ReleaseStream,
                    A::ResetPermission,
                    A::AcquireStream {
                        plan: PlanKind::ForceReset,
                    },
                ],
            ),
            (_, E::Released) => (
                P::Unknown,
                vec![A::ReleaseStream, A::ResetPermission, A::ResetFailures],
            ),

            (phase, _event) => (phase, Vec::new()),
        }
    }
}
