//! Ordered camera acquisition strategies.
//!
//! Each strategy is a descriptor (constraint set plus a failure reason);
//! the negotiator walks a plan front to back and stops at the first stream
//! opened by a [`StrategyRole::Final`] strategy. A [`StrategyRole::Primer`]
//! only triggers the permission prompt: its stream is stopped straight away
//! and the walk resumes at the next final strategy.

use serde::{Deserialize, Serialize};

use super::constraints::VideoConstraints;
use super::state::FacingMode;
use crate::runtime::RuntimeContext;

/// What a successful request is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyRole {
    /// Permission primer; the stream is discarded.
    Primer,
    /// The stream is handed to the scanner.
    Final,
}

/// One way of asking the platform for a camera stream.
///
/// 单个摄像头获取策略：约束集合 + 失败原因描述。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionStrategy {
    pub label: String,
    pub role: StrategyRole,
    pub constraints: VideoConstraints,
    pub failure_reason: String,
}

impl AcquisitionStrategy {
    pub fn new(
        label: impl Into<String>,
        constraints: VideoConstraints,
        failure_reason: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            role: StrategyRole::Final,
            constraints,
            failure_reason: failure_reason.into(),
        }
    }

    /// Same as [`AcquisitionStrategy::new`] but only primes the permission.
    pub fn primer(
        label: impl Into<String>,
        constraints: VideoConstraints,
        failure_reason: impl Into<String>,
    ) -> Self {
        Self {
            role: StrategyRole::Primer,
            ..Self::new(label, constraints, failure_reason)
        }
    }

    pub fn is_primer(&self) -> bool {
        self.role == StrategyRole::Primer
    }
}

/// An ordered list of strategies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StrategyPlan {
    strategies: Vec<AcquisitionStrategy>,
}

impl StrategyPlan {
    pub fn new(strategies: Vec<AcquisitionStrategy>) -> Self {
        Self { strategies }
    }

    /// Plan used on mount, manual retry and facing-mode toggle.
    ///
    /// Installed-app contexts get three extra narrowed constraint sets,
    /// since standalone windows tend to cache permission decisions badly.
    pub fn standard(facing: FacingMode, ideal: (u32, u32), ctx: &RuntimeContext) -> Self {
        let (width, height) = ideal;
        let mut strategies = vec![
            AcquisitionStrategy::primer(
                "direct-minimal",
                VideoConstraints::minimal(),
                "minimal video request was rejected",
            ),
            AcquisitionStrategy::new(
                "preferred",
                VideoConstraints::preferred(facing, width, height),
                "preferred resolution and facing mode were rejected",
            ),
        ];

        if ctx.is_installed_app {
            strategies.extend([
                AcquisitionStrategy::new(
                    "installed-exact-environment",
                    VideoConstraints::exact(FacingMode::Environment, width, height),
                    "exact back camera is unavailable",
                ),
                AcquisitionStrategy::new(
                    "installed-bare-video",
                    VideoConstraints::bare(),
                    "bare video request was rejected",
                ),
                AcquisitionStrategy::new(
                    "installed-user-facing",
                    VideoConstraints::facing(FacingMode::User),
                    "front camera is unavailable",
                ),
            ]);
        }

        Self { strategies }
    }

    /// Plan used by the "force camera access" recovery action.
    pub fn force_reset(facing: FacingMode, ideal: (u32, u32), ctx: &RuntimeContext) -> Self {
        let mut strategies = vec![
            AcquisitionStrategy::primer(
                "force-minimal",
                VideoConstraints::bare(),
                "minimal video request was rejected",
            ),
            AcquisitionStrategy::primer(
                "force-minimal-no-audio",
                VideoConstraints::minimal(),
                "video request without audio was rejected",
            ),
            AcquisitionStrategy::primer(
                "force-front-camera",
                VideoConstraints::facing(FacingMode::User),
                "front camera is unavailable",
            ),
        ];
        strategies.extend(Self::standard(facing, ideal, ctx).strategies);
        Self { strategies }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AcquisitionStrategy> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.label.as_str()).collect()
    }
}
