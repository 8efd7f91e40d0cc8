//! Camera permission negotiation domain.
//!
//! This module defines the acquisition state, strategy descriptors,
//! the pure permission state machine and the recovery guidance.

pub mod constraints;
pub mod error;
pub mod guidance;
pub mod state;
pub mod state_machine;
pub mod strategy;

pub use constraints::{FacingConstraint, VideoConstraints};
pub use error::{AcquisitionError, CameraError};
pub use guidance::{RecoveryAction, RecoveryGuidance};
pub use state::{CameraAcquisitionState, FacingMode, PermissionState};
pub use state_machine::{
    CameraPermissionMachine, NegotiationAction, NegotiationEvent, NegotiationPhase, PlanKind,
};
pub use strategy::{AcquisitionStrategy, StrategyPlan, StrategyRole};
