//! # sw-core
//!
//! Core domain models and business logic for the SSI wallet scanner.
//!
//! This crate contains pure scanning logic without any infrastructure dependencies.

// Public module exports
pub mod app_dirs;
pub mod camera;
pub mod config;
pub mod decode;
pub mod ids;
pub mod navigation;
pub mod payload;
pub mod ports;
pub mod preference;
pub mod runtime;
pub mod session;

// Re-export commonly used types at the crate root
pub use camera::{
    AcquisitionError, CameraAcquisitionState, FacingMode, NegotiationPhase, PermissionState,
    RecoveryGuidance,
};
pub use config::ScannerConfig;
pub use decode::{DecodeError, FrameBuffer, PixelFormat};
pub use ids::{ScanCycleId, StreamId};
pub use navigation::Route;
pub use payload::{ClassifiedPayload, DecodedPayload, PayloadSource, PayloadType};
pub use preference::{AcquisitionMode, AcquisitionPreference};
pub use runtime::{BrowserInfo, BrowserKind, RuntimeContext};
pub use session::SessionKey;
