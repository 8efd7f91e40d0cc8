//! # sw-platform
//!
//! Platform-specific implementations for the SSI wallet scanner.
//!
//! This crate contains the pieces that interact with the host environment:
//! runtime capability detection, application directories, and the camera
//! and permission registry adapters.

pub mod app_dirs;
pub mod camera;
pub mod capability;

pub use app_dirs::DirsAppDirsAdapter;
pub use camera::{StaticPermissionRegistry, StillFrameCamera};
pub use capability::{detect_browser, detect_runtime_context, RuntimeProbe};
