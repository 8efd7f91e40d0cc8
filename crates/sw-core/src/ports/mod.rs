//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core scanning logic to remain independent of
//! the camera, network and storage backends.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port to `sw-core/ports`, ask yourself three questions:
//!
//! 1. **Does this port represent a business capability?**
//! 2. **Will it be depended upon by multiple use cases or domains?**
//! 3. **Is it implemented by the infrastructure or platform layer?**
//!
//! If all three answers are **yes**, place it in `sw-core/ports`.
//! Otherwise, place it in the relevant `domain` submodule.

pub mod app_dirs;
pub mod camera;
pub mod decoder;
pub mod errors;
pub mod navigation;
pub mod payload_fetch;
pub mod preference;
pub mod session_store;

pub use app_dirs::AppDirsPort;
pub use camera::{CameraPort, CameraStream, PermissionRegistryPort};
pub use decoder::{ImageRasterizerPort, QrDecoderPort};
pub use errors::AppDirsError;
pub use navigation::NavigationPort;
pub use payload_fetch::PayloadFetchPort;
pub use preference::AcquisitionPreferencePort;
pub use session_store::SessionStorePort;
