//! Camera adapters for hosts without a live media device.
//!
//! 无实时摄像头时的适配器：以静态图片帧模拟摄像头流。

mod permission_registry;
mod still_frame;

pub use permission_registry::StaticPermissionRegistry;
pub use still_frame::{StillFrameCamera, StillFrameStream};
