//! Camera port - abstracts the platform media boundary
//!
//! 摄像头端口：抽象平台媒体接口（设备枚举、打开流、权限注册表）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::camera::{CameraError, FacingMode, PermissionState, VideoConstraints};
use crate::decode::FrameBuffer;
use crate::ids::StreamId;

/// A live camera stream.
///
/// Owned by the negotiator; the frame scanner only borrows an `Arc` of it.
///
/// # Behavior / 行为
/// - `stop()` stops every track and must be idempotent.
/// - `stop()` 停止所有轨道，必须幂等。
#[async_trait]
pub trait CameraStream: Send + Sync {
    fn id(&self) -> &StreamId;

    fn facing_mode(&self) -> FacingMode;

    /// Intrinsic frame dimensions, `None` until metadata is loaded.
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// Resolve once the stream reports its intrinsic dimensions.
    async fn wait_until_ready(&self) -> Result<(u32, u32), CameraError>;

    /// Copy the current frame.
    fn snapshot(&self) -> anyhow::Result<FrameBuffer>;

    /// Stop all tracks.
    fn stop(&self) -> anyhow::Result<()>;

    fn is_active(&self) -> bool;
}

#[async_trait]
pub trait CameraPort: Send + Sync {
    /// Whether any video input device is enumerated.
    async fn has_video_input(&self) -> anyhow::Result<bool>;

    /// Request a stream for one constraint set.
    ///
    /// Implementations map platform failures to [`CameraError`].
    async fn open_stream(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Arc<dyn CameraStream>, CameraError>;
}

/// Platform permission registry (`navigator.permissions` equivalent).
#[async_trait]
pub trait PermissionRegistryPort: Send + Sync {
    /// Current camera permission state.
    async fn query(&self) -> anyhow::Result<PermissionState>;

    /// Change notifications. The channel closes when the registry goes away.
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<PermissionState>>;
}
