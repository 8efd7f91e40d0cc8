//! Still-frame camera
//!
//! Replays a fixed list of frames as if they came from a live camera. Each
//! snapshot advances to the next frame and wraps around, so a poll loop
//! sees the sequence repeatedly until it stops.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sw_core::camera::{CameraError, FacingConstraint, FacingMode, PermissionState, VideoConstraints};
use sw_core::ids::StreamId;
use sw_core::ports::{CameraPort, CameraStream, ImageRasterizerPort};
use sw_core::FrameBuffer;
use tracing::{debug, info, warn};

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

pub struct StillFrameCamera {
    frames: Arc<Vec<FrameBuffer>>,
    facing_modes: Vec<FacingMode>,
    permission: PermissionState,
    opened: AtomicUsize,
}

impl StillFrameCamera {
    pub fn new(frames: Vec<FrameBuffer>) -> Self {
        Self {
            frames: Arc::new(frames),
            facing_modes: vec![FacingMode::Environment, FacingMode::User],
            permission: PermissionState::Granted,
            opened: AtomicUsize::new(0),
        }
    }

    /// Load every image file in `dir`, sorted by file name.
    ///
    /// Files that fail to rasterize are skipped with a warning.
    pub async fn from_dir(dir: &Path, rasterizer: &dyn ImageRasterizerPort) -> anyhow::Result<Self> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("read frame directory {}", dir.display()))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_frame = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_frame {
                paths.push(path);
            }
        }
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("read frame {}", path.display()))?;
            match rasterizer.rasterize(&bytes) {
                Ok(frame) => frames.push(frame),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable frame"),
            }
        }

        info!(dir = %dir.display(), frames = frames.len(), "Loaded still frames");
        Ok(Self::new(frames))
    }

    /// Simulate a platform permission decision.
    pub fn with_permission(mut self, permission: PermissionState) -> Self {
        self.permission = permission;
        self
    }

    /// Restrict which cameras exist on this fake device.
    pub fn with_facing_modes(mut self, facing_modes: Vec<FacingMode>) -> Self {
        self.facing_modes = facing_modes;
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Streams handed out so far.
    pub fn opened_streams(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    fn resolve_facing(&self, facing: Option<FacingConstraint>) -> Result<FacingMode, CameraError> {
        let fallback = self
            .facing_modes
            .first()
            .copied()
            .ok_or(CameraError::NotFound)?;

        match facing {
            None => Ok(fallback),
            Some(FacingConstraint::Ideal(mode)) if self.facing_modes.contains(&mode) => Ok(mode),
            Some(FacingConstraint::Ideal(_)) => Ok(fallback),
            Some(FacingConstraint::Exact(mode)) if self.facing_modes.contains(&mode) => Ok(mode),
            Some(FacingConstraint::Exact(mode)) => Err(CameraError::Platform(format!(
                "overconstrained: no {} camera",
                mode.as_str()
            ))),
        }
    }
}

#[async_trait]
impl CameraPort for StillFrameCamera {
    async fn has_video_input(&self) -> anyhow::Result<bool> {
        Ok(!self.frames.is_empty() && !self.facing_modes.is_empty())
    }

    async fn open_stream(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Arc<dyn CameraStream>, CameraError> {
        if self.permission == PermissionState::Denied {
            return Err(CameraError::NotAllowed);
        }
        if self.frames.is_empty() {
            return Err(CameraError::NotFound);
        }

        let facing_mode = self.resolve_facing(constraints.facing)?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        let stream = StillFrameStream::new(self.frames.clone(), facing_mode);
        debug!(stream_id = %stream.id, facing = facing_mode.as_str(), "Opened still-frame stream");
        Ok(Arc::new(stream))
    }
}

pub struct StillFrameStream {
    id: StreamId,
    facing_mode: FacingMode,
    frames: Arc<Vec<FrameBuffer>>,
    cursor: AtomicUsize,
    active: AtomicBool,
}

impl StillFrameStream {
    fn new(frames: Arc<Vec<FrameBuffer>>, facing_mode: FacingMode) -> Self {
        Self {
            id: StreamId::new(),
            facing_mode,
            frames,
            cursor: AtomicUsize::new(0),
            active: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl CameraStream for StillFrameStream {
    fn id(&self) -> &StreamId {
        &self.id
    }

    fn facing_mode(&self) -> FacingMode {
        self.facing_mode
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| (f.width, f.height))
    }

    async fn wait_until_ready(&self) -> Result<(u32, u32), CameraError> {
        self.dimensions()
            .ok_or_else(|| CameraError::Platform("stream has no frames".to_string()))
    }

    fn snapshot(&self) -> anyhow::Result<FrameBuffer> {
        if !self.is_active() {
            anyhow::bail!("stream {} is stopped", self.id);
        }
        if self.frames.is_empty() {
            anyhow::bail!("stream {} has no frames", self.id);
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.frames.len();
        Ok(self.frames[index].clone())
    }

    fn stop(&self) -> anyhow::Result<()> {
        if self.active.swap(false, Ordering::SeqCst) {
            debug!(stream_id = %self.id, "Still-frame stream stopped");
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
