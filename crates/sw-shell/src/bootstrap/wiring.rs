//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra implementations (http, decoder, session, preference) / 创建 infra 层具体实现
//! - ✅ Create platform implementations (camera, registry, app dirs) / 创建 platform 层具体实现
//! - ✅ Bundle them into `ScannerDeps` / 打包为 `ScannerDeps`
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! - Do not decide which acquisition mode to start in
//! - 不决定以何种获取模式启动
//!
//! ❌ **No configuration validation / 禁止做配置验证**
//!
//! ## Architecture Principle / 架构原则
//!
//! > **This is the only place allowed to depend on sw-infra + sw-platform + sw-app simultaneously.**
//! > **这是唯一允许同时依赖 sw-infra、sw-platform 和 sw-app 的地方。**

use std::path::PathBuf;
use std::sync::Arc;

use sw_app::payload::{ClassifyPayload, DispatchPayload, TakeStoredPayload};
use sw_app::scan::DecodeUploadedImage;
use sw_app::ScannerDeps;
use sw_core::app_dirs::AppDirs;
use sw_core::camera::{FacingMode, PermissionState};
use sw_core::config::ScannerConfig;
use sw_core::ports::{AppDirsPort, CameraPort, PermissionRegistryPort};
use sw_core::runtime::RuntimeContext;
use sw_infra::{
    FileAcquisitionPreferenceRepository, FileSessionStore, HttpPayloadFetcher,
    ImageCrateRasterizer, RqrrQrDecoder,
};
use sw_platform::{
    detect_runtime_context, DirsAppDirsAdapter, RuntimeProbe, StaticPermissionRegistry,
    StillFrameCamera,
};
use tracing::info;

use crate::adapters::RecordingNavigator;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("App directory resolution failed: {0}")]
    AppDirs(String),

    #[error("HTTP client initialization failed: {0}")]
    HttpClient(String),

    #[error("Camera initialization failed: {0}")]
    Camera(String),
}

/// Where camera frames come from.
#[derive(Debug, Clone)]
pub enum CameraSource {
    /// No video input on this host.
    Unavailable,
    /// Replay image files from a directory.
    StillFrames {
        dir: PathBuf,
        permission: PermissionState,
        facing_modes: Vec<FacingMode>,
    },
}

/// Wired adapters shared by every command.
///
/// 所有命令共享的已装配适配器。
pub struct ShellRuntime {
    pub config: ScannerConfig,
    pub app_dirs: AppDirs,
    pub runtime_context: RuntimeContext,
    pub session_store: Arc<FileSessionStore>,
    pub preference: Arc<FileAcquisitionPreferenceRepository>,
    pub payload_fetcher: Arc<HttpPayloadFetcher>,
    pub qr_decoder: Arc<RqrrQrDecoder>,
    pub image_rasterizer: Arc<ImageCrateRasterizer>,
    pub navigator: Arc<RecordingNavigator>,
}

/// Resolve the app data root: config override first, platform default otherwise.
pub fn resolve_app_dirs(config: &ScannerConfig) -> WiringResult<AppDirs> {
    if !config.data_dir.as_os_str().is_empty() {
        return Ok(AppDirs {
            app_data_root: config.data_dir.clone(),
        });
    }
    DirsAppDirsAdapter::new()
        .get_app_dirs()
        .map_err(|e| WiringError::AppDirs(e.to_string()))
}

/// Build every adapter the commands need.
pub fn wire_dependencies(
    config: ScannerConfig,
    probe: &RuntimeProbe,
) -> WiringResult<ShellRuntime> {
    let app_dirs = resolve_app_dirs(&config)?;
    let runtime_context = detect_runtime_context(probe);

    let payload_fetcher = HttpPayloadFetcher::new(config.fetch_timeout())
        .map_err(|e| WiringError::HttpClient(e.to_string()))?;

    info!(
        app_data_root = %app_dirs.app_data_root.display(),
        "dependencies wired"
    );

    Ok(ShellRuntime {
        session_store: Arc::new(FileSessionStore::new(app_dirs.session_path())),
        preference: Arc::new(FileAcquisitionPreferenceRepository::new(
            app_dirs.preference_path(),
        )),
        payload_fetcher: Arc::new(payload_fetcher),
        qr_decoder: Arc::new(RqrrQrDecoder::new()),
        image_rasterizer: Arc::new(ImageCrateRasterizer::new()),
        navigator: Arc::new(RecordingNavigator::new()),
        runtime_context,
        app_dirs,
        config,
    })
}

impl ShellRuntime {
    /// Assemble the controller dependencies for one screen mount.
    pub async fn scanner_deps(&self, source: CameraSource) -> WiringResult<ScannerDeps> {
        let (camera, permission_registry) = match source {
            CameraSource::Unavailable => {
                let camera: Arc<dyn CameraPort> = Arc::new(StillFrameCamera::new(Vec::new()));
                (camera, None)
            }
            CameraSource::StillFrames {
                dir,
                permission,
                facing_modes,
            } => {
                let camera = StillFrameCamera::from_dir(&dir, self.image_rasterizer.as_ref())
                    .await
                    .map_err(|e| WiringError::Camera(e.to_string()))?
                    .with_permission(permission)
                    .with_facing_modes(facing_modes);
                let camera: Arc<dyn CameraPort> = Arc::new(camera);
                let registry: Arc<dyn PermissionRegistryPort> =
                    Arc::new(StaticPermissionRegistry::new(permission));
                (camera, Some(registry))
            }
        };

        Ok(ScannerDeps {
            camera,
            permission_registry,
            qr_decoder: self.qr_decoder.clone(),
            image_rasterizer: self.image_rasterizer.clone(),
            payload_fetcher: self.payload_fetcher.clone(),
            session_store: self.session_store.clone(),
            preference: self.preference.clone(),
            navigation: self.navigator.clone(),
            runtime: self.runtime_context.clone(),
        })
    }

    pub fn classify_payload(&self) -> ClassifyPayload {
        ClassifyPayload::from_ports(self.payload_fetcher.clone())
    }

    pub fn dispatch_payload(&self) -> DispatchPayload {
        DispatchPayload::from_ports(self.session_store.clone(), self.navigator.clone())
    }

    pub fn decode_uploaded_image(&self) -> DecodeUploadedImage {
        DecodeUploadedImage::from_ports(self.image_rasterizer.clone(), self.qr_decoder.clone())
    }

    pub fn take_stored_payload(&self) -> TakeStoredPayload {
        TakeStoredPayload::from_ports(self.session_store.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ScannerConfig {
        ScannerConfig {
            data_dir: dir.path().to_path_buf(),
            ..ScannerConfig::default()
        }
    }

    #[test]
    fn data_dir_override_becomes_app_root() {
        let temp_dir = TempDir::new().unwrap();
        let dirs = resolve_app_dirs(&config_in(&temp_dir)).unwrap();
        assert_eq!(dirs.app_data_root, temp_dir.path());
    }

    #[tokio::test]
    async fn unavailable_camera_reports_no_video_input() {
        let temp_dir = TempDir::new().unwrap();
        let runtime = wire_dependencies(config_in(&temp_dir), &RuntimeProbe::default()).unwrap();

        let deps = runtime
            .scanner_deps(CameraSource::Unavailable)
            .await
            .unwrap();

        assert!(!deps.camera.has_video_input().await.unwrap());
        assert!(deps.permission_registry.is_none());
    }

    #[tokio::test]
    async fn missing_frame_dir_is_a_camera_error() {
        let temp_dir = TempDir::new().unwrap();
        let runtime = wire_dependencies(config_in(&temp_dir), &RuntimeProbe::default()).unwrap();

        let result = runtime
            .scanner_deps(CameraSource::StillFrames {
                dir: temp_dir.path().join("missing"),
                permission: PermissionState::Granted,
                facing_modes: vec![FacingMode::Environment],
            })
            .await;

        assert!(matches!(result, Err(WiringError::Camera(_))));
    }
}
