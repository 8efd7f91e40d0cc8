//! # Scanner Dependencies / 扫描页依赖
//!
//! This module defines the dependency grouping for controller construction.
//! 此模块定义扫描控制器构造的依赖分组。
//!
//! **Note / 注意**: This is NOT a Builder pattern.
//! **这不是 Builder 模式。**
//! - No build steps / 无构建步骤
//! - No hidden logic / 无隐藏逻辑
//! - Just parameter grouping / 仅用于参数打包

use std::sync::Arc;

use sw_core::ports::*;
use sw_core::runtime::RuntimeContext;

/// Scanner dependency grouping (non-Builder, just parameter grouping)
/// 扫描器依赖分组（非 Builder，仅参数打包）
///
/// The only optional dependency is the permission registry: some platforms
/// simply do not expose one.
/// 唯一可选的依赖是权限注册表：部分平台不提供。
pub struct ScannerDeps {
    // Camera dependencies / 摄像头依赖
    pub camera: Arc<dyn CameraPort>,
    pub permission_registry: Option<Arc<dyn PermissionRegistryPort>>,

    // Decode dependencies / 解码依赖
    pub qr_decoder: Arc<dyn QrDecoderPort>,
    pub image_rasterizer: Arc<dyn ImageRasterizerPort>,

    // Payload dependencies / 载荷依赖
    pub payload_fetcher: Arc<dyn PayloadFetchPort>,
    pub session_store: Arc<dyn SessionStorePort>,

    // Preference dependencies / 偏好依赖
    pub preference: Arc<dyn AcquisitionPreferencePort>,

    // Host dependencies / 宿主依赖
    pub navigation: Arc<dyn NavigationPort>,

    /// Computed once by the platform probe, immutable afterwards.
    pub runtime: RuntimeContext,
}
